//! Package provider backed by `go list`.
//!
//! This module loads the transitive package graph of a Go package by running
//! `go list -e -json -deps .` inside the package directory and normalizing the
//! resulting JSON stream.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::types::{GoListPackage, Package, PackageSet};

/// Errors that can occur while loading package metadata.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Failed to spawn the go tool.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The go tool exited with a non-zero status.
    #[error("{program} exited with {status}: {stderr}")]
    Tool {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// Failed to parse the JSON stream.
    #[error("Failed to parse go list output: {0}")]
    JsonError(#[from] serde_json::Error),

    /// One or more packages failed to load.
    #[error("{} package(s) failed to load:\n{}", .0.len(), .0.join("\n"))]
    PackageErrors(Vec<String>),

    /// The root path did not resolve to exactly one package.
    #[error("Expected exactly one package at the root path, found {0}")]
    UnexpectedPackageCount(usize),
}

/// Result type alias for provider operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// A source of package metadata for a root path.
pub trait PackageProvider {
    /// Loads the package at `root` together with everything it imports.
    fn load(&self, root: &Path) -> LoadResult<PackageSet>;
}

/// [`PackageProvider`] that shells out to the go tool.
#[derive(Debug, Clone)]
pub struct GoListProvider {
    program: PathBuf,
}

impl GoListProvider {
    /// Creates a provider using the given `go` executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GoListProvider {
    fn default() -> Self {
        Self::new("go")
    }
}

impl PackageProvider for GoListProvider {
    fn load(&self, root: &Path) -> LoadResult<PackageSet> {
        let program = self.program.display().to_string();
        info!("Loading packages under {}", root.display());

        let output = Command::new(&self.program)
            .args(["list", "-e", "-json", "-deps", "."])
            .current_dir(root)
            .output()
            .map_err(|source| LoadError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LoadError::Tool {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_str(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses the concatenated JSON objects printed by `go list -json -deps`.
///
/// Every package that carries an error record is reported, and the stream
/// must contain exactly one package that is not `DepOnly` (the root).
///
/// # Example
///
/// ```
/// use modscope::parser::go_list::parse_str;
///
/// let stream = r#"
/// {"ImportPath": "fmt", "Standard": true, "DepOnly": true}
/// {"ImportPath": "example.com/app", "Imports": ["fmt"], "Module": {"Path": "example.com/app"}}
/// "#;
/// let set = parse_str(stream).unwrap();
/// assert_eq!(set.root_id(), "example.com/app");
/// assert_eq!(set.len(), 2);
/// ```
pub fn parse_str(content: &str) -> LoadResult<PackageSet> {
    let mut packages = Vec::new();
    let mut errors = Vec::new();
    let mut roots = Vec::new();

    for record in serde_json::Deserializer::from_str(content).into_iter::<GoListPackage>() {
        let mut record = record?;
        if let Some(error) = record.error.take() {
            errors.push(format!("{}: {}", record.import_path, error));
        }
        if !record.dep_only {
            roots.push(record.import_path.clone());
        }
        packages.push(Package::from(record));
    }

    if !errors.is_empty() {
        return Err(LoadError::PackageErrors(errors));
    }

    let root = match roots.as_slice() {
        [root] => root.clone(),
        _ => return Err(LoadError::UnexpectedPackageCount(roots.len())),
    };

    debug!("Loaded {} packages rooted at {}", packages.len(), root);
    Ok(PackageSet::new(root, packages))
}
