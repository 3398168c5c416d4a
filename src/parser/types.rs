//! Shared types for package metadata.
//!
//! This module defines the raw records emitted by `go list -json` and the
//! normalized [`Package`] / [`PackageSet`] structures the rest of the crate
//! works with.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// One record of the `go list -e -json -deps` output stream.
///
/// Only the fields needed for module-level analysis are captured; everything
/// else in the record is ignored by serde.
///
/// # Example
///
/// ```
/// use modscope::parser::types::GoListPackage;
///
/// let json = r#"{"ImportPath": "fmt", "Standard": true, "DepOnly": true}"#;
/// let pkg: GoListPackage = serde_json::from_str(json).unwrap();
/// assert_eq!(pkg.import_path, "fmt");
/// assert!(pkg.dep_only);
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct GoListPackage {
    /// Import path of the package (e.g., "golang.org/x/tools/go/packages").
    pub import_path: String,

    /// Directory containing the package sources.
    #[serde(default)]
    pub dir: PathBuf,

    /// Owning module, absent for standard library and GOPATH packages.
    pub module: Option<GoModule>,

    /// Go source files, relative to `dir`.
    #[serde(default)]
    pub go_files: Vec<String>,

    /// Go source files that import "C", relative to `dir`.
    #[serde(default)]
    pub cgo_files: Vec<String>,

    /// Resolved import paths used by this package.
    #[serde(default)]
    pub imports: Vec<String>,

    /// Whether the package was only listed as a dependency of the pattern.
    #[serde(default)]
    pub dep_only: bool,

    /// Load error reported by the go tool, if any.
    pub error: Option<GoListError>,
}

/// Module record nested in a `go list` package.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct GoModule {
    /// Module path (e.g., "github.com/aws/aws-sdk-go").
    pub path: String,
}

/// Error record nested in a `go list` package.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct GoListError {
    /// Source position of the error, if known.
    #[serde(default)]
    pub pos: String,

    /// Error message.
    pub err: String,
}

impl fmt::Display for GoListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pos.is_empty() {
            write!(f, "{}", self.err)
        } else {
            write!(f, "{}: {}", self.pos, self.err)
        }
    }
}

/// A package as consumed by the graph builder.
///
/// This is the normalized form of a [`GoListPackage`]: file paths are
/// absolute and only the attributes the analysis needs are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Slash-delimited package identifier.
    pub id: String,

    /// Path of the owning module, if the package belongs to one.
    pub module: Option<String>,

    /// Source files belonging to the package.
    pub files: Vec<PathBuf>,

    /// Identifiers of directly imported packages.
    pub imports: Vec<String>,
}

impl Package {
    /// Creates a package with no files and no imports.
    pub fn new(id: impl Into<String>, module: Option<&str>) -> Self {
        Self {
            id: id.into(),
            module: module.map(str::to_string),
            files: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// Adds a source file, builder style.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Adds an import, builder style.
    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }
}

impl From<GoListPackage> for Package {
    fn from(raw: GoListPackage) -> Self {
        let files = raw
            .go_files
            .iter()
            .chain(raw.cgo_files.iter())
            .map(|name| raw.dir.join(name))
            .collect();

        Self {
            id: raw.import_path,
            module: raw.module.map(|m| m.path),
            files,
            imports: raw.imports,
        }
    }
}

/// The transitive package graph reachable from a single root package.
#[derive(Debug, Clone)]
pub struct PackageSet {
    root: String,
    packages: HashMap<String, Package>,
}

impl PackageSet {
    /// Creates a set from its root identifier and all reachable packages.
    pub fn new(root: impl Into<String>, packages: impl IntoIterator<Item = Package>) -> Self {
        Self {
            root: root.into(),
            packages: packages.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Identifier of the root package.
    pub fn root_id(&self) -> &str {
        &self.root
    }

    /// The root package, if it is part of the set.
    pub fn root(&self) -> Option<&Package> {
        self.packages.get(&self.root)
    }

    /// Looks up a package by identifier.
    pub fn get(&self, id: &str) -> Option<&Package> {
        self.packages.get(id)
    }

    /// Number of packages in the set.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the set holds no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
