//! Breadth-first construction of the module graph.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};

use super::classify::{classify, classify_root};
use super::module_graph::ModuleGraph;
use crate::parser::{Package, PackageSet};

/// Errors that can occur while building the module graph.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The package set does not contain its own root.
    #[error("Root package {0} is missing from the loaded package set")]
    MissingRoot(String),
}

/// Builds the module graph reachable from the root of `packages`.
///
/// The traversal visits every package once. Each visited package adds its
/// files to its module, and each import whose module differs from the
/// importer's module adds an edge between the two.
///
/// # Example
///
/// ```
/// use modscope::graph::build;
/// use modscope::parser::{Package, PackageSet};
///
/// let packages = PackageSet::new(
///     "example.com/app",
///     vec![
///         Package::new("example.com/app", Some("example.com/app"))
///             .with_file("/src/main.go")
///             .with_import("fmt"),
///         Package::new("fmt", None).with_file("/go/src/fmt/print.go"),
///     ],
/// );
///
/// let graph = build(&packages).unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.dependencies("example.com/app")[0].name(), "stdlib");
/// ```
pub fn build(packages: &PackageSet) -> Result<ModuleGraph, BuildError> {
    let root = packages
        .root()
        .ok_or_else(|| BuildError::MissingRoot(packages.root_id().to_string()))?;
    let root_module = root_module_of(root);

    let mut graph = ModuleGraph::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&Package> = VecDeque::new();

    seen.insert(root.id.as_str());
    queue.push_back(root);
    let mut is_root = true;

    while let Some(package) = queue.pop_front() {
        let module = if is_root {
            is_root = false;
            classify_root(package)
        } else {
            classify(package, root_module)
        };
        graph.add_package(&module, package.files.iter().cloned());

        for import in &package.imports {
            let Some(imported) = packages.get(import) else {
                debug!("Skipping unresolved import {} of {}", import, package.id);
                continue;
            };

            let imported_module = classify(imported, root_module);
            graph.add_edge(&module, &imported_module);

            if seen.insert(imported.id.as_str()) {
                queue.push_back(imported);
            }
        }
    }

    info!(
        "Visited {} packages in {} modules with {} dependencies",
        seen.len(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn root_module_of(root: &Package) -> &str {
    match &root.module {
        Some(module) => module,
        None => {
            warn!(
                "Root package {} has no owning module, using its path as the module prefix",
                root.id
            );
            &root.id
        }
    }
}
