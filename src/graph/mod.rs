//! Graph module for module-level dependency modeling.
//!
//! Packages are classified into modules ([`classify`]), and a breadth-first
//! traversal ([`build`]) turns the package import graph into a
//! [`ModuleGraph`].
//!
//! # Example
//!
//! ```rust
//! use modscope::graph::{ModuleGraph, ModuleId, ModuleKind};
//!
//! let mut graph = ModuleGraph::new();
//! let app = ModuleId::new("example.com/app", ModuleKind::Root);
//! graph.add_edge(&app, &ModuleId::stdlib());
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod builder;
mod classify;
mod module_graph;

pub use builder::{build, BuildError};
pub use classify::{
    classify, classify_root, ModuleId, ModuleKind, NO_MODULE_SUFFIX, STDLIB_MODULE,
};
pub use module_graph::{CycleInfo, ModuleGraph, ModuleNode};
