//! Module graph implementation using petgraph.
//!
//! Provides a directed graph of modules, where an edge points from a module
//! to a module it imports packages from. Each module also owns the set of
//! source files its packages contribute.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use super::classify::ModuleId;

/// Represents a node in the module graph.
#[derive(Debug, Clone)]
pub struct ModuleNode {
    /// Module identifier
    pub id: ModuleId,
    /// Number of packages classified into this module
    pub package_count: usize,
}

/// A directed graph representing module dependencies.
///
/// Nodes are kept in the order they were first seen, so traversal order
/// carries through to the emitted graph description.
///
/// # Example
///
/// ```rust
/// use modscope::graph::{ModuleGraph, ModuleId, ModuleKind};
///
/// let app = ModuleId::new("example.com/app", ModuleKind::Root);
/// let errors = ModuleId::new("github.com/pkg/errors", ModuleKind::Named);
///
/// let mut graph = ModuleGraph::new();
/// graph.add_module(&app);
/// graph.add_module(&errors);
/// graph.add_edge(&app, &errors);
/// graph.add_edge(&app, &errors); // idempotent
/// graph.add_edge(&app, &app); // self-edges are dropped
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    /// The underlying directed graph
    graph: DiGraph<ModuleNode, ()>,
    /// Maps module names to their node indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Source files per module
    files: BTreeMap<ModuleId, BTreeSet<PathBuf>>,
}

impl ModuleGraph {
    /// Creates a new empty module graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module to the graph.
    ///
    /// If the module already exists, returns its existing node index.
    pub fn add_module(&mut self, id: &ModuleId) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(id.name()) {
            return idx;
        }

        let idx = self.graph.add_node(ModuleNode {
            id: id.clone(),
            package_count: 0,
        });
        self.node_indices.insert(id.name().to_string(), idx);
        self.files.entry(id.clone()).or_default();
        idx
    }

    /// Registers one package and its source files under `id`.
    ///
    /// Files are filed under the id the node was created with, so a package
    /// classified as a named module joins the root node of the same name.
    /// Files already registered for the module are collapsed.
    pub fn add_package<I>(&mut self, id: &ModuleId, files: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let idx = self.add_module(id);
        let node = &mut self.graph[idx];
        node.package_count += 1;
        self.files.entry(node.id.clone()).or_default().extend(files);
    }

    /// Adds a dependency edge from `from` to `to`, creating missing nodes.
    ///
    /// # Returns
    ///
    /// `false` for self-edges, which are never recorded.
    pub fn add_edge(&mut self, from: &ModuleId, to: &ModuleId) -> bool {
        if from.name() == to.name() {
            return false;
        }
        let from_idx = self.add_module(from);
        let to_idx = self.add_module(to);
        self.graph.update_edge(from_idx, to_idx, ());
        true
    }

    /// Gets a module node by name.
    pub fn get_node(&self, name: &str) -> Option<&ModuleNode> {
        self.node_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets all modules, in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.graph.node_weights().map(|node| &node.id)
    }

    /// Gets the modules `name` depends on (outgoing edges), sorted by name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modscope::graph::{ModuleGraph, ModuleId, ModuleKind};
    ///
    /// let app = ModuleId::new("example.com/app", ModuleKind::Root);
    /// let stdlib = ModuleId::stdlib();
    ///
    /// let mut graph = ModuleGraph::new();
    /// graph.add_edge(&app, &stdlib);
    ///
    /// let deps = graph.dependencies("example.com/app");
    /// assert_eq!(deps.len(), 1);
    /// assert_eq!(deps[0].name(), "stdlib");
    /// ```
    pub fn dependencies(&self, name: &str) -> Vec<&ModuleId> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut deps: Vec<&ModuleId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|edge| self.graph.node_weight(edge.target()))
            .map(|node| &node.id)
            .collect();
        deps.sort();
        deps
    }

    /// All edges as `(from, to)` pairs, grouped by source in insertion order.
    pub fn edges(&self) -> Vec<(&ModuleId, &ModuleId)> {
        self.graph
            .node_weights()
            .flat_map(|node| {
                self.dependencies(node.id.name())
                    .into_iter()
                    .map(move |dep| (&node.id, dep))
            })
            .collect()
    }

    /// Source files per module.
    pub fn files_by_module(&self) -> &BTreeMap<ModuleId, BTreeSet<PathBuf>> {
        &self.files
    }

    /// Returns the groups of modules that depend on each other in a cycle.
    ///
    /// Package imports are acyclic, but two modules can still import
    /// packages from each other.
    pub fn module_cycles(&self) -> Vec<CycleInfo> {
        let mut cycles: Vec<CycleInfo> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut nodes: Vec<String> = scc
                    .iter()
                    .filter_map(|&idx| self.graph.node_weight(idx))
                    .map(|node| node.id.name().to_string())
                    .collect();
                nodes.sort();
                CycleInfo { nodes }
            })
            .collect();
        cycles.sort_by(|a, b| a.nodes.cmp(&b.nodes));
        cycles
    }

    /// Returns the number of modules.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a module exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }
}

/// A group of modules that transitively depend on each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The module names in the cycle, sorted
    pub nodes: Vec<String>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle.
    ///
    /// For example: "a -> b -> a"
    pub fn cycle_path(&self) -> String {
        match self.nodes.first() {
            Some(first) => format!("{} -> {}", self.nodes.join(" -> "), first),
            None => String::new(),
        }
    }
}
