//! Visual encoding of module metrics.
//!
//! Turns a module's line count into the attributes of its graph node: a size
//! that grows with the square root of the line count, a matching font size,
//! a wrapped label and a color.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::color::{default_author_colors, node_color, HashedColorConfig, NodeColor};
use super::label::node_label;
use crate::graph::{ModuleGraph, ModuleId};
use crate::loc::ModuleMetrics;

/// Constants used when encoding nodes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Size of the smallest module node
    pub base_size: f64,
    /// Font size relative to node size
    pub font_scale: f64,
    /// Minimum line length before a label breaks at a `/`
    pub wrap_at: usize,
    /// Font used for node labels
    pub font_name: String,
    /// Hosting prefixes stripped before taking the author segment
    pub known_hosts: Vec<String>,
    /// Hand-picked colors per author
    pub author_colors: BTreeMap<String, NodeColor>,
    /// Color derivation for all other authors
    pub hashed_colors: HashedColorConfig,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            base_size: 0.33,
            font_scale: 6.0,
            wrap_at: 15,
            font_name: "Inter".to_string(),
            known_hosts: vec!["github.com".to_string()],
            author_colors: default_author_colors(),
            hashed_colors: HashedColorConfig::default(),
        }
    }
}

/// Derived drawing attributes of one module node.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualAttributes {
    /// Node width and height
    pub size: f64,
    /// Label font size
    pub font_size: f64,
    /// Label text, lines separated by `\n`
    pub label: String,
    /// Fill and border colors
    pub color: NodeColor,
}

/// Scales a line count relative to the smallest module.
///
/// The smallest module gets exactly `base_size`. A module without counted
/// lines is drawn at `base_size` as well.
///
/// # Example
///
/// ```
/// use modscope::visual::node_size;
///
/// assert_eq!(node_size(100, 100, 0.33), 0.33);
/// assert!((node_size(400, 100, 0.33) - 0.66).abs() < 1e-12);
/// ```
pub fn node_size(lines: u64, min_lines: u64, base_size: f64) -> f64 {
    if lines == 0 || min_lines == 0 {
        return base_size;
    }
    base_size * ((lines as f64).sqrt() / (min_lines as f64).sqrt())
}

/// Encodes one module.
pub fn encode(
    module: &ModuleId,
    lines: u64,
    min_lines: u64,
    config: &VisualConfig,
) -> VisualAttributes {
    let size = node_size(lines, min_lines, config.base_size);
    VisualAttributes {
        size,
        font_size: size * config.font_scale,
        label: node_label(module.name(), lines, config.wrap_at),
        color: node_color(
            module.name(),
            &config.known_hosts,
            &config.author_colors,
            &config.hashed_colors,
        ),
    }
}

/// Encodes every module of the graph against the smallest counted module.
pub fn encode_all(
    graph: &ModuleGraph,
    metrics: &ModuleMetrics,
    config: &VisualConfig,
) -> BTreeMap<ModuleId, VisualAttributes> {
    let min_lines = metrics.min_lines().unwrap_or(1);
    graph
        .modules()
        .map(|module| {
            let lines = metrics.lines_for(module);
            (module.clone(), encode(module, lines, min_lines, config))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleKind;
    use crate::loc::BatchResult;
    use proptest::prelude::*;

    #[test]
    fn test_encode_smallest_module() {
        let module = ModuleId::new("github.com/spf13/cobra", ModuleKind::Named);
        let attrs = encode(&module, 260, 260, &VisualConfig::default());

        assert_eq!(attrs.size, 0.33);
        assert!((attrs.font_size - 1.98).abs() < 1e-12);
        assert_eq!(attrs.label, "github.com/spf13/\ncobra\n0.3K LOC");
    }

    #[test]
    fn test_encode_uses_configured_constants() {
        let config = VisualConfig {
            base_size: 1.0,
            font_scale: 10.0,
            wrap_at: 100,
            ..VisualConfig::default()
        };
        let module = ModuleId::new("github.com/spf13/cobra", ModuleKind::Named);
        let attrs = encode(&module, 900, 100, &config);

        assert!((attrs.size - 3.0).abs() < 1e-12);
        assert!((attrs.font_size - 30.0).abs() < 1e-12);
        assert_eq!(attrs.label, "github.com/spf13/cobra\n0.9K LOC");
    }

    #[test]
    fn test_encode_stdlib_color() {
        let attrs = encode(&ModuleId::stdlib(), 1_000, 10, &VisualConfig::default());
        assert_eq!(attrs.color, NodeColor::new("#CCCCCC", "#AAAAAA"));
    }

    #[test]
    fn test_encode_all_covers_every_module() {
        let app = ModuleId::new("example.com/app", ModuleKind::Root);
        let empty = ModuleId::new("example.com/empty", ModuleKind::Named);

        let mut graph = ModuleGraph::new();
        graph.add_edge(&app, &ModuleId::stdlib());
        graph.add_module(&empty);

        let mut metrics = ModuleMetrics::default();
        metrics.record(BatchResult {
            batch_id: 0,
            module: app.clone(),
            lines: 40,
        });
        metrics.record(BatchResult {
            batch_id: 1,
            module: ModuleId::stdlib(),
            lines: 160,
        });

        let attrs = encode_all(&graph, &metrics, &VisualConfig::default());
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[&app].size, 0.33);
        assert!((attrs[&ModuleId::stdlib()].size - 0.66).abs() < 1e-12);
        assert_eq!(attrs[&empty].size, 0.33);
        assert!(attrs[&empty].label.ends_with("0.000K LOC"));
    }

    proptest! {
        #[test]
        fn size_is_monotonic(min in 1u64..10_000, a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (small, large) = (min + a.min(b), min + a.max(b));
            let small_size = node_size(small, min, 0.33);
            let large_size = node_size(large, min, 0.33);
            if small < large {
                prop_assert!(small_size < large_size);
            } else {
                prop_assert_eq!(small_size, large_size);
            }
        }

        #[test]
        fn smallest_module_gets_base_size(min in 1u64..10_000_000) {
            prop_assert_eq!(node_size(min, min, 0.33), 0.33);
        }
    }
}
