//! DOT export implementation.
//!
//! Writes the module graph as a Graphviz digraph laid out left to right, with
//! one fixed-size node per module and one edge per module dependency.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// DOT exporter implementation.
pub struct DotExporter;

impl Exporter for DotExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph modules {{")?;
        writeln!(writer, "    rankdir=\"LR\"")?;
        writeln!(writer, "    node [shape=\"box\",style=\"rounded,filled\"]")?;

        for module in data.graph.modules() {
            let Some(attrs) = data.attributes.get(module) else {
                writeln!(writer, "    {};", quote(module.name()))?;
                continue;
            };
            writeln!(
                writer,
                "    {} [width={:.6},height={:.6},fixedsize=true,fontsize={:.6},label={},fillcolor={},color={},fontname={}];",
                quote(module.name()),
                attrs.size,
                attrs.size,
                attrs.font_size,
                quote(&attrs.label),
                quote(&attrs.color.fill),
                quote(&attrs.color.border),
                quote(&data.font_name),
            )?;
        }

        for (from, to) in data.graph.edges() {
            writeln!(writer, "    {} -> {};", quote(from.name()), quote(to.name()))?;
        }

        writeln!(writer, "}}")
    }
}

/// Quotes a string as a DOT identifier.
///
/// Line breaks become `\n` escapes, which Graphviz renders as centered lines.
///
/// # Example
///
/// ```
/// use modscope::export::dot::quote;
///
/// assert_eq!(quote("a \"b\"\nc"), r#""a \"b\"\nc""#);
/// ```
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ModuleGraph, ModuleId, ModuleKind};
    use crate::loc::{BatchResult, ModuleMetrics};
    use crate::visual::{encode_all, VisualConfig};

    fn to_dot(data: &ExportData<'_>) -> String {
        let mut output = Vec::new();
        DotExporter.export(data, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn sample() -> (ModuleGraph, ModuleMetrics) {
        let app = ModuleId::new("example.com/app", ModuleKind::Root);
        let errors = ModuleId::new("github.com/pkg/errors", ModuleKind::Named);

        let mut graph = ModuleGraph::new();
        graph.add_module(&app);
        graph.add_edge(&app, &errors);
        graph.add_edge(&app, &ModuleId::stdlib());
        graph.add_edge(&errors, &ModuleId::stdlib());

        let mut metrics = ModuleMetrics::default();
        for (id, (module, lines)) in [(app, 100), (errors, 400), (ModuleId::stdlib(), 900)]
            .into_iter()
            .enumerate()
        {
            metrics.record(BatchResult {
                batch_id: id,
                module,
                lines,
            });
        }
        (graph, metrics)
    }

    #[test]
    fn test_dot_export_structure() {
        let (graph, metrics) = sample();
        let attrs = encode_all(&graph, &metrics, &VisualConfig::default());
        let data = ExportData::new("app", "Inter", &graph, &metrics, &attrs, &[]);

        let dot = to_dot(&data);
        let lines: Vec<&str> = dot.lines().collect();

        assert_eq!(lines[0], "digraph modules {");
        assert_eq!(lines[1], "    rankdir=\"LR\"");
        assert_eq!(lines.last(), Some(&"}"));
        assert_eq!(dot.matches(" -> ").count(), 3);
        assert_eq!(dot.matches("fixedsize=true").count(), 3);
        assert!(dot.contains("\"example.com/app\" -> \"github.com/pkg/errors\";"));
        assert!(dot.contains("\"github.com/pkg/errors\" -> \"stdlib\";"));
    }

    #[test]
    fn test_dot_node_attributes() {
        let (graph, metrics) = sample();
        let attrs = encode_all(&graph, &metrics, &VisualConfig::default());
        let data = ExportData::new("app", "Inter", &graph, &metrics, &attrs, &[]);

        let dot = to_dot(&data);
        let stdlib_line = dot
            .lines()
            .find(|line| line.trim_start().starts_with("\"stdlib\" ["))
            .unwrap();

        assert!(stdlib_line.contains("width=0.990000,height=0.990000"));
        assert!(stdlib_line.contains("fontsize=5.940000"));
        assert!(stdlib_line.contains("label=\"stdlib\\n0.9K LOC\""));
        assert!(stdlib_line.contains("fillcolor=\"#CCCCCC\",color=\"#AAAAAA\""));
        assert!(stdlib_line.ends_with("fontname=\"Inter\"];"));
    }

    #[test]
    fn test_nodes_precede_edges() {
        let (graph, metrics) = sample();
        let attrs = encode_all(&graph, &metrics, &VisualConfig::default());
        let data = ExportData::new("app", "Inter", &graph, &metrics, &attrs, &[]);

        let dot = to_dot(&data);
        let last_node = dot.rfind("fixedsize=true").unwrap();
        let first_edge = dot.find(" -> ").unwrap();
        assert!(last_node < first_edge);
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("stdlib"), "\"stdlib\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("x (no module)"), "\"x (no module)\"");
    }
}
