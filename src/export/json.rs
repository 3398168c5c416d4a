//! JSON export implementation.
//!
//! Exports the module graph and its metrics in JSON format for
//! machine-readable output.

use super::{ExportData, Exporter};
use crate::graph::ModuleKind;
use crate::visual::format_kloc;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable module for JSON output.
#[derive(Serialize)]
struct JsonModule {
    name: String,
    kind: ModuleKind,
    packages: usize,
    lines: u64,
    kloc: String,
    size: f64,
    fill_color: String,
    border_color: String,
    dependencies: Vec<String>,
}

/// Serializable cycle info for JSON output.
#[derive(Serialize)]
struct JsonCycle {
    modules: Vec<String>,
    path: String,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    modules: usize,
    dependencies: usize,
    total_lines: u64,
    total_lines_excluding_stdlib: u64,
    module_cycles: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport {
    project: String,
    summary: JsonSummary,
    modules: Vec<JsonModule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    module_cycles: Vec<JsonCycle>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        let modules: Vec<JsonModule> = data
            .graph
            .modules()
            .map(|module| {
                let lines = data.metrics.lines_for(module);
                let attrs = data.attributes.get(module);
                JsonModule {
                    name: module.name().to_string(),
                    kind: module.kind(),
                    packages: data
                        .graph
                        .get_node(module.name())
                        .map_or(0, |node| node.package_count),
                    lines,
                    kloc: format_kloc(lines),
                    size: attrs.map_or(0.0, |a| a.size),
                    fill_color: attrs.map(|a| a.color.fill.clone()).unwrap_or_default(),
                    border_color: attrs.map(|a| a.color.border.clone()).unwrap_or_default(),
                    dependencies: data
                        .graph
                        .dependencies(module.name())
                        .iter()
                        .map(|dep| dep.name().to_string())
                        .collect(),
                }
            })
            .collect();

        let module_cycles: Vec<JsonCycle> = data
            .cycles
            .iter()
            .map(|c| JsonCycle {
                modules: c.nodes.clone(),
                path: c.cycle_path(),
            })
            .collect();

        let export = JsonExport {
            project: data.project_name.clone(),
            summary: JsonSummary {
                modules: data.graph.node_count(),
                dependencies: data.graph.edge_count(),
                total_lines: data.metrics.total_lines(),
                total_lines_excluding_stdlib: data.metrics.total_lines_excluding_stdlib(),
                module_cycles: data.cycles.len(),
            },
            modules,
            module_cycles,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
