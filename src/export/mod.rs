//! Export functionality for module graph results.
//!
//! This module provides exporters for writing the encoded module graph in
//! two formats: DOT, the input of the layout engine, and JSON, a
//! machine-readable summary.

pub mod dot;
pub mod json;

use crate::graph::{CycleInfo, ModuleGraph, ModuleId};
use crate::loc::ModuleMetrics;
use crate::visual::VisualAttributes;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Graphviz DOT - input to the layout engine
    Dot,
    /// JSON format - machine-readable summary
    Json,
}

/// Data container for export operations.
///
/// Borrows the results of the earlier pipeline stages.
#[derive(Debug, Clone)]
pub struct ExportData<'a> {
    /// Project name, the base name of the analyzed root
    pub project_name: String,
    /// Font used for node labels
    pub font_name: String,
    /// Module graph
    pub graph: &'a ModuleGraph,
    /// Line counts
    pub metrics: &'a ModuleMetrics,
    /// Per-module drawing attributes
    pub attributes: &'a BTreeMap<ModuleId, VisualAttributes>,
    /// Detected module cycles
    pub cycles: &'a [CycleInfo],
}

impl<'a> ExportData<'a> {
    /// Create new export data from analysis results.
    pub fn new(
        project_name: impl Into<String>,
        font_name: impl Into<String>,
        graph: &'a ModuleGraph,
        metrics: &'a ModuleMetrics,
        attributes: &'a BTreeMap<ModuleId, VisualAttributes>,
        cycles: &'a [CycleInfo],
    ) -> Self {
        Self {
            project_name: project_name.into(),
            font_name: font_name.into(),
            graph,
            metrics,
            attributes,
            cycles,
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData<'_>,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Dot => dot::DotExporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ModuleKind;
    use crate::visual::{encode_all, VisualConfig};

    fn render(format: ExportFormat) -> String {
        let mut graph = ModuleGraph::new();
        graph.add_edge(
            &ModuleId::new("example.com/app", ModuleKind::Root),
            &ModuleId::stdlib(),
        );
        let metrics = ModuleMetrics::default();
        let attrs = encode_all(&graph, &metrics, &VisualConfig::default());
        let data = ExportData::new("app", "Inter", &graph, &metrics, &attrs, &[]);

        let mut buffer = Vec::new();
        export(format, &data, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_export_dispatches_by_format() {
        assert!(render(ExportFormat::Dot).starts_with("digraph modules {"));

        let json: serde_json::Value = serde_json::from_str(&render(ExportFormat::Json)).unwrap();
        assert_eq!(json["project"], "app");
    }
}
