//! End-to-end run: load, build, count, encode, write, lay out, render.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Config, ToolPaths};
use crate::export::{export, ExportData, ExportFormat};
use crate::graph::{build, CycleInfo};
use crate::loc::{count_lines, LineCounter, SccCounter};
use crate::parser::{GoListProvider, PackageProvider};
use crate::render::{
    parse_geometry, render_all, Graphviz, LayoutEngine, NodeGeometry, OutputFormat, Renderer,
};
use crate::visual::encode_all;

/// Files written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Graph description before layout
    pub dot: PathBuf,
    /// Graph description as returned by the layout engine
    pub layouted: PathBuf,
    /// One rendered image per requested format
    pub images: Vec<(OutputFormat, PathBuf)>,
    /// Optional JSON summary
    pub json: Option<PathBuf>,
}

impl OutputPaths {
    /// Names every file after `name` inside `dir`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::{Path, PathBuf};
    /// use modscope::pipeline::OutputPaths;
    /// use modscope::render::OutputFormat;
    ///
    /// let paths = OutputPaths::for_root("app", Path::new("out"), &[OutputFormat::Svg]);
    /// assert_eq!(paths.dot, PathBuf::from("out/app.dot"));
    /// assert_eq!(paths.layouted, PathBuf::from("out/app_layouted.dot"));
    /// assert_eq!(paths.images[0].1, PathBuf::from("out/app.svg"));
    /// ```
    pub fn for_root(name: &str, dir: &Path, formats: &[OutputFormat]) -> Self {
        Self {
            dot: dir.join(format!("{}.dot", name)),
            layouted: dir.join(format!("{}_layouted.dot", name)),
            images: formats
                .iter()
                .map(|&format| (format, dir.join(format!("{}.{}", name, format.extension()))))
                .collect(),
            json: None,
        }
    }

    /// Derives every file from an explicit vector image path.
    ///
    /// The SVG output is written to `svg` itself; the graph descriptions and
    /// other formats are its siblings, sharing its stem.
    pub fn from_vector_path(svg: &Path, formats: &[OutputFormat]) -> Self {
        let stem = svg
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "graph".to_string());
        let sibling = |suffix: &str| svg.with_file_name(format!("{}{}", stem, suffix));

        Self {
            dot: sibling(".dot"),
            layouted: sibling("_layouted.dot"),
            images: formats
                .iter()
                .map(|&format| {
                    let path = match format {
                        OutputFormat::Svg => svg.to_path_buf(),
                        _ => sibling(&format!(".{}", format.extension())),
                    };
                    (format, path)
                })
                .collect(),
            json: None,
        }
    }

    /// Also writes a JSON summary to `path`.
    pub fn with_json(mut self, path: Option<PathBuf>) -> Self {
        self.json = path;
        self
    }

    fn all(&self) -> impl Iterator<Item = &Path> {
        [self.dot.as_path(), self.layouted.as_path()]
            .into_iter()
            .chain(self.images.iter().map(|(_, path)| path.as_path()))
            .chain(self.json.as_deref())
    }
}

/// The external collaborators of a run.
pub struct Tools {
    /// Loads the package set
    pub provider: Box<dyn PackageProvider>,
    /// Counts lines per batch
    pub counter: Box<dyn LineCounter>,
    /// Lays out the graph
    pub layout: Box<dyn LayoutEngine>,
    /// Renders images
    pub renderer: Box<dyn Renderer>,
}

impl Tools {
    /// The production tools: `go list`, `scc` and Graphviz `dot`.
    pub fn from_paths(paths: &ToolPaths) -> Self {
        let graphviz = Graphviz::new(paths.dot.clone());
        Self {
            provider: Box::new(GoListProvider::new(paths.go.clone())),
            counter: Box::new(SccCounter::new(paths.scc.clone())),
            layout: Box::new(graphviz.clone()),
            renderer: Box::new(graphviz),
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of module nodes
    pub modules: usize,
    /// Number of module dependency edges
    pub dependencies: usize,
    /// Code lines across all modules
    pub total_lines: u64,
    /// Code lines outside the standard library bucket
    pub total_lines_excluding_stdlib: u64,
    /// Mutually dependent module groups
    pub cycles: Vec<CycleInfo>,
    /// Laid out node positions
    pub geometry: Vec<NodeGeometry>,
    /// Every file written
    pub outputs: Vec<PathBuf>,
}

/// Base name of the analyzed root, used to name outputs.
pub fn project_name(root: &Path) -> String {
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string())
}

fn write_export(format: ExportFormat, data: &ExportData<'_>, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    export(format, data, &mut writer)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}

/// Runs the whole pipeline for the package at `root`.
///
/// Nothing is written until every line count has succeeded.
pub fn run(root: &Path, paths: &OutputPaths, config: &Config, tools: &Tools) -> Result<RunSummary> {
    info!("Loading packages at {}", root.display());
    let packages = tools
        .provider
        .load(root)
        .with_context(|| format!("Failed to load packages at {}", root.display()))?;

    let graph = build(&packages).context("Failed to build module graph")?;
    let cycles = graph.module_cycles();
    for cycle in &cycles {
        info!("Module cycle: {}", cycle.cycle_path());
    }

    let metrics = count_lines(tools.counter.as_ref(), graph.files_by_module(), &config.count)
        .context("Failed to count lines")?;
    info!(
        "Counted {} lines in {} batches",
        metrics.total_lines(),
        metrics.batch_count()
    );

    let attributes = encode_all(&graph, &metrics, &config.visual);
    let data = ExportData::new(
        project_name(root),
        config.visual.font_name.as_str(),
        &graph,
        &metrics,
        &attributes,
        &cycles,
    );

    for path in paths.all() {
        ensure_parent(path)?;
    }

    write_export(ExportFormat::Dot, &data, &paths.dot)?;
    info!("Wrote {}", paths.dot.display());

    let layouted = tools
        .layout
        .layout(&paths.dot)
        .with_context(|| format!("Failed to lay out {}", paths.dot.display()))?;
    fs::write(&paths.layouted, &layouted)
        .with_context(|| format!("Failed to write {}", paths.layouted.display()))?;
    info!("Wrote {}", paths.layouted.display());

    let geometry = parse_geometry(&layouted)
        .with_context(|| format!("Invalid layout in {}", paths.layouted.display()))?;
    for node in &geometry {
        debug!(
            "Node {} at ({}, {}) size {}x{}",
            node.name, node.x, node.y, node.width, node.height
        );
    }

    render_all(tools.renderer.as_ref(), &paths.layouted, &paths.images)
        .context("Failed to render graph")?;

    if let Some(json) = &paths.json {
        write_export(ExportFormat::Json, &data, json)?;
        info!("Wrote {}", json.display());
    }

    Ok(RunSummary {
        modules: graph.node_count(),
        dependencies: graph.edge_count(),
        total_lines: metrics.total_lines(),
        total_lines_excluding_stdlib: metrics.total_lines_excluding_stdlib(),
        cycles,
        geometry,
        outputs: paths.all().map(Path::to_path_buf).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vector_path() {
        let paths = OutputPaths::from_vector_path(
            Path::new("out/graph.svg"),
            &[OutputFormat::Svg, OutputFormat::Png],
        );
        assert_eq!(paths.dot, PathBuf::from("out/graph.dot"));
        assert_eq!(paths.layouted, PathBuf::from("out/graph_layouted.dot"));
        assert_eq!(
            paths.images,
            vec![
                (OutputFormat::Svg, PathBuf::from("out/graph.svg")),
                (OutputFormat::Png, PathBuf::from("out/graph.png")),
            ]
        );
    }

    #[test]
    fn test_from_vector_path_keeps_custom_extension() {
        let paths = OutputPaths::from_vector_path(Path::new("deps.image"), &[OutputFormat::Svg]);
        assert_eq!(paths.images[0].1, PathBuf::from("deps.image"));
        assert_eq!(paths.dot, PathBuf::from("deps.dot"));
    }

    #[test]
    fn test_all_lists_every_output() {
        let paths = OutputPaths::for_root("app", Path::new("."), &[OutputFormat::Pdf])
            .with_json(Some(PathBuf::from("app.json")));
        let all: Vec<&Path> = paths.all().collect();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3], Path::new("app.json"));
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name(Path::new("/nonexistent/some/app")), "app");
    }
}
