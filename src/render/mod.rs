//! Layout and rendering through an external graph engine.
//!
//! The DOT description written by [`crate::export::dot`] is laid out once,
//! the resulting positions are validated, and the laid out description is
//! then rendered to every requested image format concurrently.

pub mod geometry;
pub mod graphviz;

pub use geometry::{parse_geometry, NodeGeometry};
pub use graphviz::Graphviz;

use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, info};

/// Errors that can occur while laying out or rendering a graph.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Failed to spawn the layout or render engine.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine exited with a non-zero status.
    #[error("{program} exited with {status}: {output}")]
    Tool {
        program: String,
        status: std::process::ExitStatus,
        output: String,
    },

    /// The layout output was not valid UTF-8.
    #[error("Layout output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The layout output could not be tokenized.
    #[error("Invalid DOT at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// A node in the layout output lacks usable geometry.
    #[error("Malformed geometry for node {node}: {reason}")]
    MalformedGeometry { node: String, reason: String },

    /// A render thread panicked.
    #[error("Renderer for {format} panicked")]
    RendererPanicked { format: OutputFormat },
}

/// Image formats the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    /// Scalable Vector Graphics
    Svg,
    /// Portable Network Graphics
    Png,
    /// Portable Document Format
    Pdf,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(format!(
                "Unknown output format: '{}'. Supported: svg, png, pdf",
                s
            )),
        }
    }
}

/// Computes node positions for a graph description.
pub trait LayoutEngine {
    /// Lays out the DOT file at `graph` and returns the augmented description.
    fn layout(&self, graph: &Path) -> Result<String, RenderError>;
}

/// Turns a laid out graph description into an image.
///
/// Implementations are called concurrently, once per format.
pub trait Renderer: Sync {
    /// Renders the DOT file at `graph` to `output` in the given format.
    fn render(&self, graph: &Path, format: OutputFormat, output: &Path)
        -> Result<(), RenderError>;
}

/// Renders `graph` to every target, one thread per target.
///
/// All renders run to completion; the first error in target order is
/// returned.
pub fn render_all<R>(
    renderer: &R,
    graph: &Path,
    targets: &[(OutputFormat, PathBuf)],
) -> Result<(), RenderError>
where
    R: Renderer + ?Sized,
{
    info!("Rendering {} output format(s)", targets.len());

    let results: Vec<Result<(), RenderError>> = thread::scope(|scope| {
        let handles: Vec<_> = targets
            .iter()
            .map(|(format, output)| {
                let handle = scope.spawn(move || {
                    debug!("Rendering {} to {}", format, output.display());
                    renderer.render(graph, *format, output)
                });
                (*format, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(format, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(RenderError::RendererPanicked { format }))
            })
            .collect()
    });

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingRenderer {
        rendered: Mutex<Vec<OutputFormat>>,
        fail_on: Option<OutputFormat>,
    }

    impl RecordingRenderer {
        fn new(fail_on: Option<OutputFormat>) -> Self {
            Self {
                rendered: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(
            &self,
            _graph: &Path,
            format: OutputFormat,
            output: &Path,
        ) -> Result<(), RenderError> {
            if self.fail_on == Some(format) {
                return Err(RenderError::MalformedGeometry {
                    node: output.display().to_string(),
                    reason: "forced".to_string(),
                });
            }
            self.rendered.lock().unwrap().push(format);
            Ok(())
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("svg".parse::<OutputFormat>(), Ok(OutputFormat::Svg));
        assert_eq!(" PNG".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("pdf".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert!("gif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Svg.to_string(), "svg");
        assert_eq!(OutputFormat::Png.to_string(), "png");
        assert_eq!(OutputFormat::Pdf.to_string(), "pdf");
    }

    #[test]
    fn test_render_all_runs_every_format() {
        let renderer = RecordingRenderer::new(None);
        let targets = vec![
            (OutputFormat::Svg, PathBuf::from("out.svg")),
            (OutputFormat::Png, PathBuf::from("out.png")),
            (OutputFormat::Pdf, PathBuf::from("out.pdf")),
        ];

        render_all(&renderer, Path::new("graph.dot"), &targets).unwrap();

        let mut rendered = renderer.rendered.into_inner().unwrap();
        rendered.sort();
        assert_eq!(
            rendered,
            vec![OutputFormat::Svg, OutputFormat::Png, OutputFormat::Pdf]
        );
    }

    #[test]
    fn test_render_all_reports_failure() {
        let renderer = RecordingRenderer::new(Some(OutputFormat::Png));
        let targets = vec![
            (OutputFormat::Svg, PathBuf::from("out.svg")),
            (OutputFormat::Png, PathBuf::from("out.png")),
        ];

        let result = render_all(&renderer, Path::new("graph.dot"), &targets);
        assert!(matches!(result, Err(RenderError::MalformedGeometry { .. })));
        assert_eq!(
            renderer.rendered.into_inner().unwrap(),
            vec![OutputFormat::Svg]
        );
    }

    #[test]
    fn test_render_all_without_targets() {
        let renderer = RecordingRenderer::new(None);
        render_all(&renderer, Path::new("graph.dot"), &[]).unwrap();
        assert!(renderer.rendered.into_inner().unwrap().is_empty());
    }
}
