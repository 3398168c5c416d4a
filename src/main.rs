use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use modscope::config::Config;
use modscope::pipeline::{self, OutputPaths, Tools};
use modscope::render::OutputFormat;

#[derive(Parser)]
#[command(name = "modscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Go module dependency graphs sized by lines of code", long_about = None)]
struct Cli {
    /// Directory of the Go package to analyze
    root: PathBuf,

    /// SVG output path; other outputs are written next to it
    svg_out: Option<PathBuf>,

    /// Image formats to render
    #[arg(long, value_delimiter = ',', default_value = "svg,png")]
    formats: Vec<OutputFormat>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a JSON summary to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Output directory when no SVG path is given
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Path to the go executable
    #[arg(long, env = "MODSCOPE_GO")]
    go: Option<PathBuf>,

    /// Path to the scc executable
    #[arg(long, env = "MODSCOPE_SCC")]
    scc: Option<PathBuf>,

    /// Path to the Graphviz dot executable
    #[arg(long, env = "MODSCOPE_DOT")]
    dot: Option<PathBuf>,
}

impl Cli {
    /// Rejects an SVG_OUT that would be ignored or overwritten by a sibling output.
    fn validate(&self) -> Result<(), String> {
        let Some(svg) = &self.svg_out else {
            return Ok(());
        };

        if !self.formats.contains(&OutputFormat::Svg) {
            return Err(format!(
                "SVG_OUT {} requires svg in --formats",
                svg.display()
            ));
        }

        let extension = svg
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let collides = extension == "dot"
            || self
                .formats
                .iter()
                .any(|&format| format != OutputFormat::Svg && format.extension() == extension);
        if collides {
            return Err(format!(
                "SVG_OUT {} collides with the .{} output written next to it",
                svg.display(),
                extension
            ));
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    if let Err(message) = cli.validate() {
        Cli::command()
            .error(ErrorKind::ArgumentConflict, message)
            .exit();
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(go) = cli.go {
        config.tools.go = go;
    }
    if let Some(scc) = cli.scc {
        config.tools.scc = scc;
    }
    if let Some(dot) = cli.dot {
        config.tools.dot = dot;
    }

    let paths = match &cli.svg_out {
        Some(svg) => OutputPaths::from_vector_path(svg, &cli.formats),
        None => OutputPaths::for_root(
            &pipeline::project_name(&cli.root),
            &cli.out_dir,
            &cli.formats,
        ),
    }
    .with_json(cli.json);

    let tools = Tools::from_paths(&config.tools);
    let summary = pipeline::run(&cli.root, &paths, &config, &tools)?;
    info!(
        "Rendered {} modules and {} dependencies",
        summary.modules, summary.dependencies
    );

    println!("LOC total: {}", summary.total_lines);
    println!(
        "LOC not counting stdlib: {}",
        summary.total_lines_excluding_stdlib
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("modscope").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["."]);
        assert_eq!(cli.formats, vec![OutputFormat::Svg, OutputFormat::Png]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_svg_out_requires_svg_format() {
        let cli = parse(&[".", "graph.svg", "--formats", "png"]);
        assert!(cli.validate().unwrap_err().contains("requires svg"));
    }

    #[test]
    fn test_svg_out_must_not_collide_with_siblings() {
        assert!(parse(&[".", "graph.dot"]).validate().is_err());
        assert!(parse(&[".", "graph.PNG"]).validate().is_err());
        assert!(parse(&[".", "graph.png", "--formats", "svg"]).validate().is_ok());
        assert!(parse(&[".", "out/graph.svg"]).validate().is_ok());
    }

    #[test]
    fn test_bad_arity_is_rejected() {
        assert!(Cli::try_parse_from(["modscope"]).is_err());
        assert!(Cli::try_parse_from(["modscope", "a", "b.svg", "c"]).is_err());
    }
}
