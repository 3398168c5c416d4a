//! Graphviz `dot` as layout and render engine.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use super::{LayoutEngine, OutputFormat, RenderError, Renderer};

/// Runs the Graphviz `dot` executable.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: PathBuf,
}

impl Graphviz {
    /// Creates an engine using the given `dot` executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the executable this engine runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, command: &mut Command) -> Result<Output, RenderError> {
        let program = self.program.display().to_string();
        debug!("Running {:?}", command);

        let output = command.output().map_err(|source| RenderError::Spawn {
            program: program.clone(),
            source,
        })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(RenderError::Tool {
                program,
                status: output.status,
                output: combined.trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl LayoutEngine for Graphviz {
    fn layout(&self, graph: &Path) -> Result<String, RenderError> {
        let output = self.run(Command::new(&self.program).arg(graph))?;
        Ok(String::from_utf8(output.stdout)?)
    }
}

impl Renderer for Graphviz {
    fn render(
        &self,
        graph: &Path,
        format: OutputFormat,
        output: &Path,
    ) -> Result<(), RenderError> {
        let mut out_arg = std::ffi::OsString::from("-o");
        out_arg.push(output);

        self.run(
            Command::new(&self.program)
                .arg(format!("-T{}", format))
                .arg(out_arg)
                .arg(graph),
        )?;
        Ok(())
    }
}
