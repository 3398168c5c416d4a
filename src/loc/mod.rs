//! Line-count module for modscope.
//!
//! This module counts code lines per module by running an external counter
//! over batches of source files in parallel.
//!
//! # Example
//!
//! ```ignore
//! use modscope::loc::{count_lines, CountConfig, SccCounter};
//!
//! let metrics = count_lines(&SccCounter::default(), graph.files_by_module(), &CountConfig::default())?;
//! println!("{} lines of Go", metrics.total_lines());
//! ```

pub mod aggregate;
pub mod scc;

pub use aggregate::{
    count_batch, count_lines, plan_batches, Batch, BatchResult, CountConfig, ModuleMetrics,
    DEFAULT_BATCH_SIZE,
};
pub use scc::{LanguageCount, LineCounter, SccCounter};

/// Errors that can occur while counting lines.
#[derive(Debug, thiserror::Error)]
pub enum CountError {
    /// Failed to spawn the counter.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The counter exited with a non-zero status.
    #[error("{program} exited with {status}: {stderr}")]
    Tool {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The counter output was not valid JSON.
    #[error("Failed to parse line counter output: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The counter output had no record for the expected language.
    #[error("No {language} lines reported for batch {batch} of module {module}")]
    MissingLanguage {
        language: String,
        module: String,
        batch: usize,
    },

    /// The counter reported zero lines for a batch that has files.
    #[error("Zero {language} lines reported for batch {batch} of module {module}")]
    EmptyCount {
        language: String,
        module: String,
        batch: usize,
    },

    /// Workers stopped before every batch was reported.
    #[error("Line counter workers exited after {received} of {expected} batches")]
    WorkerLost { expected: usize, received: usize },
}
