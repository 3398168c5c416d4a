//! Line counter backed by `scc`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::CountError;

/// Per-language totals reported by a line counter.
///
/// # Example
///
/// ```
/// use modscope::loc::LanguageCount;
///
/// let json = r#"[{"Name": "Go", "Code": 120, "Comment": 14, "Blank": 20, "Count": 3}]"#;
/// let counts: Vec<LanguageCount> = serde_json::from_str(json).unwrap();
/// assert_eq!(counts[0].name, "Go");
/// assert_eq!(counts[0].code, 120);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageCount {
    /// Language name as reported by the counter (e.g., "Go").
    #[serde(rename = "Name")]
    pub name: String,

    /// Lines of code, excluding comments and blanks.
    #[serde(rename = "Code")]
    pub code: u64,
}

impl LanguageCount {
    /// Creates a language count.
    pub fn new(name: impl Into<String>, code: u64) -> Self {
        Self {
            name: name.into(),
            code,
        }
    }
}

/// Counts code lines in a batch of files.
///
/// Implementations are called concurrently from the worker pool.
pub trait LineCounter: Sync {
    /// Counts the given files and returns one record per detected language.
    fn count(&self, files: &[PathBuf]) -> Result<Vec<LanguageCount>, CountError>;
}

/// [`LineCounter`] that runs `scc --format json <files...>`.
#[derive(Debug, Clone)]
pub struct SccCounter {
    program: PathBuf,
}

impl SccCounter {
    /// Creates a counter using the given `scc` executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the executable this counter runs.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for SccCounter {
    fn default() -> Self {
        Self::new("scc")
    }
}

impl LineCounter for SccCounter {
    fn count(&self, files: &[PathBuf]) -> Result<Vec<LanguageCount>, CountError> {
        let program = self.program.display().to_string();
        let output = Command::new(&self.program)
            .args(["--format", "json"])
            .args(files)
            .output()
            .map_err(|source| CountError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CountError::Tool {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scc_output_ignores_extra_fields() {
        let json = r#"[
            {"Name": "Go", "Bytes": 5120, "CodeBytes": 0, "Lines": 180, "Code": 140,
             "Comment": 20, "Blank": 20, "Complexity": 31, "Count": 2, "Files": []},
            {"Name": "Go Template", "Code": 12, "Lines": 14}
        ]"#;
        let counts: Vec<LanguageCount> = serde_json::from_str(json).unwrap();
        assert_eq!(
            counts,
            vec![
                LanguageCount::new("Go", 140),
                LanguageCount::new("Go Template", 12)
            ]
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let counter = SccCounter::new("/nonexistent/modscope-scc");
        let result = counter.count(&[PathBuf::from("main.go")]);
        assert!(matches!(result, Err(CountError::Spawn { .. })));
    }

    #[test]
    fn test_default_program() {
        assert_eq!(SccCounter::default().program(), Path::new("scc"));
    }
}
