//! Run configuration.
//!
//! Every tunable lives in [`Config`]: the external tool paths, the
//! line-count settings and the visual constants. All sections have defaults
//! and can be overridden from a TOML file, then from the command line.
//!
//! ```toml
//! [tools]
//! dot = "/opt/graphviz/bin/dot"
//!
//! [count]
//! batch_size = 200
//! workers = 8
//!
//! [visual]
//! base_size = 0.5
//! known_hosts = ["github.com", "gitlab.com"]
//!
//! [visual.author_colors.acme]
//! fill = "#D0E0FF"
//! border = "#7090C0"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::loc::CountConfig;
use crate::visual::VisualConfig;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`].
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Paths of the external executables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Go toolchain, used for `go list`
    pub go: PathBuf,
    /// Line counter
    pub scc: PathBuf,
    /// Graphviz layout and render engine
    pub dot: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            go: PathBuf::from("go"),
            scc: PathBuf::from("scc"),
            dot: PathBuf::from("dot"),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool paths
    pub tools: ToolPaths,
    /// Line-count stage settings
    pub count: CountConfig,
    /// Node encoding constants
    pub visual: VisualConfig,
}

impl Config {
    /// Loads the config from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses a TOML document, filling unset fields with defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::NodeColor;
    use std::io::Write;

    #[test]
    fn test_load_without_path_returns_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tools.go, PathBuf::from("go"));
        assert_eq!(config.count.batch_size, 300);
        assert_eq!(config.visual.base_size, 0.33);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
[tools]
dot = "/opt/graphviz/bin/dot"

[count]
batch_size = 50
"#;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.tools.dot, PathBuf::from("/opt/graphviz/bin/dot"));
        assert_eq!(config.tools.scc, PathBuf::from("scc"));
        assert_eq!(config.count.batch_size, 50);
        assert_eq!(config.count.language, "Go");
        assert_eq!(config.visual, VisualConfig::default());
    }

    #[test]
    fn test_visual_overrides() {
        let toml_str = r##"
[visual]
wrap_at = 20
known_hosts = ["github.com", "gitlab.com"]

[visual.hashed_colors]
seed = 7

[visual.author_colors.acme]
fill = "#D0E0FF"
border = "#7090C0"
"##;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.visual.wrap_at, 20);
        assert_eq!(config.visual.known_hosts.len(), 2);
        assert_eq!(config.visual.hashed_colors.seed, 7);
        assert_eq!(config.visual.hashed_colors.squeeze, 0.33);
        assert_eq!(
            config.visual.author_colors.get("acme"),
            Some(&NodeColor::new("#D0E0FF", "#7090C0"))
        );
        // A table replaces the curated defaults entirely
        assert!(!config.visual.author_colors.contains_key("stdlib"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[count]\nworkers = 3").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.count.workers, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/modscope.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[count]\nbatch_size = \"many\"").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
