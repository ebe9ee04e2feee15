use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::registry::ExceptionRegistry;

/// File name looked up in the working directory when no config is given.
pub const DEFAULT_CONFIG_FILE: &str = "spancheck.toml";

/// Contents of a `spancheck.toml` file.
///
/// ```toml
/// fixtures = "test/markup"
///
/// [highlighter]
/// command = "node"
/// args = ["tools/highlight-server.js"]
/// timeout_ms = 5000
///
/// [exceptions]
/// javascript = ["template-literal"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarnessConfig {
    /// Fixture root, relative to the working directory.
    #[serde(default)]
    pub fixtures: Option<PathBuf>,

    #[serde(default)]
    pub highlighter: Option<HighlighterCommand>,

    /// Language name to fixture names exempt from the line-by-line check.
    #[serde(default)]
    pub exceptions: ExceptionRegistry,
}

/// How to start an external highlighter process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HighlighterCommand {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Per-call deadline in milliseconds. No deadline when absent.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl HighlighterCommand {
    pub fn new(command: impl Into<String>) -> Self {
        HighlighterCommand {
            command: command.into(),
            args: Vec::new(),
            timeout_ms: None,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl HarnessConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let content = content.trim_start_matches('\u{feff}');
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if given, else the default file when it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
