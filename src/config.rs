//! `sift.toml` configuration

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::snippet::{FileSnippets, MemorySnippets, SnippetProvider};

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "sift.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub snippets: SnippetConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    /// Template directory; the bundled set is used when unset
    pub dir: Option<PathBuf>,

    /// Extension of template files and of generated output
    pub extension: String,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            dir: None,
            extension: "ts".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for compiled scripts; stdout when unset
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded configuration");
        Self::from_toml(&text)
    }

    /// Loads `path`, or `sift.toml` from the working directory if present.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(CONFIG_FILE).is_file() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Snippet provider described by this configuration.
    pub fn snippet_provider(&self) -> Box<dyn SnippetProvider> {
        match &self.snippets.dir {
            Some(dir) => {
                let snippets =
                    FileSnippets::new(dir).with_extension(self.snippets.extension.clone());
                let missing = snippets.missing();
                if !missing.is_empty() {
                    warn!(dir = %dir.display(), ?missing, "snippet directory is incomplete");
                }
                Box::new(snippets)
            }
            None => Box::new(MemorySnippets::builtin()),
        }
    }

    /// This configuration with templates read from `dir`.
    pub fn with_snippets_dir(&self, dir: impl Into<PathBuf>) -> Self {
        let mut config = self.clone();
        config.snippets.dir = Some(dir.into());
        config
    }

    /// Where `sift compile` writes the result for `script`, if anywhere.
    pub fn output_path(&self, script: &Path) -> Option<PathBuf> {
        let dir = self.output.dir.as_ref()?;
        let stem = script.file_stem()?;
        Some(dir.join(stem).with_extension(&self.snippets.extension))
    }
}
