//! The user's default dialect and markup options, kept in a TOML file.
//!
//! ```toml
//! dialect = "mediawiki"
//!
//! [options]
//! internal-link-pattern = "/pages/{0}.html"
//! newlines-cause-line-break = true
//! ```

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wikitext_engine::{ConfigurationError, Dialect, DialectName, MarkupOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read wikitext config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid wikitext config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Default dialect and the options it is created with. Missing options
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub dialect: DialectName,
    #[serde(default)]
    pub options: MarkupOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DialectName::Textile,
            options: MarkupOptions::default(),
        }
    }
}

impl Config {
    /// The config at `path`, which may start with `~` or contain `$VAR`.
    ///
    /// Returns `Ok(None)` when there is no such file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>, ConfigError> {
        let path = expand_path(path.as_ref());
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Writes the config, creating missing parent directories.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = expand_path(path.as_ref());
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    /// `~/.config/wikitext/config.toml`
    pub fn config_path() -> PathBuf {
        expand_path(Path::new("~/.config/wikitext")).join("config.toml")
    }

    /// Assembles the configured dialect.
    pub fn dialect(&self) -> Result<Dialect, ConfigurationError> {
        self.dialect.create(self.options.clone())
    }
}

/// Expands `~` and environment variables; a path that cannot be expanded,
/// such as one naming an unset variable, is returned as given.
pub fn expand_path(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    shellexpand::full(&text)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .unwrap_or_else(|_| path.to_path_buf())
}
