//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Two configuration scopes share one schema:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (applied by the caller)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$COMMITVIZ_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/commitviz/config.toml`
//! 3. `~/.commitviz/config.toml`
//!
//! # Repo Config Location
//!
//! `<git_dir>/commitviz.toml`
//!
//! # Example
//!
//! ```no_run
//! use commitviz::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! println!("java: {}", config.java());
//! println!("format: {}", config.format());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::graph::EdgePolicy;
use crate::core::paths::RepoPaths;
use crate::git::commit::MessageStrategy;
use crate::git::lister::ListerKind;

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "COMMITVIZ_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo overrides global,
/// global overrides the built-in default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: FileConfig,
    /// Repository configuration (if a repo file was found)
    pub repo: Option<FileConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads `<git_dir>/commitviz.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. Missing files are not an error.
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global_path = Self::find_global();
        let repo_path = git_dir
            .map(|dir| RepoPaths::new(dir.to_path_buf()).repo_config_path())
            .filter(|path| path.exists());

        Self::load_from(global_path.as_deref(), repo_path.as_deref())
    }

    /// Load configuration from explicit file locations.
    ///
    /// Either path may be `None` to skip that scope.
    pub fn load_from(global: Option<&Path>, repo: Option<&Path>) -> Result<Self, ConfigError> {
        let global_config = match global {
            Some(path) => Self::read_file(path)?,
            None => FileConfig::default(),
        };
        let repo_config = repo.map(Self::read_file).transpose()?;

        global_config.validate()?;
        if let Some(ref r) = repo_config {
            r.validate()?;
        }

        Ok(Config {
            global: global_config,
            repo: repo_config,
            global_path: global.map(Path::to_path_buf),
            repo_path: repo.map(Path::to_path_buf),
        })
    }

    /// Locate the global config file, if any.
    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("commitviz/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".commitviz/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Pick the first value set by the repo file, then the global file.
    fn pick<T: Clone>(&self, field: impl Fn(&FileConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(&field)
            .or_else(|| field(&self.global))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Launcher for the PlantUML jar.
    ///
    /// Defaults to `java`.
    pub fn java(&self) -> String {
        self.pick(|c| c.java.clone())
            .unwrap_or_else(|| "java".to_string())
    }

    /// Git binary for the CLI path lister.
    ///
    /// Defaults to `git`.
    pub fn git(&self) -> String {
        self.pick(|c| c.git.clone())
            .unwrap_or_else(|| "git".to_string())
    }

    /// Output image format.
    ///
    /// Defaults to `png`.
    pub fn format(&self) -> String {
        self.pick(|c| c.format.clone())
            .unwrap_or_else(|| "png".to_string())
    }

    /// Message extraction strategy.
    ///
    /// Defaults to [`MessageStrategy::Legacy`].
    pub fn decoder(&self) -> MessageStrategy {
        self.pick(|c| c.decoder).unwrap_or_default()
    }

    /// Path lister backing the file filter.
    ///
    /// Defaults to [`ListerKind::GitCli`].
    pub fn lister(&self) -> ListerKind {
        self.pick(|c| c.lister).unwrap_or_default()
    }

    /// Edge rewriting policy for the file filter.
    ///
    /// Defaults to [`EdgePolicy::Prune`].
    pub fn edges(&self) -> EdgePolicy {
        self.pick(|c| c.edges).unwrap_or_default()
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
