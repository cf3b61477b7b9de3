//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global file and the repository file;
//! every key is optional so that a file only needs to mention what it
//! overrides.
//!
//! # Validation
//!
//! Values are validated after parsing. Enumerated keys (`decoder`, `lister`,
//! `edges`) are checked by serde itself; free-form keys are checked in
//! [`FileConfig::validate`].

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::graph::EdgePolicy;
use crate::git::commit::MessageStrategy;
use crate::git::lister::ListerKind;

/// Image formats PlantUML can be asked for with `-t<format>`.
pub const IMAGE_FORMATS: &[&str] = &["png", "svg", "txt", "eps", "vdx", "latex"];

/// A single configuration file.
///
/// # Example
///
/// ```toml
/// java = "/usr/lib/jvm/java-17/bin/java"
/// git = "git"
/// format = "svg"
/// decoder = "subject"
/// lister = "libgit2"
/// edges = "prune"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Launcher used to run the PlantUML jar.
    pub java: Option<String>,

    /// Git binary used by the CLI path lister.
    pub git: Option<String>,

    /// Output image format.
    pub format: Option<String>,

    /// How commit messages are extracted.
    pub decoder: Option<MessageStrategy>,

    /// Which path lister backs the file filter.
    pub lister: Option<ListerKind>,

    /// How edges are rewritten by the file filter.
    pub edges: Option<EdgePolicy>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.format {
            if !IMAGE_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid format '{}', must be one of: {}",
                    format,
                    IMAGE_FORMATS.join(", ")
                )));
            }
        }

        for (key, value) in [("java", &self.java), ("git", &self.git)] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "'{}' cannot be empty",
                        key
                    )));
                }
            }
        }

        Ok(())
    }
}
