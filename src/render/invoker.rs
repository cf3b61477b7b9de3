//! render::invoker
//!
//! Writing the description artifact and handing it to PlantUML.
//!
//! The renderer is an opaque external process. Its exit status is reported
//! back to the caller as-is; nothing here decides whether a non-zero exit
//! is fatal.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::info;

use super::plantuml::EXTENSION;

/// Errors from producing output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The description file could not be written.
    #[error("failed to write graph description '{path}': {source}")]
    WriteArtifact {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The renderer could not be started.
    #[error("failed to run renderer '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Path of the description artifact for a given image path.
///
/// The description sits next to the image with the same base name, e.g.
/// `out/graph.png` pairs with `out/graph.uml`.
pub fn artifact_path(image: &Path) -> PathBuf {
    image.with_extension(EXTENSION)
}

/// Write `text` to `path`, creating parent directories as needed.
pub fn write_artifact(path: &Path, text: &str) -> Result<(), RenderError> {
    let wrap = |e| RenderError::WriteArtifact {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, text).map_err(wrap)?;

    info!(path = %path.display(), bytes = text.len(), "wrote graph description");
    Ok(())
}

/// Anything that can turn a description file into an image.
pub trait Renderer {
    /// Render `source` into `out_dir`.
    ///
    /// Returns the renderer's exit status without interpreting it.
    fn render(&self, source: &Path, out_dir: &Path) -> Result<ExitStatus, RenderError>;
}

/// PlantUML run as `<java> -jar <jar> -t<format> <source> -o <out_dir>`.
#[derive(Debug, Clone)]
pub struct PlantUmlRenderer {
    java: String,
    jar: PathBuf,
    format: String,
}

impl PlantUmlRenderer {
    /// Create a renderer for the PlantUML jar at `jar`.
    pub fn new(java: impl Into<String>, jar: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
            format: format.into(),
        }
    }

    fn command(&self, source: &Path, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg("-jar")
            .arg(&self.jar)
            .arg(format!("-t{}", self.format))
            .arg(source)
            .arg("-o")
            .arg(out_dir);
        cmd
    }
}

impl Renderer for PlantUmlRenderer {
    fn render(&self, source: &Path, out_dir: &Path) -> Result<ExitStatus, RenderError> {
        info!(source = %source.display(), out_dir = %out_dir.display(), "invoking PlantUML");
        self.command(source, out_dir)
            .status()
            .map_err(|e| RenderError::Spawn {
                program: self.java.clone(),
                source: e,
            })
    }
}
