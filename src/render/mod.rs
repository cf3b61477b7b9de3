//! render
//!
//! Output side of the pipeline.
//!
//! # Modules
//!
//! - [`plantuml`] - Serialize a graph as PlantUML text
//! - [`invoker`] - Write the text artifact and run the renderer

pub mod invoker;
pub mod plantuml;

pub use invoker::{artifact_path, write_artifact, PlantUmlRenderer, RenderError, Renderer};
pub use plantuml::serialize;
