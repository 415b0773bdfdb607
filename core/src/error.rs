//! Error type shared by every stage of the layout pipeline.
//!
//! Every variant is fatal: the first error aborts the compilation and
//! nothing is launched.

use std::path::PathBuf;

use thiserror::Error;


#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Unknown tag '{tag}'")]
    UnknownTag { tag: String },

    #[error("Unknown preset template name '{name}'")]
    UnknownTemplate { name: String },

    #[error("Template placeholder '${{{key}}}' has no matching preset attribute")]
    UndefinedPlaceholder { key: String },

    #[error("Invalid placeholder in template value '{value}'")]
    InvalidPlaceholder { value: String },

    #[error("Malformed weights: {reason}")]
    MalformedWeights { reason: String },

    #[error("<{tag}> is missing required attribute '{attribute}'")]
    MissingAttribute { tag: String, attribute: String },

    #[error("Invalid value '{value}' for attribute '{attribute}' on <{tag}>")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
    },

    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("Invalid layout structure: {0}")]
    InvalidStructure(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Launch failed: {0}")]
    Launch(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
