//! Error types for tree descriptions.

use arrange_core::LayoutError;
use thiserror::Error;

/// Error type for loading a tree description.
#[derive(Debug, Error)]
pub enum ParseError {
    /// YAML syntax or shape error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON syntax or shape error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value the layout tree rejected
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The description is well-formed but inconsistent
    #[error("Validation error: {0}")]
    Validation(String),
}
