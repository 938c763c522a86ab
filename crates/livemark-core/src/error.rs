use crate::edits::ActionId;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by the rendering engine.
pub enum EditorError {
    #[error("unknown or expired action {0}")]
    /// The dispatched action was not bound by the current render.
    UnknownAction(ActionId),

    #[error("invalid transformer pattern: {0}")]
    /// A text transformer pattern failed to compile.
    Pattern(#[from] regex::Error),
}

/// Result alias for [`EditorError`].
pub type Result<T> = std::result::Result<T, EditorError>;
