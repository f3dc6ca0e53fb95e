//! Error types for the canvas-fx core.

use thiserror::Error;

/// Errors produced by animator and surface operations.
#[derive(Debug, Error)]
pub enum FxError {
    /// Width or height was zero (or not finite) when sizing a surface or animator.
    #[error("invalid dimensions: width and height must be positive, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A params object was not valid JSON.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// An animator name was not recognized by the registry.
    #[error("unknown animator: {0}")]
    UnknownAnimator(String),

    /// The host could not provide a drawing surface (e.g. no 2d context).
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Writing a snapshot or reading a seed file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
