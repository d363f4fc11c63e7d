//! Error types for the popup rendering surface.

use thiserror::Error;

/// Failure reported by a [`RenderSurface`](crate::surface::RenderSurface).
///
/// The controller never propagates these to the host: a failed render is
/// logged and treated as "nothing to show".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface could not be created or has already gone away.
    #[error("popup surface unavailable: {0}")]
    Unavailable(String),
    /// The surface refused the text written into it.
    #[error("popup surface rejected write: {0}")]
    WriteRejected(String),
    /// The surface could not be positioned in the requested way.
    #[error("popup surface could not be placed: {0}")]
    Placement(String),
}
