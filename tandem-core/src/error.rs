use thiserror::Error;

/// Reasons a text frame could not be turned into a [`Frame`](crate::Frame).
#[derive(Debug, Error)]
pub enum FrameError {
    /// A `join` record whose role is missing or is not one of the two slots.
    #[error("join request with invalid role: {0}")]
    InvalidJoin(String),

    #[error("malformed signaling frame: {0}")]
    Malformed(#[from] serde_json::Error),
}
