use tandem_core::FrameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("webrtc error: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error("invalid candidate payload: {0}")]
    InvalidCandidate(#[from] serde_json::Error),

    /// The engine refused a descriptor or candidate.
    #[error("rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("signaling transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
