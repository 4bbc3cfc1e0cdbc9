use crate::error::EngineError;
use async_trait::async_trait;
use serde_json::Value;

mod webrtc_engine;

pub use webrtc_engine::WebRtcEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionKind {
    Offer,
    Answer,
}

/// An offer or answer. The SDP body is opaque to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: DescriptionKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: DescriptionKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: DescriptionKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// Things the engine reports on its own schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A locally gathered path candidate, ready to send to the peer.
    LocalCandidate(Value),
    SessionLive,
    SessionFailed,
}

/// The peer-to-peer session primitives the agent drives.
///
/// Events are delivered on the channel handed to the implementation when it
/// is constructed.
#[async_trait]
pub trait NegotiationEngine: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, EngineError>;

    async fn create_answer(&self) -> Result<SessionDescription, EngineError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn add_remote_candidate(&self, candidate: Value) -> Result<(), EngineError>;

    async fn close(&self) -> Result<(), EngineError>;
}
