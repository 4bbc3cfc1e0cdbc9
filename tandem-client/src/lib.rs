mod agent;
mod config;
mod connection;
mod engine;
mod error;

pub use agent::{AgentPhase, NegotiationAgent};
pub use config::{ClientConfig, DEFAULT_KEEPALIVE_INTERVAL};
pub use connection::SignalingConnection;
pub use engine::{
    DescriptionKind, EngineEvent, NegotiationEngine, SessionDescription, WebRtcEngine,
};
pub use error::{ClientError, EngineError};
