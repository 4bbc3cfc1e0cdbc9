use crate::error::FrameError;
use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved keepalive probe. Sent as a bare text frame, never as JSON.
pub const KEEPALIVE_PING: &str = "ping";

/// Reserved reply to [`KEEPALIVE_PING`].
pub const KEEPALIVE_PONG: &str = "pong";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Structured signaling record, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    /// Role request. Only valid once, from a connection without a role.
    Join { role: Role },

    /// Server -> initiator: both slots are occupied, start negotiating.
    #[serde(alias = "initiate_call")]
    Initiate,

    Offer { sdp: String },

    Answer { sdp: String },

    /// Network path candidate. The payload is never interpreted by the relay.
    Candidate { candidate: Value },
}

impl SignalMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::Join { .. } => "join",
            SignalMessage::Initiate => "initiate",
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::Candidate { .. } => "candidate",
        }
    }
}

/// Everything that can travel over a signaling connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Ping,
    Pong,
    Signal(SignalMessage),
}

impl Frame {
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        match text {
            KEEPALIVE_PING => return Ok(Frame::Ping),
            KEEPALIVE_PONG => return Ok(Frame::Pong),
            _ => {}
        }

        match serde_json::from_str::<SignalMessage>(text) {
            Ok(signal) => Ok(Frame::Signal(signal)),
            Err(e) => {
                // A join with a bad role is rejected differently from noise.
                let Ok(Value::Object(record)) = serde_json::from_str::<Value>(text) else {
                    return Err(FrameError::Malformed(e));
                };
                if record.get("type").and_then(Value::as_str) == Some("join") {
                    let role = record
                        .get("role")
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "<missing>".to_owned());
                    return Err(FrameError::InvalidJoin(role));
                }
                Err(FrameError::Malformed(e))
            }
        }
    }

    pub fn encode(&self) -> Result<String, FrameError> {
        match self {
            Frame::Ping => Ok(KEEPALIVE_PING.to_owned()),
            Frame::Pong => Ok(KEEPALIVE_PONG.to_owned()),
            Frame::Signal(signal) => Ok(serde_json::to_string(signal)?),
        }
    }
}

impl From<SignalMessage> for Frame {
    fn from(signal: SignalMessage) -> Self {
        Frame::Signal(signal)
    }
}
