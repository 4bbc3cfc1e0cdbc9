pub mod initiator_tests;
pub mod responder_tests;

use std::sync::Arc;
use tandem_client::NegotiationAgent;
use tandem_core::{Role, SignalMessage};
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::MockEngine;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_agent(
    role: Role,
) -> (
    NegotiationAgent,
    MockEngine,
    mpsc::UnboundedReceiver<SignalMessage>,
) {
    init_tracing();
    let engine = MockEngine::new();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let agent = NegotiationAgent::new(role, Arc::new(engine.clone()), outbound_tx);
    (agent, engine, outbound_rx)
}

pub fn offer(sdp: &str) -> SignalMessage {
    SignalMessage::Offer { sdp: sdp.to_owned() }
}

pub fn answer(sdp: &str) -> SignalMessage {
    SignalMessage::Answer { sdp: sdp.to_owned() }
}

pub fn candidate(n: u32) -> SignalMessage {
    SignalMessage::Candidate {
        candidate: candidate_value(n),
    }
}

pub fn candidate_value(n: u32) -> serde_json::Value {
    serde_json::json!({
        "candidate": format!("candidate:{n} 1 udp 2122260223 10.0.0.{n} 5000 typ host"),
        "sdpMid": "0",
        "sdpMLineIndex": 0,
    })
}

/// Everything the agent has emitted so far.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<SignalMessage>) -> Vec<SignalMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}
