use crate::engine::{EngineEvent, NegotiationEngine};
use serde_json::Value;
use std::sync::Arc;
use tandem_core::{Role, SignalMessage};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

mod handle_engine_event_impl;
mod handle_signal_impl;

/// Where one participant stands in the offer/answer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPhase {
    Idle,
    AwaitingRemoteDescription,
    HaveRemoteDescription,
    Connected,
    Failed,
}

/// Per-participant negotiation state machine.
///
/// Consumes relayed signals, drives the engine, and emits the signals the
/// peer needs through `outbound`.
pub struct NegotiationAgent {
    role: Role,
    phase: AgentPhase,
    engine: Arc<dyn NegotiationEngine>,
    outbound: mpsc::UnboundedSender<SignalMessage>,
    /// Remote candidates that arrived before any remote description.
    pending_candidates: Vec<Value>,
    remote_description_set: bool,
    phase_tx: watch::Sender<AgentPhase>,
}

impl NegotiationAgent {
    pub fn new(
        role: Role,
        engine: Arc<dyn NegotiationEngine>,
        outbound: mpsc::UnboundedSender<SignalMessage>,
    ) -> Self {
        let (phase_tx, _) = watch::channel(AgentPhase::Idle);

        Self {
            role,
            phase: AgentPhase::Idle,
            engine,
            outbound,
            pending_candidates: Vec::new(),
            remote_description_set: false,
            phase_tx,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn subscribe(&self) -> watch::Receiver<AgentPhase> {
        self.phase_tx.subscribe()
    }

    /// Serves relayed signals and engine events until the signal channel
    /// closes. Signals queue in their channel while an engine call is running.
    pub async fn run(
        mut self,
        mut signals: mpsc::UnboundedReceiver<SignalMessage>,
        mut events: mpsc::Receiver<EngineEvent>,
    ) -> AgentPhase {
        info!("Negotiation agent started as {}", self.role);
        let mut events_open = true;

        loop {
            tokio::select! {
                signal = signals.recv() => match signal {
                    Some(s) => self.handle_signal(s).await,
                    None => break,
                },

                event = events.recv(), if events_open => match event {
                    Some(e) => self.handle_engine_event(e).await,
                    None => {
                        debug!("Engine event channel closed");
                        events_open = false;
                    }
                },
            }
        }

        info!("Negotiation agent stopped in {:?}", self.phase);
        self.phase
    }

    fn set_phase(&mut self, phase: AgentPhase) {
        if self.phase != phase {
            debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.phase_tx.send_replace(phase);
        }
    }

    fn send(&self, msg: SignalMessage) {
        let kind = msg.kind();
        if self.outbound.send(msg).is_err() {
            debug!("Signaling connection gone; {} not sent", kind);
        }
    }
}
