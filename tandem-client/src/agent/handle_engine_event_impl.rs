use crate::agent::{AgentPhase, NegotiationAgent};
use crate::engine::EngineEvent;
use tandem_core::SignalMessage;
use tracing::{info, warn};

impl NegotiationAgent {
    pub async fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::LocalCandidate(candidate) => {
                self.send(SignalMessage::Candidate { candidate });
            }

            EngineEvent::SessionLive => {
                info!("Peer-to-peer session is live");
                self.set_phase(AgentPhase::Connected);
            }

            EngineEvent::SessionFailed => {
                warn!("Peer-to-peer session failed");
                self.set_phase(AgentPhase::Failed);
            }
        }
    }
}
