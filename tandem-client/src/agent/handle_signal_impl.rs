use crate::agent::{AgentPhase, NegotiationAgent};
use crate::engine::SessionDescription;
use serde_json::Value;
use tandem_core::{Role, SignalMessage};
use tracing::{debug, error, info, warn};

impl NegotiationAgent {
    pub async fn handle_signal(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::Initiate => {
                if self.role != Role::Initiator || self.phase != AgentPhase::Idle {
                    self.ignore("initiate");
                    return;
                }
                self.start_offer().await;
            }

            SignalMessage::Offer { sdp } => {
                if self.role != Role::Responder || self.phase != AgentPhase::Idle {
                    self.ignore("offer");
                    return;
                }
                self.accept_offer(sdp).await;
            }

            SignalMessage::Answer { sdp } => {
                if self.role != Role::Initiator
                    || self.phase != AgentPhase::AwaitingRemoteDescription
                {
                    self.ignore("answer");
                    return;
                }
                self.accept_answer(sdp).await;
            }

            SignalMessage::Candidate { candidate } => self.accept_candidate(candidate).await,

            SignalMessage::Join { .. } => self.ignore("join"),
        }
    }

    async fn start_offer(&mut self) {
        let offer = match self.engine.create_offer().await {
            Ok(offer) => offer,
            Err(e) => {
                error!("Failed to create offer: {}", e);
                return;
            }
        };
        if let Err(e) = self.engine.set_local_description(offer.clone()).await {
            error!("Failed to apply local offer: {}", e);
            return;
        }

        info!("Sending offer");
        self.send(SignalMessage::Offer { sdp: offer.sdp });
        self.set_phase(AgentPhase::AwaitingRemoteDescription);
    }

    async fn accept_offer(&mut self, sdp: String) {
        if let Err(e) = self
            .engine
            .set_remote_description(SessionDescription::offer(sdp))
            .await
        {
            warn!("Remote offer rejected: {}", e);
            return;
        }
        self.remote_description_set = true;

        let answer = match self.engine.create_answer().await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Failed to create answer: {}", e);
                return;
            }
        };
        if let Err(e) = self.engine.set_local_description(answer.clone()).await {
            error!("Failed to apply local answer: {}", e);
            return;
        }

        info!("Sending answer");
        self.send(SignalMessage::Answer { sdp: answer.sdp });
        self.set_phase(AgentPhase::HaveRemoteDescription);
        self.flush_pending_candidates().await;
    }

    async fn accept_answer(&mut self, sdp: String) {
        if let Err(e) = self
            .engine
            .set_remote_description(SessionDescription::answer(sdp))
            .await
        {
            warn!("Remote answer rejected: {}", e);
            return;
        }
        self.remote_description_set = true;

        info!("Remote answer applied");
        self.set_phase(AgentPhase::HaveRemoteDescription);
        self.flush_pending_candidates().await;
    }

    async fn accept_candidate(&mut self, candidate: Value) {
        if candidate.is_null() {
            debug!("Peer finished gathering candidates");
            return;
        }
        if self.phase == AgentPhase::Failed {
            self.ignore("candidate");
            return;
        }
        if !self.remote_description_set {
            debug!("Holding remote candidate until a remote description is set");
            self.pending_candidates.push(candidate);
            return;
        }
        self.add_candidate(candidate).await;
    }

    async fn flush_pending_candidates(&mut self) {
        let pending = std::mem::take(&mut self.pending_candidates);
        if !pending.is_empty() {
            debug!("Applying {} held candidates", pending.len());
        }
        for candidate in pending {
            self.add_candidate(candidate).await;
        }
    }

    async fn add_candidate(&self, candidate: Value) {
        if let Err(e) = self.engine.add_remote_candidate(candidate).await {
            warn!("Failed to add remote candidate: {}", e);
        }
    }

    fn ignore(&self, kind: &str) {
        warn!(
            "Ignoring {} received as {} in {:?}",
            kind, self.role, self.phase
        );
    }
}
