use crate::engine::{DescriptionKind, EngineEvent, NegotiationEngine, SessionDescription};
use crate::error::EngineError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tandem_core::IceServerConfig;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

const DATA_CHANNEL_LABEL: &str = "tandem";

/// [`NegotiationEngine`] backed by a webrtc-rs peer connection.
pub struct WebRtcEngine {
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: Mutex<Option<Arc<RTCDataChannel>>>,
}

impl WebRtcEngine {
    /// Builds the peer connection. Candidates and state changes are pushed
    /// into `event_tx` for the agent.
    pub async fn new(
        ice_servers: &[IceServerConfig],
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    let event = match s {
                        RTCPeerConnectionState::Connected => EngineEvent::SessionLive,
                        RTCPeerConnectionState::Failed => EngineEvent::SessionFailed,
                        _ => return,
                    };
                    let _ = tx.send(event).await;
                })
            },
        ));

        let ice_tx = event_tx;
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else {
                    debug!("Local candidate gathering complete");
                    return;
                };
                let json = match candidate.to_json() {
                    Ok(init) => serde_json::to_value(init),
                    Err(e) => {
                        warn!("Failed to serialize local candidate: {}", e);
                        return;
                    }
                };
                match json {
                    Ok(value) => {
                        let _ = tx.send(EngineEvent::LocalCandidate(value)).await;
                    }
                    Err(e) => warn!("Failed to encode local candidate: {}", e),
                }
            })
        }));

        Ok(Self {
            peer_connection,
            data_channel: Mutex::new(None),
        })
    }

    fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, EngineError> {
        let rtc = match desc.kind {
            DescriptionKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
            DescriptionKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
        };
        Ok(rtc)
    }
}

#[async_trait]
impl NegotiationEngine for WebRtcEngine {
    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        // The offer needs at least one section; media tracks are attached elsewhere.
        let mut channel = self.data_channel.lock().await;
        if channel.is_none() {
            let dc = self
                .peer_connection
                .create_data_channel(DATA_CHANNEL_LABEL, None)
                .await?;
            *channel = Some(dc);
        }
        drop(channel);

        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        let rtc = Self::to_rtc(desc)?;
        self.peer_connection.set_local_description(rtc).await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        let rtc = Self::to_rtc(desc)?;
        self.peer_connection.set_remote_description(rtc).await?;
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: Value) -> Result<(), EngineError> {
        let init: RTCIceCandidateInit = serde_json::from_value(candidate)?;
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
