use crate::room::{RoomCommand, RoomSnapshot};
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::ConnectionId;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

struct SignalingInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) room_cmd_tx: mpsc::Sender<RoomCommand>,
}

impl SignalingService {
    pub fn new(room_cmd_tx: mpsc::Sender<RoomCommand>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
            }),
            room_cmd_tx,
        }
    }

    pub fn add_connection(&self, conn: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(conn, tx);
    }

    pub fn remove_connection(&self, conn: &ConnectionId) {
        self.inner.connections.remove(conn);
    }

    /// Asks every open socket to close. Used on server shutdown.
    pub fn close_all(&self) {
        for entry in self.inner.connections.iter() {
            let _ = entry.value().send(Message::Close(None));
        }
    }

    pub async fn snapshot(&self) -> anyhow::Result<RoomSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.room_cmd_tx.send(RoomCommand::Snapshot { reply }).await?;
        Ok(rx.await?)
    }

    fn send_message(&self, conn: &ConnectionId, msg: Message) {
        if let Some(tx) = self.inner.connections.get(conn) {
            if let Err(e) = tx.send(msg) {
                error!("Failed to queue WS message for {}: {:?}", conn, e);
            }
        } else {
            warn!("Attempted to send to disconnected client {}", conn);
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_text(&self, conn: &ConnectionId, text: String) {
        self.send_message(conn, Message::Text(text.into()));
    }

    async fn close(&self, conn: &ConnectionId) {
        self.send_message(conn, Message::Close(None));
    }

    fn is_open(&self, conn: &ConnectionId) -> bool {
        self.inner
            .connections
            .get(conn)
            .is_some_and(|tx| !tx.is_closed())
    }
}
