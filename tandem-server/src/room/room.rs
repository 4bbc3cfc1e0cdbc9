use crate::room::room_command::RoomCommand;
use crate::room::slots::{Claimed, JoinRejected, RoomSlots, SlotsSnapshot};
use crate::signaling::SignalingOutput;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tandem_core::{ConnectionId, Frame, FrameError, KEEPALIVE_PONG, Role, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomSnapshot {
    #[serde(flatten)]
    pub slots: SlotsSnapshot,
    pub connections: usize,
}

/// The pairing room actor.
///
/// All slot mutations and relay lookups happen inside `handle_command`, which
/// runs for one command at a time.
pub struct Room {
    slots: RoomSlots,
    connections: HashSet<ConnectionId>,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl Room {
    pub fn new(command_rx: mpsc::Receiver<RoomCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            slots: RoomSlots::new(),
            connections: HashSet::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Room event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room event loop finished");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Connect { conn } => {
                self.connections.insert(conn);
                info!("Client {} connected. Waiting for role announcement", conn);
            }

            RoomCommand::Inbound { conn, text } => self.handle_inbound(conn, text).await,

            RoomCommand::Disconnect { conn } => {
                self.connections.remove(&conn);
                match self.slots.release(&conn) {
                    Some(role) => info!("Client {} ({}) disconnected, slot cleared", conn, role),
                    None => info!("Client {} (unassigned) disconnected", conn),
                }
            }

            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(RoomSnapshot {
                    slots: self.slots.snapshot(),
                    connections: self.connections.len(),
                });
            }
        }
    }

    async fn handle_inbound(&mut self, conn: ConnectionId, text: String) {
        let frame = match Frame::decode(&text) {
            Ok(frame) => frame,
            Err(FrameError::InvalidJoin(role)) => {
                warn!("[Assignment] Role {} is invalid. Disconnecting {}", role, conn);
                self.reject(&conn).await;
                return;
            }
            Err(FrameError::Malformed(e)) => {
                warn!("Dropping malformed frame from {}: {}", conn, e);
                return;
            }
        };

        match frame {
            Frame::Ping => {
                self.signaling
                    .send_text(&conn, KEEPALIVE_PONG.to_owned())
                    .await
            }
            Frame::Pong => debug!("Unsolicited pong from {}", conn),
            Frame::Signal(SignalMessage::Join { role }) => self.handle_join(conn, role).await,
            Frame::Signal(signal) => self.relay(conn, text, &signal).await,
        }
    }

    async fn handle_join(&mut self, conn: ConnectionId, role: Role) {
        match self.slots.claim(role, conn) {
            Ok(Claimed::Waiting) => {
                info!("[Assignment] Client {} registered as {}", conn, role);
            }
            Ok(Claimed::Filled { initiator }) => {
                info!("[Assignment] Client {} registered as {}", conn, role);
                info!("[Notification] Both peers present. Notifying initiator {}", initiator);
                self.notify_initiator(initiator).await;
            }
            Err(JoinRejected::SlotTaken(role)) => {
                warn!("[Assignment] Role {} already taken. Disconnecting {}", role, conn);
                self.reject(&conn).await;
            }
            Err(JoinRejected::AlreadyAssigned(held)) => {
                warn!(
                    "[Assignment] Duplicate join from {} (already {}). Disconnecting",
                    conn, held
                );
                self.reject(&conn).await;
            }
        }
    }

    async fn notify_initiator(&self, initiator: ConnectionId) {
        if !self.signaling.is_open(&initiator) {
            warn!("Initiator {} is not open; initiate not sent", initiator);
            return;
        }
        match Frame::Signal(SignalMessage::Initiate).encode() {
            Ok(text) => self.signaling.send_text(&initiator, text).await,
            Err(e) => error!("Failed to serialize initiate: {}", e),
        }
    }

    /// Forwards `text` untouched to the occupant of the sender's opposite slot.
    async fn relay(&self, conn: ConnectionId, text: String, signal: &SignalMessage) {
        let Some(role) = self.slots.role_of(&conn) else {
            warn!(
                "Dropping {} from {}: connection has no role",
                signal.kind(),
                conn
            );
            return;
        };
        let Some(target) = self.slots.peer_of(role) else {
            debug!("No {} present; {} from {} dropped", role.other(), signal.kind(), role);
            return;
        };
        if !self.signaling.is_open(&target) {
            debug!("{} {} is not open; {} dropped", role.other(), target, signal.kind());
            return;
        }

        debug!("Relaying {} from {} to {}", signal.kind(), role, role.other());
        self.signaling.send_text(&target, text).await;
    }

    async fn reject(&mut self, conn: &ConnectionId) {
        if let Some(role) = self.slots.release(conn) {
            info!("Slot {} released by rejected client {}", role, conn);
        }
        self.signaling.close(conn).await;
    }
}
