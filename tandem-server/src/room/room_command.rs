use crate::room::RoomSnapshot;
use tandem_core::ConnectionId;
use tokio::sync::oneshot;

/// Commands delivered to the room by the signaling endpoint.
#[derive(Debug)]
pub enum RoomCommand {
    /// A new connection was accepted. It has no role yet.
    Connect { conn: ConnectionId },

    /// One text frame received from `conn`, exactly as it arrived.
    Inbound { conn: ConnectionId, text: String },

    /// The connection's socket is gone.
    Disconnect { conn: ConnectionId },

    /// Report current occupancy.
    Snapshot { reply: oneshot::Sender<RoomSnapshot> },
}
