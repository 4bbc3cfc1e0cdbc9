use async_trait::async_trait;
use tandem_core::ConnectionId;

/// Outbound side of the connections, as seen by the room.
///
/// Implemented by the WebSocket service; tests substitute a recorder.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue a text frame. Never blocks on the remote end.
    async fn send_text(&self, conn: &ConnectionId, text: String);

    /// Ask the transport to close the connection.
    async fn close(&self, conn: &ConnectionId);

    fn is_open(&self, conn: &ConnectionId) -> bool;
}
