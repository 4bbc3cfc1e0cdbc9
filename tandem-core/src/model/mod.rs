mod connection;
mod role;
mod signaling;

pub use connection::ConnectionId;
pub use role::Role;
pub use signaling::{Frame, IceServerConfig, KEEPALIVE_PING, KEEPALIVE_PONG, SignalMessage};
