pub use tandem_core::model::{ConnectionId, Role};
pub use tandem_core::{Frame, FrameError, SignalMessage};

pub mod model {
    pub use tandem_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use tandem_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use tandem_client::*;
}
