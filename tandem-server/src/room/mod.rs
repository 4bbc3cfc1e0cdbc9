mod room;
mod room_command;
mod slots;

pub use room::*;
pub use room_command::*;
pub use slots::*;
