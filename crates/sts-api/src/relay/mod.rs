//! Best-effort fan-out of client events to every other open socket.

mod handler;
mod hub;

pub use handler::ws_handler;
pub use hub::{ConnectionId, RelayHub, RelaySender};
