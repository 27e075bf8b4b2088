use std::{
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use axum::extract::ws::Message;
use tokio::sync::{RwLock, mpsc};

use crate::metrics;

/// Frames queued per connection before new ones are dropped for that peer
pub const RELAY_QUEUE_CAPACITY: usize = 256;

pub type RelaySender = mpsc::Sender<Message>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Registry of open relay sockets.
///
/// Each entry is the sending half of the channel drained by that socket's
/// writer task. Shared as `Arc<RelayHub>` through `ApiState`.
#[derive(Default)]
pub struct RelayHub {
    next_id: AtomicU64,
    connections: RwLock<HashMap<ConnectionId, RelaySender>>,
}

impl RelayHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection and hand back the receiver its writer task drains
    pub async fn register(&self) -> (ConnectionId, mpsc::Receiver<Message>) {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(RELAY_QUEUE_CAPACITY);

        let count = {
            let mut conns = self.connections.write().await;
            conns.insert(id, tx);
            conns.len()
        };
        metrics::set_relay_connections(count);

        (id, rx)
    }

    pub async fn unregister(&self, id: ConnectionId) {
        let count = {
            let mut conns = self.connections.write().await;
            conns.remove(&id);
            conns.len()
        };
        metrics::set_relay_connections(count);
    }

    /// Send `message` to every connection except `origin`.
    ///
    /// Returns how many peers accepted it. A peer whose channel is closed is
    /// skipped (its reader loop unregisters it), and a peer whose queue is full
    /// misses this frame.
    pub async fn broadcast_except(&self, origin: ConnectionId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut delivered = 0;
        for (id, sender) in conns.iter().filter(|(id, _)| **id != origin) {
            match sender.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!(conn_id = %id, "Relay queue full, frame dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Close every socket and empty the registry
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for sender in conns.values() {
            // A full queue still closes once the sender is dropped below
            let _ = sender.try_send(Message::Close(None));
        }
        conns.clear();
        metrics::set_relay_connections(0);
        tracing::info!(count, "Relay connections closed");
    }
}
