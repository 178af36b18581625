//! Fan-out of product changes to real-time clients.
//!
//! Publishing never waits for subscribers. A subscriber only sees events sent
//! after it subscribed, and one that falls more than the channel capacity
//! behind skips the oldest events.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::domain::product::Product;

/// Change notification pushed to every connected client.
///
/// Serialized as `{"event": <name>, "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ProductEvent {
    /// A product was created; carries the stored record.
    #[serde(rename = "productoCreado")]
    Created(Product),
    /// A product was updated; carries its id.
    #[serde(rename = "productoActualizado")]
    Updated(i32),
    /// A product was deleted; carries its id.
    #[serde(rename = "productoEliminado")]
    Deleted(i32),
}

impl ProductEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ProductEvent::Created(_) => "productoCreado",
            ProductEvent::Updated(_) => "productoActualizado",
            ProductEvent::Deleted(_) => "productoEliminado",
        }
    }
}

#[derive(Clone)]
/// Publish/subscribe hub shared by the HTTP handlers.
pub struct Broadcaster {
    sender: broadcast::Sender<ProductEvent>,
}

impl Broadcaster {
    /// Create a broadcaster whose subscribers may lag `capacity` events behind.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> broadcast::Receiver<ProductEvent> {
        self.sender.subscribe()
    }

    /// Send `event` to all current subscribers and return how many there were.
    pub fn publish(&self, event: ProductEvent) -> usize {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => {
                log::debug!("Sent {name} to {receivers} subscriber(s)");
                receivers
            }
            Err(_) => 0,
        }
    }
}
