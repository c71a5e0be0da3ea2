//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans out [`GoodsEvent`]s to any number of subscribers. It is
//! shared via `Arc<EventBus>` across the application.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use stockroom_core::types::{DbId, Priority, Timestamp};
use stockroom_db::models::goods::Goods;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// GoodsEvent
// ---------------------------------------------------------------------------

/// What happened to the goods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoodsEventKind {
    Created,
    Updated,
    Removed,
    Reprioritized,
}

impl GoodsEventKind {
    /// Name stored in `goods_events.event_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Removed => "removed",
            Self::Reprioritized => "reprioritized",
        }
    }
}

impl fmt::Display for GoodsEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state of one goods row right after a mutation.
///
/// Only the goods the caller wrote are reported; rows displaced by a
/// ranking shift are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsEvent {
    pub kind: GoodsEventKind,
    pub goods_id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub removed: bool,
    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl GoodsEvent {
    /// Snapshot `goods` as an event of the given kind, stamped now.
    pub fn new(kind: GoodsEventKind, goods: &Goods) -> Self {
        Self {
            kind,
            goods_id: goods.id,
            project_id: goods.project_id,
            name: goods.name.clone(),
            description: goods.description.clone(),
            priority: goods.priority,
            removed: goods.removed,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust,ignore
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(GoodsEvent::new(GoodsEventKind::Created, &goods));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<GoodsEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is dropped.
    pub fn publish(&self, event: GoodsEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<GoodsEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
