//! Goods change events.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`GoodsEvent`]: snapshot of a goods row after a mutation.
//! - [`EventPersistence`]: background service that appends every event to
//!   the `goods_events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, GoodsEvent, GoodsEventKind};
pub use persistence::EventPersistence;
