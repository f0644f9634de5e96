//! Broadcast of published placeholders to the render surface.

use std::sync::atomic::{AtomicU64, Ordering};

use placard_core::{ComposerContext, ContextVersion, Placeholder};
use serde::Serialize;
use tokio::sync::broadcast;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 64;

/// A placeholder the render surface should display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlaceholderUpdate {
    /// Context change this value belongs to.
    pub version: ContextVersion,
    /// The context it was resolved for.
    pub context: ComposerContext,
    /// Text to show; empty means the default placeholder.
    pub placeholder: Placeholder,
}

/// Broadcast-based placeholder emitter.
///
/// Non-blocking: `emit` never awaits. A slow subscriber lags and skips to
/// newer values, which is harmless since only the latest placeholder matters.
pub struct PlaceholderEmitter {
    tx: broadcast::Sender<PlaceholderUpdate>,
    emit_count: AtomicU64,
}

impl PlaceholderEmitter {
    /// Create an emitter with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an emitter with a custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            emit_count: AtomicU64::new(0),
        }
    }

    /// Send `update` to all subscribers. Returns how many received it.
    pub fn emit(&self, update: PlaceholderUpdate) -> usize {
        let _ = self.emit_count.fetch_add(1, Ordering::Relaxed);
        self.tx.send(update).unwrap_or(0)
    }

    /// Receive every update emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaceholderUpdate> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Total updates emitted.
    pub fn emit_count(&self) -> u64 {
        self.emit_count.load(Ordering::Relaxed)
    }
}

impl Default for PlaceholderEmitter {
    fn default() -> Self {
        Self::new()
    }
}
