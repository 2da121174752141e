//! Track record envelope and terminal sinks.
//!
//! A sink is the root of one identity tree: every `track` call anywhere in
//! the tree resolves upward to it and invokes it synchronously. Sinks must be
//! fast and non-blocking — there is no buffering, and a slow sink sits
//! directly on the critical path of every tracked operation.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::identity::SerializedIdentity;

/// Terminal emission function for one identity tree.
///
/// Invoked synchronously and re-entrantly; emission order is call order.
/// The sink's return value is handed back to the `track` caller.
pub type TrackSink = Arc<dyn Fn(TrackRecord) -> Option<Value> + Send + Sync>;

/// One tracked operation: who did what, with which arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Serialized identity of the emitting node.
    pub origin: SerializedIdentity,
    /// Event name (e.g. `"beforeCall"`, `"tap"`).
    pub event: String,
    /// Event arguments.
    pub args: Vec<Value>,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
}

/// A sink that logs each record through `tracing` at debug level.
pub fn tracing_sink() -> TrackSink {
    Arc::new(|record| {
        debug!(
            origin = %record.origin,
            event = %record.event,
            args = record.args.len(),
            "Tracked operation"
        );
        None
    })
}

/// An in-memory audit buffer of tracked records.
///
/// Useful as the sink for one build run when the full interaction history
/// should be inspectable afterwards, and as the assertion surface in tests.
#[derive(Debug, Default)]
pub struct BufferSink {
    records: Mutex<Vec<TrackRecord>>,
}

impl BufferSink {
    /// Create an empty buffer.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The `TrackSink` view of this buffer.
    pub fn sink(self: &Arc<Self>) -> TrackSink {
        let buffer = Arc::clone(self);
        Arc::new(move |record| {
            buffer.lock().push(record);
            None
        })
    }

    /// Snapshot of all buffered records, in emission order.
    pub fn records(&self) -> Vec<TrackRecord> {
        self.lock().clone()
    }

    /// Event names of all buffered records, in emission order.
    pub fn events(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.event.clone()).collect()
    }

    /// Remove and return all buffered records.
    pub fn drain(&self) -> Vec<TrackRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TrackRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
