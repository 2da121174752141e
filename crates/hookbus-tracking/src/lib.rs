//! # hookbus-tracking
//!
//! Identity & tracking base for HookBus. Provides:
//!
//! - A hierarchical identity graph over dynamically created nodes
//! - Lazily-computed, memoized identity serialization
//! - A `track` primitive emitting structured records to an upward-chained sink
//! - An injectable process-wide switch with zero emission cost when disabled

pub mod identity;
pub mod sink;
pub mod trackable;
pub mod tracking;

pub use identity::SerializedIdentity;
pub use sink::{BufferSink, TrackRecord, TrackSink, tracing_sink};
pub use trackable::{TrackOrigin, Trackable};
pub use tracking::Tracking;
