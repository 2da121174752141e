//! Prelude for convenient imports.

pub use async_trait::async_trait;

pub use hookbus_core::{BusError, BusResult, ErrorKind};
pub use hookbus_tracking::{
    BufferSink, SerializedIdentity, TrackOrigin, TrackRecord, TrackSink, Trackable, Tracking,
    tracing_sink,
};

pub use crate::events;
pub use crate::owner::Owner;
pub use crate::tapable::{AsyncTap, Done, HookKind, InterceptOptions, PromiseTap, SyncTap, Tapable};
pub use crate::target::Target;
