//! The composable identity node.
//!
//! Every tracked object embeds a [`Trackable`]: a node in an identity forest
//! rooted at nodes holding a direct sink. Children delegate emission upward;
//! the chain is resolved at emission time by walking parent references to the
//! nearest ancestor with a direct sink. Parents are assigned once at
//! `identify` time and never reassigned, which keeps the forest acyclic.

use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::Utc;
use serde_json::Value;
use tracing::trace;

use hookbus_core::{BusError, BusResult};

use crate::identity::SerializedIdentity;
use crate::sink::{TrackRecord, TrackSink};
use crate::tracking::Tracking;

const UNINITIALIZED: &str = "trackable must be initialized with identify before use";

/// Where a node's events go: a direct sink (root) or the parent node (child).
///
/// Exactly one of the two per identified node.
pub enum TrackOrigin {
    /// Terminal emission function. The node is a root of its tree.
    Sink(TrackSink),
    /// The parent node; emission delegates upward through it.
    Parent(Arc<Trackable>),
}

impl fmt::Debug for TrackOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sink(_) => f.write_str("Sink(<fn>)"),
            Self::Parent(parent) => f.debug_tuple("Parent").field(&parent.identifier()).finish(),
        }
    }
}

#[derive(Debug)]
struct Identity {
    id: String,
    origin: TrackOrigin,
}

/// A node in the identity forest with the `track` emission primitive.
///
/// Construction takes the runtime category label (the `type` field of the
/// serialized identity) and the shared [`Tracking`] switch. The node is inert
/// until [`identify`](Trackable::identify) assigns its identifier and origin.
#[derive(Debug)]
pub struct Trackable {
    node_type: String,
    tracking: Arc<Tracking>,
    identity: OnceLock<Identity>,
    serialized: OnceLock<Arc<SerializedIdentity>>,
}

impl Trackable {
    /// Create an unidentified node.
    pub fn new(node_type: impl Into<String>, tracking: Arc<Tracking>) -> Self {
        Self {
            node_type: node_type.into(),
            tracking,
            identity: OnceLock::new(),
            serialized: OnceLock::new(),
        }
    }

    /// Assign the node's identifier and emission origin.
    ///
    /// May be called at most once; a second call is a `Conflict` error.
    pub fn identify(&self, identifier: impl Into<String>, origin: TrackOrigin) -> BusResult<()> {
        let id = identifier.into();
        trace!(node_type = %self.node_type, id = %id, "Identity assigned");
        self.identity.set(Identity { id, origin }).map_err(|_| {
            BusError::conflict(format!(
                "{} node '{}' is already identified",
                self.node_type,
                self.identifier().unwrap_or_default()
            ))
        })
    }

    /// The shared tracking switch this node was constructed with.
    pub fn tracking(&self) -> &Arc<Tracking> {
        &self.tracking
    }

    /// The identifier assigned via `identify`, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identity.get().map(|identity| identity.id.as_str())
    }

    /// Returns whether `identify` has been called.
    pub fn is_identified(&self) -> bool {
        self.identity.get().is_some()
    }

    /// Structural `{type, id, parent?}` representation of this node.
    ///
    /// Memoized per instance: repeated calls return the same shared
    /// allocation, so callers must not rely on mutating it. While tracking is
    /// disabled this returns a fresh empty structure with no identifier
    /// validation and no caching.
    pub fn serialize(&self) -> BusResult<Arc<SerializedIdentity>> {
        if !self.tracking.is_live() {
            return Ok(Arc::new(SerializedIdentity::empty()));
        }
        if let Some(cached) = self.serialized.get() {
            return Ok(Arc::clone(cached));
        }
        let identity = self.identity()?;
        let parent = match &identity.origin {
            TrackOrigin::Parent(parent) => Some(Box::new(parent.serialize()?.as_ref().clone())),
            TrackOrigin::Sink(_) => None,
        };
        let computed = SerializedIdentity {
            node_type: self.node_type.clone(),
            id: identity.id.clone(),
            parent,
        };
        Ok(Arc::clone(
            self.serialized.get_or_init(|| Arc::new(computed)),
        ))
    }

    /// Emit one `{origin, event, args}` record to the root sink.
    ///
    /// When the shared switch is disabled this is a guaranteed no-op: no
    /// record is allocated, no sink is invoked, no identity is validated, and
    /// `Ok(None)` is returned. When live, the root sink is invoked
    /// synchronously and its return value handed back; an unidentified node
    /// fails with the uninitialized-identity error.
    pub fn track(&self, event: impl Into<String>, args: Vec<Value>) -> BusResult<Option<Value>> {
        if !self.tracking.is_live() {
            return Ok(None);
        }
        let origin = self.serialize()?.as_ref().clone();
        let sink = self.resolve_sink()?;
        let record = TrackRecord {
            origin,
            event: event.into(),
            args,
            timestamp: Utc::now(),
        };
        Ok(sink(record))
    }

    fn identity(&self) -> BusResult<&Identity> {
        self.identity
            .get()
            .ok_or_else(|| BusError::identity(UNINITIALIZED))
    }

    /// Walk parent references to the nearest ancestor holding a direct sink.
    fn resolve_sink(&self) -> BusResult<TrackSink> {
        let mut current = match &self.identity()?.origin {
            TrackOrigin::Sink(sink) => return Ok(Arc::clone(sink)),
            TrackOrigin::Parent(parent) => Arc::clone(parent),
        };
        loop {
            let next = match &current.identity()?.origin {
                TrackOrigin::Sink(sink) => return Ok(Arc::clone(sink)),
                TrackOrigin::Parent(parent) => Arc::clone(parent),
            };
            current = next;
        }
    }
}
