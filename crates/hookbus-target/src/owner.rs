//! Identity nodes for the extensions that declare hooks.

use std::sync::Arc;

use hookbus_core::BusResult;
use hookbus_tracking::{TrackOrigin, TrackSink, Trackable, Tracking};

/// The declaring side of a set of hooks: one extension's identity node.
///
/// Every [`Target`](crate::target::Target) minted for this extension's hooks
/// hangs under this node in the identity forest, so a single sink per tree
/// receives all events regardless of proxy depth.
#[derive(Debug)]
pub struct Owner {
    name: String,
    node: Arc<Trackable>,
}

impl Owner {
    /// Create an owner that roots its own identity tree at `sink`.
    pub fn root(
        name: impl Into<String>,
        tracking: &Arc<Tracking>,
        sink: TrackSink,
    ) -> BusResult<Arc<Self>> {
        let name = name.into();
        let node = Arc::new(Trackable::new("Owner", Arc::clone(tracking)));
        node.identify(name.clone(), TrackOrigin::Sink(sink))?;
        Ok(Arc::new(Self { name, node }))
    }

    /// Create an owner hanging under an existing identity node, e.g. a
    /// bus-wide root shared by all extensions of one build run.
    pub fn child_of(name: impl Into<String>, parent: &Arc<Trackable>) -> BusResult<Arc<Self>> {
        let name = name.into();
        let node = Arc::new(Trackable::new("Owner", Arc::clone(parent.tracking())));
        node.identify(name.clone(), TrackOrigin::Parent(Arc::clone(parent)))?;
        Ok(Arc::new(Self { name, node }))
    }

    /// The extension's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owner's identity node.
    pub fn node(&self) -> &Arc<Trackable> {
        &self.node
    }
}
