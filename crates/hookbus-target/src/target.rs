//! The tracked, access-controlled wrapper around one hook.
//!
//! A target is minted per (owner, requestor, hook) triple by the component
//! that hands extensions each other's hooks. It forwards every hook-protocol
//! operation to the delegate and tracks a before/after event pair around each
//! invocation. Invocation is owner-exclusive: a restricted target (requestor
//! is not the owner) rejects `call`/`call_async`/`promise` while leaving the
//! subscription surface fully functional.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};

use hookbus_core::{BusError, BusResult};
use hookbus_tracking::{TrackOrigin, Trackable};

use crate::events;
use crate::owner::Owner;
use crate::tapable::{AsyncTap, Done, HookKind, InterceptOptions, PromiseTap, SyncTap, Tapable};

/// Tracked proxy for one hook, scoped to one requestor.
///
/// The proxy is itself an identity node, identified as `"<name>[<kind>]"`
/// with the owner's node as parent. The requestor is fixed at construction;
/// a new target is minted per (owner, requestor) pair, never shared.
#[derive(Debug)]
pub struct Target {
    owner: Arc<Owner>,
    requestor: String,
    name: String,
    kind: HookKind,
    delegate: Arc<dyn Tapable>,
    restricted: bool,
    node: Arc<Trackable>,
}

impl Target {
    /// Create a target for the owning extension itself (full access).
    pub fn owned(
        owner: Arc<Owner>,
        requestor: impl Into<String>,
        name: impl Into<String>,
        kind: HookKind,
        delegate: Arc<dyn Tapable>,
    ) -> BusResult<Self> {
        Self::build(owner, requestor.into(), name.into(), kind, delegate, false)
    }

    /// Create a target for a foreign requestor (subscription only).
    pub fn external(
        owner: Arc<Owner>,
        requestor: impl Into<String>,
        name: impl Into<String>,
        kind: HookKind,
        delegate: Arc<dyn Tapable>,
    ) -> BusResult<Self> {
        Self::build(owner, requestor.into(), name.into(), kind, delegate, true)
    }

    /// Create a target, restricting it exactly when the requestor is not the
    /// declaring owner. This is the selection rule the extension-loading
    /// component applies when handing out hooks.
    pub fn for_requestor(
        owner: Arc<Owner>,
        requestor: impl Into<String>,
        name: impl Into<String>,
        kind: HookKind,
        delegate: Arc<dyn Tapable>,
    ) -> BusResult<Self> {
        let requestor = requestor.into();
        let restricted = requestor != owner.name();
        Self::build(owner, requestor, name.into(), kind, delegate, restricted)
    }

    fn build(
        owner: Arc<Owner>,
        requestor: String,
        name: String,
        kind: HookKind,
        delegate: Arc<dyn Tapable>,
        restricted: bool,
    ) -> BusResult<Self> {
        let node = Arc::new(Trackable::new(
            "Target",
            Arc::clone(owner.node().tracking()),
        ));
        node.identify(
            format!("{name}[{kind}]"),
            TrackOrigin::Parent(Arc::clone(owner.node())),
        )?;
        debug!(
            hook = %name,
            kind = %kind,
            owner = %owner.name(),
            requestor = %requestor,
            restricted,
            "Hook target linked"
        );
        Ok(Self {
            owner,
            requestor,
            name,
            kind,
            delegate,
            restricted,
            node,
        })
    }

    /// The hook's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hook's invocation discipline label.
    pub fn kind(&self) -> HookKind {
        self.kind
    }

    /// The extension this target was minted for.
    pub fn requestor(&self) -> &str {
        &self.requestor
    }

    /// The extension that declared the hook.
    pub fn owner(&self) -> &Arc<Owner> {
        &self.owner
    }

    /// Returns whether invocation operations are rejected on this target.
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// The target's identity node.
    pub fn node(&self) -> &Arc<Trackable> {
        &self.node
    }

    /// Register a synchronous subscriber.
    ///
    /// The subscriber label is the requestor name, or
    /// `"<requestor>:<label>"` when a custom label is given.
    pub fn tap(&self, label: Option<&str>, interceptor: SyncTap) -> BusResult<()> {
        let label = self.resolve_label(label);
        self.track_tap(events::TAP, &label)?;
        self.delegate.tap(&label, interceptor)
    }

    /// Register a callback-style subscriber. Label resolution as [`tap`](Target::tap).
    pub fn tap_async(&self, label: Option<&str>, interceptor: AsyncTap) -> BusResult<()> {
        let label = self.resolve_label(label);
        self.track_tap(events::TAP_ASYNC, &label)?;
        self.delegate.tap_async(&label, interceptor)
    }

    /// Register a promise-style subscriber. Label resolution as [`tap`](Target::tap).
    pub fn tap_promise(&self, label: Option<&str>, interceptor: PromiseTap) -> BusResult<()> {
        let label = self.resolve_label(label);
        self.track_tap(events::TAP_PROMISE, &label)?;
        self.delegate.tap_promise(&label, interceptor)
    }

    /// Invoke the hook synchronously (owner only).
    ///
    /// Tracks `beforeCall` with the arguments, forwards them unchanged, then
    /// tracks `afterCall` carrying the return value and the arguments before
    /// handing the value back. Delegate errors propagate and skip
    /// `afterCall`.
    pub fn call(&self, args: Vec<Value>) -> BusResult<Value> {
        self.ensure_owner_invoke("call")?;
        self.node.track(events::BEFORE_CALL, args.clone())?;
        let returned = self.delegate.call(&args)?;
        let mut after = Vec::with_capacity(args.len() + 1);
        after.push(returned.clone());
        after.extend(args);
        self.node.track(events::AFTER_CALL, after)?;
        Ok(returned)
    }

    /// Invoke the hook callback-style (owner only).
    ///
    /// The delegate receives the arguments with `done` replaced by a wrapper
    /// that tracks `afterCallAsync` and then invokes `done` with the
    /// delegate's completion arguments unchanged. The trace event always
    /// precedes the user-visible callback.
    pub fn call_async(&self, args: Vec<Value>, done: Done) -> BusResult<()> {
        self.ensure_owner_invoke("callAsync")?;
        self.node.track(events::BEFORE_CALL_ASYNC, args.clone())?;
        let node = Arc::clone(&self.node);
        let call_args = args.clone();
        let wrapped: Done = Box::new(move |returned: Vec<Value>| {
            let mut after = Vec::with_capacity(call_args.len() + 1);
            after.push(json!({ "returned": returned }));
            after.extend(call_args);
            if let Err(error) = node.track(events::AFTER_CALL_ASYNC, after) {
                warn!(error = %error, "afterCallAsync event dropped");
            }
            done(returned);
        });
        self.delegate.call_async(args, wrapped)
    }

    /// Invoke the hook promise-style (owner only).
    ///
    /// Tracks `afterPromise` on fulfillment, before the resolved value is
    /// handed back. A rejection propagates with no `afterPromise` event.
    pub async fn promise(&self, args: Vec<Value>) -> BusResult<Value> {
        self.ensure_owner_invoke("promise")?;
        self.node.track(events::BEFORE_PROMISE, args.clone())?;
        let returned = self.delegate.promise(args.clone()).await?;
        let mut after = Vec::with_capacity(args.len() + 1);
        after.push(json!({ "returned": returned }));
        after.extend(args);
        self.node.track(events::AFTER_PROMISE, after)?;
        Ok(returned)
    }

    /// Register stage observers with the delegate. Permitted for any
    /// requestor.
    pub fn intercept(&self, options: InterceptOptions) -> BusResult<()> {
        self.node
            .track(events::TAPABLE_INTERCEPT, vec![options.describe()])?;
        self.delegate.intercept(options)
    }

    fn resolve_label(&self, label: Option<&str>) -> String {
        match label {
            Some(custom) => format!("{}:{custom}", self.requestor),
            None => self.requestor.clone(),
        }
    }

    fn track_tap(&self, event: &'static str, label: &str) -> BusResult<()> {
        self.node.track(
            event,
            vec![json!({ "requestor": self.requestor, "interceptor": label })],
        )?;
        Ok(())
    }

    fn ensure_owner_invoke(&self, method: &str) -> BusResult<()> {
        if !self.restricted {
            return Ok(());
        }
        warn!(
            hook = %self.name,
            owner = %self.owner.name(),
            requestor = %self.requestor,
            method,
            "Rejected non-owner hook invocation"
        );
        Err(BusError::authorization(format!(
            "{requestor} ran {owner}'s hook {name}.{method}(): only {owner} may invoke its own \
             hooks, {requestor} may only tap or intercept them",
            requestor = self.requestor,
            owner = self.owner.name(),
            name = self.name,
        )))
    }
}
