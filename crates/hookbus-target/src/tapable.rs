//! The interface a hook engine must satisfy to be wrapped by a target.
//!
//! This layer owns no dispatch logic: subscriber ordering, bail, waterfall
//! and parallel semantics all live behind [`Tapable`]. The proxy only
//! forwards and observes.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use hookbus_core::BusResult;

/// Completion callback for callback-style invocation. Receives the
/// delegate's completion arguments (conventionally error-first).
pub type Done = Box<dyn FnOnce(Vec<Value>) + Send>;

/// Synchronous subscriber. Returning `Some` lets bail-style hooks
/// short-circuit; the proxy never inspects the value.
pub type SyncTap = Arc<dyn Fn(&[Value]) -> Option<Value> + Send + Sync>;

/// Callback-style subscriber: receives the hook arguments and a completion
/// callback it must eventually invoke.
pub type AsyncTap = Arc<dyn Fn(Vec<Value>, Done) + Send + Sync>;

/// Promise-style subscriber.
pub type PromiseTap = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, BusResult<Option<Value>>> + Send + Sync>;

/// Invocation discipline of a hook. Used only for identity labeling, never
/// for dispatch decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Sync,
    SyncBail,
    SyncWaterfall,
    AsyncSeries,
    AsyncSeriesBail,
    AsyncSeriesWaterfall,
    AsyncParallel,
    AsyncParallelBail,
}

impl HookKind {
    /// Returns the display label of this hook kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "SyncHook",
            Self::SyncBail => "SyncBailHook",
            Self::SyncWaterfall => "SyncWaterfallHook",
            Self::AsyncSeries => "AsyncSeriesHook",
            Self::AsyncSeriesBail => "AsyncSeriesBailHook",
            Self::AsyncSeriesWaterfall => "AsyncSeriesWaterfallHook",
            Self::AsyncParallel => "AsyncParallelHook",
            Self::AsyncParallelBail => "AsyncParallelBailHook",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stage observers registered with a hook engine's interception surface.
#[derive(Clone, Default)]
pub struct InterceptOptions {
    /// Display name of the interception.
    pub name: Option<String>,
    /// Observes every invocation's arguments.
    pub on_call: Option<Arc<dyn Fn(&[Value]) + Send + Sync>>,
    /// Observes every subscription by label.
    pub on_tap: Option<Arc<dyn Fn(&str) + Send + Sync>>,
    /// Observes every subscriber registration by label.
    pub on_register: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl InterceptOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Sets the invocation observer.
    pub fn with_on_call<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.on_call = Some(Arc::new(f));
        self
    }

    /// Sets the subscription observer.
    pub fn with_on_tap<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_tap = Some(Arc::new(f));
        self
    }

    /// Sets the registration observer.
    pub fn with_on_register<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_register = Some(Arc::new(f));
        self
    }

    /// Structural summary of which stages are present, used as the tracked
    /// payload for interception events.
    pub fn describe(&self) -> Value {
        json!({
            "name": self.name,
            "call": self.on_call.is_some(),
            "tap": self.on_tap.is_some(),
            "register": self.on_register.is_some(),
        })
    }
}

impl fmt::Debug for InterceptOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptOptions")
            .field("name", &self.name)
            .field("on_call", &self.on_call.as_ref().map(|_| "<closure>"))
            .field("on_tap", &self.on_tap.as_ref().map(|_| "<closure>"))
            .field("on_register", &self.on_register.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

/// One concrete hook object as supplied by the hook engine.
///
/// Engines implement ordered subscription (`tap` family), triggered
/// invocation (`call` family) and interception registration. All errors an
/// engine raises propagate through the proxy unchanged.
#[async_trait]
pub trait Tapable: Send + Sync + fmt::Debug {
    /// Register a synchronous subscriber under `label`.
    fn tap(&self, label: &str, interceptor: SyncTap) -> BusResult<()>;

    /// Register a callback-style subscriber under `label`.
    fn tap_async(&self, label: &str, interceptor: AsyncTap) -> BusResult<()>;

    /// Register a promise-style subscriber under `label`.
    fn tap_promise(&self, label: &str, interceptor: PromiseTap) -> BusResult<()>;

    /// Invoke all subscribers synchronously.
    fn call(&self, args: &[Value]) -> BusResult<Value>;

    /// Invoke all subscribers, delivering completion through `done`.
    fn call_async(&self, args: Vec<Value>, done: Done) -> BusResult<()>;

    /// Invoke all subscribers, resolving with the produced value.
    async fn promise(&self, args: Vec<Value>) -> BusResult<Value>;

    /// Register stage observers.
    fn intercept(&self, options: InterceptOptions) -> BusResult<()>;
}
