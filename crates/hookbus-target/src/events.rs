//! Wire names of every event a [`Target`](crate::target::Target) tracks.

/// A synchronous subscription was registered.
pub const TAP: &str = "tap";
/// A callback-style subscription was registered.
pub const TAP_ASYNC: &str = "tapAsync";
/// A promise-style subscription was registered.
pub const TAP_PROMISE: &str = "tapPromise";
/// Emitted before a synchronous invocation, carrying the call arguments.
pub const BEFORE_CALL: &str = "beforeCall";
/// Emitted after a synchronous invocation, carrying the return value then the
/// original arguments.
pub const AFTER_CALL: &str = "afterCall";
/// Emitted before a callback-style invocation.
pub const BEFORE_CALL_ASYNC: &str = "beforeCallAsync";
/// Emitted when the delegate completes, strictly before the caller's
/// callback runs.
pub const AFTER_CALL_ASYNC: &str = "afterCallAsync";
/// Emitted before a promise-style invocation.
pub const BEFORE_PROMISE: &str = "beforePromise";
/// Emitted on fulfillment, strictly before the value is handed back. Not
/// emitted on rejection.
pub const AFTER_PROMISE: &str = "afterPromise";
/// An interception registration was forwarded to the delegate.
pub const TAPABLE_INTERCEPT: &str = "tapableIntercept";
