//! # hookbus-target
//!
//! Hook proxy layer for HookBus. Provides:
//!
//! - The [`Tapable`] trait a hook engine must satisfy to be wrapped
//! - [`Owner`] identity nodes for the extensions declaring hooks
//! - [`Target`] proxies that forward every hook operation while emitting
//!   before/after trace events at precise boundaries
//! - Owner-exclusive invocation: external requestors may tap and intercept a
//!   hook but never invoke it
//!
//! [`Tapable`]: crate::tapable::Tapable
//! [`Owner`]: crate::owner::Owner
//! [`Target`]: crate::target::Target

pub mod events;
pub mod owner;
pub mod prelude;
pub mod tapable;
pub mod target;

pub use owner::Owner;
pub use tapable::{AsyncTap, Done, HookKind, InterceptOptions, PromiseTap, SyncTap, Tapable};
pub use target::Target;
