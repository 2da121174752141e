//! Convenience result type alias for HookBus.

use crate::error::BusError;

/// A specialized `Result` type for HookBus operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, BusError>` explicitly.
pub type BusResult<T> = Result<T, BusError>;
