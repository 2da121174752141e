//! # hookbus-core
//!
//! Core crate for HookBus. Contains the unified error system shared by the
//! tracking and target crates.
//!
//! This crate has **no** internal dependencies on other HookBus crates.

pub mod error;
pub mod result;

pub use error::{BusError, ErrorKind};
pub use result::BusResult;
