//! naming
//!
//! Abstraction for mutable-name resolution.
//!
//! # Modules
//!
//! - `traits`: Core `NameResolver` trait and `NameError`
//! - [`memory`]: In-memory name system with recursive records
//!
//! The RPC-backed resolver lives with the RPC client in [`crate::rpc`].

pub mod memory;
mod traits;

pub use memory::MemoryNameSystem;
pub use traits::*;
