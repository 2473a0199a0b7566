//! store
//!
//! Abstraction for content graph stores.
//!
//! # Modules
//!
//! - `traits`: Core `DagStore` trait and `StoreError`
//! - [`memory`]: In-memory, integrity-verifying store
//!
//! The RPC-backed store lives with the RPC client in [`crate::rpc`].

pub mod memory;
mod traits;

pub use memory::MemoryDagStore;
pub use traits::*;
