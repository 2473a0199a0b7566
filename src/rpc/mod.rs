//! rpc
//!
//! Remote resolution procedures.
//!
//! # Modules
//!
//! - `traits`: Core `ResolveProcedure` trait, `RemoteResolution` and `RpcError`
//! - [`client`]: HTTP client for a node's `/api/v0` RPC API
//! - [`loopback`]: In-process procedure backed by a local resolver

pub mod client;
pub mod loopback;
mod traits;

pub use client::RpcClient;
pub use loopback::LoopbackProcedure;
pub use traits::*;
