//! store::traits
//!
//! Graph store trait definition.
//!
//! # Design
//!
//! The `DagStore` trait is async because fetching a node may involve network
//! or disk I/O. Implementations verify that the returned node matches the CID
//! it was requested by; callers never re-check.

use async_trait::async_trait;
use cid::Cid;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::node::{Node, NodeError};

/// Errors from graph store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No block is stored under the CID.
    #[error("block not found: {0}")]
    NotFound(Cid),

    /// The block was found but could not be decoded or failed verification.
    #[error(transparent)]
    Node(#[from] NodeError),

    /// The backing store failed (I/O, transport, timeout).
    #[error("store backend error: {0}")]
    Backend(String),

    /// The caller cancelled the fetch.
    #[error("fetch cancelled")]
    Cancelled,
}

/// A source of content-addressed nodes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one store is shared by every
/// resolver and walker built on top of it.
///
/// # Cancellation
///
/// Implementations must observe `cancel` and return `StoreError::Cancelled`
/// promptly once it fires.
#[async_trait]
pub trait DagStore: Send + Sync {
    /// Get the store name (e.g., "memory", "rpc").
    fn name(&self) -> &'static str;

    /// Fetch and verify the node stored under `cid`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the store has no block for `cid`
    /// - `Node` if the block fails to decode or hashes to another CID
    /// - `Backend` for transport or storage failures
    /// - `Cancelled` if `cancel` fired
    async fn get(&self, cancel: &CancellationToken, cid: &Cid) -> Result<Node, StoreError>;
}
