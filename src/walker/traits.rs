//! walker::traits
//!
//! Segment walker trait definition.
//!
//! # Design
//!
//! A walker starts at the root CID of an immutable path and follows as many
//! traversal segments as it can. It stops at the deepest node it reached and
//! hands back that node's CID together with the segments it did not consume.
//! How a segment is interpreted (named link, directory entry, document field)
//! is what separates one walker from another.

use async_trait::async_trait;
use cid::Cid;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::types::ImmutablePath;
use crate::store::StoreError;

/// Errors from walking a path through the graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalkError {
    /// The node has no link by that name and no field addressed by the rest
    /// of the path.
    #[error("no link named '{name}' under {cid}")]
    NoLink { cid: Cid, name: String },

    /// A segment was applied to a node that cannot be traversed.
    #[error("cannot traverse '{segment}': {cid} is not a directory")]
    NotDirectory { cid: Cid, segment: String },

    /// A node on the way could not be fetched.
    #[error("fetch failed: {0}")]
    Fetch(StoreError),

    /// The caller cancelled the walk.
    #[error("walk cancelled")]
    Cancelled,
}

impl From<StoreError> for WalkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Cancelled => WalkError::Cancelled,
            other => WalkError::Fetch(other),
        }
    }
}

/// Walks traversal segments from an immutable root.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
///
/// # Cancellation
///
/// Implementations check `cancel` before every node fetch.
#[async_trait]
pub trait SegmentWalker: Send + Sync {
    /// Get the walker name (e.g., "ipld", "unixfs").
    fn name(&self) -> &'static str;

    /// Walk `path` as far as the graph allows.
    ///
    /// Returns the CID of the last node reached and the segments left
    /// unresolved after it. A path with no traversal segments resolves to its
    /// root without touching the store.
    ///
    /// # Errors
    ///
    /// - `NoLink` / `NotDirectory` when a segment cannot be followed
    /// - `Fetch` when the store fails
    /// - `Cancelled` if `cancel` fired
    async fn resolve_to_last_node(
        &self,
        cancel: &CancellationToken,
        path: &ImmutablePath,
    ) -> Result<(Cid, Vec<String>), WalkError>;
}
