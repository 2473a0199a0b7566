//! store::memory
//!
//! In-memory graph store.
//!
//! # Design
//!
//! Blocks are kept as encoded bytes keyed by multihash, so a version-0 CID
//! and its version-1 equivalent reach the same block. Blocks are decoded and
//! verified on every fetch, so a tampered block surfaces as an integrity
//! error exactly as it would from a real store. A failure can be injected
//! and every fetch is recorded for test verification.
//!
//! # Example
//!
//! ```
//! use dagpath::core::node::Node;
//! use dagpath::store::{DagStore, MemoryDagStore};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryDagStore::new();
//! let cid = store.put(&Node::file(b"hello".to_vec()).unwrap()).unwrap();
//!
//! let node = store.get(&CancellationToken::new(), &cid).await.unwrap();
//! assert!(node.is_file());
//! assert_eq!(store.fetches(), vec![cid]);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cid::multihash::Multihash;
use cid::Cid;
use tokio_util::sync::CancellationToken;

use super::traits::{DagStore, StoreError};
use crate::core::node::{Node, NodeError};

/// In-memory block store.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryDagStore {
    inner: Arc<Mutex<MemoryDagStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryDagStoreInner {
    /// Encoded blocks by multihash.
    blocks: HashMap<Multihash<64>, Vec<u8>>,
    /// Error returned by every fetch while set.
    fail_with: Option<StoreError>,
    /// CIDs requested, in order.
    fetches: Vec<Cid>,
}

impl MemoryDagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node and return its CID.
    pub fn put(&self, node: &Node) -> Result<Cid, NodeError> {
        let bytes = node.encode()?;
        self.lock().blocks.insert(*node.cid().hash(), bytes);
        Ok(node.cid())
    }

    /// Store raw bytes under an arbitrary CID.
    ///
    /// Nothing is verified here; a mismatch is reported when the block is
    /// fetched.
    pub fn put_raw(&self, cid: Cid, bytes: Vec<u8>) {
        self.lock().blocks.insert(*cid.hash(), bytes);
    }

    /// Remove a block.
    pub fn remove(&self, cid: &Cid) -> bool {
        self.lock().blocks.remove(cid.hash()).is_some()
    }

    /// Check if a block is stored.
    pub fn contains(&self, cid: &Cid) -> bool {
        self.lock().blocks.contains_key(cid.hash())
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.lock().blocks.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every subsequent fetch fail with `error`.
    pub fn fail_with(self, error: StoreError) -> Self {
        self.lock().fail_with = Some(error);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_failure(&self) {
        self.lock().fail_with = None;
    }

    /// Get all recorded fetches.
    pub fn fetches(&self) -> Vec<Cid> {
        self.lock().fetches.clone()
    }

    /// Clear recorded fetches.
    pub fn clear_fetches(&self) {
        self.lock().fetches.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryDagStoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DagStore for MemoryDagStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, cancel: &CancellationToken, cid: &Cid) -> Result<Node, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }

        let bytes = {
            let mut inner = self.lock();
            inner.fetches.push(*cid);
            if let Some(err) = &inner.fail_with {
                return Err(err.clone());
            }
            inner
                .blocks
                .get(cid.hash())
                .cloned()
                .ok_or(StoreError::NotFound(*cid))?
        };

        tracing::trace!(%cid, len = bytes.len(), "memory store fetch");
        Ok(Node::decode(cid, &bytes)?)
    }
}
