//! walker::ipld
//!
//! Generic linked-data walker for the `ipld` namespace.
//!
//! Every segment is first tried as a named link of the current node. When a
//! segment is not a link, the rest of the path must address a value inside the
//! current document node; those segments are returned as the remainder and the
//! document's CID is the last node. Anything else is `WalkError::NoLink`.

use std::sync::Arc;

use async_trait::async_trait;
use cid::Cid;
use tokio_util::sync::CancellationToken;

use super::traits::{SegmentWalker, WalkError};
use crate::core::types::ImmutablePath;
use crate::store::DagStore;

/// Walker that follows named links on any node.
#[derive(Clone)]
pub struct LinkedDataWalker {
    store: Arc<dyn DagStore>,
}

impl LinkedDataWalker {
    /// Create a walker reading from `store`.
    pub fn new(store: Arc<dyn DagStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for LinkedDataWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedDataWalker")
            .field("store", &self.store.name())
            .finish()
    }
}

#[async_trait]
impl SegmentWalker for LinkedDataWalker {
    fn name(&self) -> &'static str {
        "ipld"
    }

    async fn resolve_to_last_node(
        &self,
        cancel: &CancellationToken,
        path: &ImmutablePath,
    ) -> Result<(Cid, Vec<String>), WalkError> {
        let segments = path.remainder();
        let mut current = path.cid();

        for (index, segment) in segments.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(WalkError::Cancelled);
            }

            let node = self.store.get(cancel, &current).await?;
            if let Some(next) = node.link(segment) {
                tracing::trace!(from = %current, to = %next, segment = %segment, "followed link");
                current = next;
                continue;
            }

            let rest = &segments[index..];
            if node.field(rest).is_some() {
                tracing::trace!(cid = %current, remainder = ?rest, "stopped inside document");
                return Ok((current, rest.to_vec()));
            }

            return Err(WalkError::NoLink {
                cid: current,
                name: segment.clone(),
            });
        }

        Ok((current, Vec::new()))
    }
}
