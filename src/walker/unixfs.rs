//! walker::unixfs
//!
//! File-system-aware walker for the `ipfs` namespace.
//!
//! Directory nodes are traversed by entry name. A file node is a leaf: any
//! segment left when a file is reached fails with `WalkError::NotDirectory`.
//! Document nodes reachable from a directory are walked the same way the
//! linked-data walker walks them.

use std::sync::Arc;

use async_trait::async_trait;
use cid::Cid;
use tokio_util::sync::CancellationToken;

use super::traits::{SegmentWalker, WalkError};
use crate::core::node::NodeData;
use crate::core::types::ImmutablePath;
use crate::store::DagStore;

/// Walker that follows directory entries.
#[derive(Clone)]
pub struct UnixfsWalker {
    store: Arc<dyn DagStore>,
}

impl UnixfsWalker {
    /// Create a walker reading from `store`.
    pub fn new(store: Arc<dyn DagStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for UnixfsWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnixfsWalker")
            .field("store", &self.store.name())
            .finish()
    }
}

#[async_trait]
impl SegmentWalker for UnixfsWalker {
    fn name(&self) -> &'static str {
        "unixfs"
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
            match node.data() {
                NodeData::File(_) => {
                    return Err(WalkError::NotDirectory {
                        cid: current,
                        segment: segment.clone(),
                    });
                }
                NodeData::Directory => match node.link(segment) {
                    Some(next) => {
                        tracing::trace!(from = %current, to = %next, entry = %segment, "entered directory entry");
                        current = next;
                    }
                    None => {
                        return Err(WalkError::NoLink {
                            cid: current,
                            name: segment.clone(),
                        });
                    }
                },
                NodeData::Document(_) => {
                    if let Some(next) = node.link(segment) {
                        current = next;
                        continue;
                    }
                    let rest = &segments[index..];
                    if node.field(rest).is_some() {
                        return Ok((current, rest.to_vec()));
                    }
                    return Err(WalkError::NoLink {
                        cid: current,
                        name: segment.clone(),
                    });
                }
            }
        }

        Ok((current, Vec::new()))
    }
}
