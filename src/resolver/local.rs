//! resolver::local
//!
//! In-process resolution strategy.
//!
//! # Algorithm
//!
//! 1. Resolve `ipns` paths through the name resolver and gate the namespace.
//! 2. Pick the walker for the namespace (`ipld` walks linked data, `ipfs`
//!    walks directories).
//! 3. Walk to the last node.
//! 4. Rebuild the canonical path from the namespace, the last CID and the
//!    unresolved remainder.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{cancellable, materialize, pre_resolve, PathResolver, ResolveError};
use crate::core::canonical::build_immutable_path;
use crate::core::node::Node;
use crate::core::types::{ImmutablePath, Namespace, Path};
use crate::naming::NameResolver;
use crate::store::DagStore;
use crate::walker::{LinkedDataWalker, SegmentWalker, UnixfsWalker};

/// Resolver that walks the graph in-process.
#[derive(Clone)]
pub struct LocalResolver {
    store: Arc<dyn DagStore>,
    names: Option<Arc<dyn NameResolver>>,
    ipld_walker: Arc<dyn SegmentWalker>,
    unixfs_walker: Arc<dyn SegmentWalker>,
}

impl std::fmt::Debug for LocalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalResolver")
            .field("store", &self.store.name())
            .field("names", &self.names.as_ref().map(|n| n.name()))
            .field("ipld_walker", &self.ipld_walker.name())
            .field("unixfs_walker", &self.unixfs_walker.name())
            .finish()
    }
}

impl LocalResolver {
    /// Create a resolver over `store`.
    ///
    /// Both walkers read from `store`. Without `names`, mutable paths fail
    /// with `ResolveError::NamingUnavailable`.
    pub fn new(store: Arc<dyn DagStore>, names: Option<Arc<dyn NameResolver>>) -> Self {
        Self {
            ipld_walker: Arc::new(LinkedDataWalker::new(Arc::clone(&store))),
            unixfs_walker: Arc::new(UnixfsWalker::new(Arc::clone(&store))),
            store,
            names,
        }
    }

    /// Replace the walkers.
    pub fn with_walkers(
        mut self,
        ipld: Arc<dyn SegmentWalker>,
        unixfs: Arc<dyn SegmentWalker>,
    ) -> Self {
        self.ipld_walker = ipld;
        self.unixfs_walker = unixfs;
        self
    }

    /// Check if a name resolver is attached.
    pub fn has_names(&self) -> bool {
        self.names.is_some()
    }

    fn walker_for(&self, namespace: Namespace) -> Result<&dyn SegmentWalker, ResolveError> {
        match namespace {
            Namespace::Ipld => Ok(self.ipld_walker.as_ref()),
            Namespace::Ipfs => Ok(self.unixfs_walker.as_ref()),
            Namespace::Ipns => Err(ResolveError::UnsupportedNamespace(namespace)),
        }
    }
}

#[async_trait]
impl PathResolver for LocalResolver {
    fn name(&self) -> &'static str {
        "local"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %path))]
    async fn resolve_path(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<ImmutablePath, ResolveError> {
        let immutable = pre_resolve(self.names.as_deref(), cancel, path).await?;
        let namespace = immutable.namespace();
        let walker = self.walker_for(namespace)?;

        let (cid, remainder) =
            cancellable(cancel, walker.resolve_to_last_node(cancel, &immutable)).await?;
        let resolved = build_immutable_path(namespace, &cid, &remainder)?;

        tracing::debug!(resolved = %resolved, walker = walker.name(), "resolved path");
        Ok(resolved)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %path))]
    async fn resolve_node(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<Node, ResolveError> {
        let resolved = self.resolve_path(cancel, path).await?;
        materialize(self.store.as_ref(), cancel, &resolved).await
    }
}
