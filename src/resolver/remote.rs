//! resolver::remote
//!
//! Remote resolution strategy.
//!
//! Names are resolved on the caller's side; only the immutable path is sent
//! to the [`ResolveProcedure`]. The answer's `rem_path` is a single
//! `/`-joined string and goes back through the shared canonicalization, which
//! splits it and checks that it cannot re-root the path.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{cancellable, materialize, pre_resolve, PathResolver, ResolveError};
use crate::core::canonical::build_immutable_path;
use crate::core::node::Node;
use crate::core::types::{ImmutablePath, Path};
use crate::naming::NameResolver;
use crate::rpc::{ResolveProcedure, RpcClient};
use crate::store::DagStore;

/// Resolver that delegates graph walks to a remote procedure.
#[derive(Clone)]
pub struct RemoteResolver {
    procedure: Arc<dyn ResolveProcedure>,
    store: Arc<dyn DagStore>,
    names: Option<Arc<dyn NameResolver>>,
}

impl std::fmt::Debug for RemoteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteResolver")
            .field("procedure", &self.procedure.name())
            .field("store", &self.store.name())
            .field("names", &self.names.as_ref().map(|n| n.name()))
            .finish()
    }
}

impl RemoteResolver {
    /// Create a resolver from its collaborators.
    pub fn new(
        procedure: Arc<dyn ResolveProcedure>,
        store: Arc<dyn DagStore>,
        names: Option<Arc<dyn NameResolver>>,
    ) -> Self {
        Self {
            procedure,
            store,
            names,
        }
    }

    /// Use one RPC client as procedure, store and name resolver.
    pub fn from_client(client: RpcClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), Some(client))
    }

    /// Drop the name resolver; mutable paths then fail with
    /// `ResolveError::NamingUnavailable`.
    pub fn without_names(mut self) -> Self {
        self.names = None;
        self
    }

    /// Check if a name resolver is attached.
    pub fn has_names(&self) -> bool {
        self.names.is_some()
    }
}

#[async_trait]
impl PathResolver for RemoteResolver {
    fn name(&self) -> &'static str {
        "remote"
    }

    #[tracing::instrument(level = "debug", skip_all, fields(path = %path))]
    async fn resolve_path(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<ImmutablePath, ResolveError> {
        let immutable = pre_resolve(self.names.as_deref(), cancel, path).await?;
        let request = immutable.to_string();

        let answer = cancellable(cancel, self.procedure.dag_resolve(cancel, &request)).await?;
        let resolved =
            build_immutable_path(immutable.namespace(), &answer.cid, &[answer.rem_path.as_str()])?;

        tracing::debug!(
            resolved = %resolved,
            procedure = self.procedure.name(),
            "resolved path remotely"
        );
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
