//! resolver
//!
//! Path resolution orchestrators.
//!
//! # Design
//!
//! A [`PathResolver`] turns a possibly-mutable path into an [`ImmutablePath`]
//! and, on request, into the node that path points at. Two strategies share
//! one contract:
//!
//! - [`LocalResolver`] walks an in-process graph with a [`SegmentWalker`]
//!   chosen by namespace.
//! - [`RemoteResolver`] resolves names locally, then hands the walk to a
//!   [`ResolveProcedure`].
//!
//! Both run the same pre-resolution steps (name resolution, namespace gate)
//! and finish through [`build_immutable_path`], so for the same graph and
//! name records they produce the same canonical path.
//!
//! Every step checks the cancellation token first and races the collaborator
//! call against it. Nothing is cached or retried.
//!
//! [`SegmentWalker`]: crate::walker::SegmentWalker
//! [`ResolveProcedure`]: crate::rpc::ResolveProcedure
//! [`build_immutable_path`]: crate::core::canonical::build_immutable_path

pub mod factory;
pub mod local;
pub mod remote;

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::node::Node;
use crate::core::types::{ImmutablePath, Namespace, Path, PathError};
use crate::naming::{NameError, NameResolver};
use crate::rpc::RpcError;
use crate::store::{DagStore, StoreError};
use crate::walker::WalkError;

pub use factory::{create_local_resolver, create_remote_resolver};
pub use local::LocalResolver;
pub use remote::RemoteResolver;

/// Errors from path resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A mutable path was given but no naming service is available.
    #[error("cannot resolve mutable names: no naming service available")]
    NamingUnavailable,

    /// The path ended up in a namespace that cannot be walked.
    #[error("unsupported namespace: {0}")]
    UnsupportedNamespace(Namespace),

    /// Name resolution failed.
    #[error("name resolution failed: {0}")]
    Naming(NameError),

    /// Walking the graph failed.
    #[error("path walk failed: {0}")]
    Walk(WalkError),

    /// The remote procedure failed.
    #[error("remote resolution failed: {0}")]
    Transport(RpcError),

    /// The resolved pieces did not form a valid immutable path.
    #[error("malformed path: {0}")]
    MalformedPath(PathError),

    /// Fetching the resolved node failed.
    #[error("node fetch failed: {0}")]
    Store(StoreError),

    /// The caller cancelled resolution.
    #[error("resolution cancelled")]
    Cancelled,
}

impl From<NameError> for ResolveError {
    fn from(err: NameError) -> Self {
        match err {
            NameError::NoNamingService => ResolveError::NamingUnavailable,
            NameError::Cancelled => ResolveError::Cancelled,
            other => ResolveError::Naming(other),
        }
    }
}

impl From<WalkError> for ResolveError {
    fn from(err: WalkError) -> Self {
        match err {
            WalkError::Cancelled => ResolveError::Cancelled,
            other => ResolveError::Walk(other),
        }
    }
}

impl From<RpcError> for ResolveError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Cancelled => ResolveError::Cancelled,
            other => ResolveError::Transport(other),
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Cancelled => ResolveError::Cancelled,
            other => ResolveError::Store(other),
        }
    }
}

impl From<PathError> for ResolveError {
    fn from(err: PathError) -> Self {
        ResolveError::MalformedPath(err)
    }
}

/// Resolves paths to immutable references and nodes.
///
/// # Thread Safety
///
/// Implementations are immutable after construction and must be
/// `Send + Sync`; one resolver may serve any number of concurrent calls.
#[async_trait]
pub trait PathResolver: Send + Sync {
    /// Get the strategy name (e.g., "local", "remote").
    fn name(&self) -> &'static str;

    /// Resolve `path` to its canonical immutable form.
    ///
    /// The result holds the deepest CID the walk reached and whatever
    /// segments could not be resolved past it.
    async fn resolve_path(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<ImmutablePath, ResolveError>;

    /// Resolve `path` and fetch the node at the resolved CID.
    ///
    /// Any unresolved remainder is not applied to the node; use
    /// [`resolve_path`](PathResolver::resolve_path) to inspect it.
    async fn resolve_node(
        &self,
        cancel: &CancellationToken,
        path: &Path,
    ) -> Result<Node, ResolveError>;
}

/// Run one collaborator call, unless or until `cancel` fires.
pub(crate) async fn cancellable<F, T, E>(
    cancel: &CancellationToken,
    call: F,
) -> Result<T, ResolveError>
where
    F: Future<Output = Result<T, E>>,
    ResolveError: From<E>,
{
    if cancel.is_cancelled() {
        return Err(ResolveError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ResolveError::Cancelled),
        result = call => result.map_err(ResolveError::from),
    }
}

/// Resolve a mutable path to an immutable one and apply the namespace gate.
///
/// Immutable inputs never reach the name resolver.
pub(crate) async fn pre_resolve(
    names: Option<&dyn NameResolver>,
    cancel: &CancellationToken,
    path: &Path,
) -> Result<ImmutablePath, ResolveError> {
    if cancel.is_cancelled() {
        return Err(ResolveError::Cancelled);
    }

    let resolved = if path.namespace() == Namespace::Ipns {
        let names = names.ok_or(ResolveError::NamingUnavailable)?;
        let resolved = cancellable(cancel, names.resolve(cancel, &path.to_string())).await?;
        tracing::debug!(from = %path, to = %resolved, resolver = names.name(), "resolved name");
        resolved
    } else {
        path.clone()
    };

    if !resolved.namespace().is_immutable() {
        return Err(ResolveError::UnsupportedNamespace(resolved.namespace()));
    }

    Ok(ImmutablePath::new(resolved)?)
}

/// Fetch the node at the root CID of a resolved path.
pub(crate) async fn materialize(
    store: &dyn DagStore,
    cancel: &CancellationToken,
    resolved: &ImmutablePath,
) -> Result<Node, ResolveError> {
    let cid = resolved.cid();
    let node = cancellable(cancel, store.get(cancel, &cid)).await?;
    tracing::debug!(%cid, store = store.name(), "materialized node");
    Ok(node)
}
