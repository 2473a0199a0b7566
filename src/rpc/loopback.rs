//! rpc::loopback
//!
//! In-process stand-in for a remote node.
//!
//! Answers `dag/resolve` the way a node does: the received path is resolved
//! with a [`LocalResolver`] and the answer carries the resolved CID plus the
//! remainder joined with `/`. Failures come back as `RpcError::Api` with
//! status 500, which is how a node reports them over HTTP.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::traits::{RemoteResolution, ResolveProcedure, RpcError};
use crate::core::types::Path;
use crate::resolver::{LocalResolver, PathResolver, ResolveError};

/// HTTP status a node uses for failed commands.
const INTERNAL_ERROR: u16 = 500;

/// Procedure served by an in-process resolver.
#[derive(Debug, Clone)]
pub struct LoopbackProcedure {
    resolver: LocalResolver,
}

impl LoopbackProcedure {
    /// Serve requests with `resolver`.
    pub fn new(resolver: LocalResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ResolveProcedure for LoopbackProcedure {
    fn name(&self) -> &'static str {
        "loopback"
    }

    async fn dag_resolve(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<RemoteResolution, RpcError> {
        let path = Path::new(path).map_err(|e| RpcError::Api {
            status: INTERNAL_ERROR,
            message: e.to_string(),
        })?;

        let resolved = self
            .resolver
            .resolve_path(cancel, &path)
            .await
            .map_err(|e| match e {
                ResolveError::Cancelled => RpcError::Cancelled,
                other => RpcError::Api {
                    status: INTERNAL_ERROR,
                    message: other.to_string(),
                },
            })?;

        Ok(RemoteResolution {
            cid: resolved.cid(),
            rem_path: resolved.remainder().join("/"),
        })
    }
}
