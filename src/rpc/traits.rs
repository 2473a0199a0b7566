//! rpc::traits
//!
//! Remote resolution procedure trait definition.
//!
//! # Design
//!
//! The remote resolution strategy sends an immutable path to a service that
//! walks the graph on its side and answers with the deepest CID it reached
//! and the unresolved remainder as one `/`-joined string. The procedure only
//! carries the request; canonicalizing the answer is the caller's job.

use async_trait::async_trait;
use cid::Cid;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors from talking to the remote API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    /// The request could not be sent or the response not read.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The HTTP client could not be built from its settings.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,
}

/// Answer of a remote `dag/resolve` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResolution {
    /// Deepest CID the remote walk reached.
    pub cid: Cid,
    /// Unresolved remainder, segments joined with `/` (empty if none).
    pub rem_path: String,
}

/// A procedure that walks an immutable path on a remote service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`.
#[async_trait]
pub trait ResolveProcedure: Send + Sync {
    /// Get the procedure name (e.g., "rpc", "loopback").
    fn name(&self) -> &'static str;

    /// Resolve `path` remotely.
    ///
    /// # Errors
    ///
    /// - `Network` / `Api` / `Decode` for transport or remote failures
    /// - `Cancelled` if `cancel` fired
    async fn dag_resolve(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<RemoteResolution, RpcError>;
}
