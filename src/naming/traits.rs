//! naming::traits
//!
//! Name resolver trait definition.
//!
//! # Design
//!
//! A name resolver maps a path in the mutable `ipns` namespace to a path in
//! an immutable namespace. Paths that are already immutable are returned
//! unchanged. Staleness and caching of records are the resolver's concern;
//! callers re-resolve from scratch on every request.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::types::{Path, PathError};

/// Errors from name resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    /// No naming service is available to resolve mutable names.
    #[error("no naming service available")]
    NoNamingService,

    /// The input was not a valid path.
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// No record exists for the name.
    #[error("name not found: {0}")]
    NotFound(String),

    /// The record for a name does not hold a usable path.
    #[error("invalid record for '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },

    /// Following records took more hops than allowed.
    #[error("resolving '{name}' exceeded the maximum depth of {depth}")]
    DepthExceeded { name: String, depth: u32 },

    /// The backing naming service failed.
    #[error("naming backend error: {0}")]
    Backend(String),

    /// The caller cancelled resolution.
    #[error("name resolution cancelled")]
    Cancelled,
}

/// Resolver for mutable names.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Cancellation
///
/// Implementations must observe `cancel` and return `NameError::Cancelled`
/// once it fires.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Get the resolver name (e.g., "memory", "rpc").
    fn name(&self) -> &'static str;

    /// Resolve `path` to a path rooted in an immutable namespace.
    ///
    /// Traversal segments after the name are preserved: resolving
    /// `/ipns/name/a/b` where `name` points at `/ipfs/C` yields `/ipfs/C/a/b`.
    ///
    /// # Errors
    ///
    /// - `NoNamingService` if this resolver cannot resolve names at all
    /// - `NotFound` / `InvalidRecord` / `DepthExceeded` for record problems
    /// - `Backend` for transport failures
    /// - `Cancelled` if `cancel` fired
    async fn resolve(&self, cancel: &CancellationToken, path: &str) -> Result<Path, NameError>;
}
