//! naming::memory
//!
//! In-memory name system.
//!
//! # Design
//!
//! Records map a bare name (the root of an `ipns` path) to a target path.
//! A target may itself be an `ipns` path, in which case resolution continues
//! until an immutable path is reached or the depth limit is hit. Every call to
//! [`NameResolver::resolve`] is recorded so tests can assert when the resolver
//! was (or was not) consulted.
//!
//! # Example
//!
//! ```
//! use dagpath::core::types::Path;
//! use dagpath::naming::{MemoryNameSystem, NameResolver};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let names = MemoryNameSystem::new();
//! names.publish(
//!     "example.com",
//!     Path::new("/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/site").unwrap(),
//! );
//!
//! let resolved = names
//!     .resolve(&CancellationToken::new(), "/ipns/example.com/index.html")
//!     .await
//!     .unwrap();
//! assert_eq!(
//!     resolved.to_string(),
//!     "/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/site/index.html"
//! );
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::traits::{NameError, NameResolver};
use crate::core::config::DEFAULT_NAMING_DEPTH;
use crate::core::types::{Namespace, Path};

/// In-memory name system.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share records.
#[derive(Debug, Clone)]
pub struct MemoryNameSystem {
    inner: Arc<Mutex<MemoryNameSystemInner>>,
    max_depth: u32,
}

#[derive(Debug, Default)]
struct MemoryNameSystemInner {
    /// Published records by name.
    records: HashMap<String, Path>,
    /// Error returned by every resolve while set.
    fail_with: Option<NameError>,
    /// Inputs passed to `resolve`, in order.
    lookups: Vec<String>,
}

impl MemoryNameSystem {
    /// Create an empty name system with the default depth limit.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_NAMING_DEPTH)
    }

    /// Create an empty name system with a custom depth limit.
    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryNameSystemInner::default())),
            max_depth,
        }
    }

    /// Publish (or replace) the record for `name`.
    pub fn publish(&self, name: impl Into<String>, target: Path) {
        self.lock().records.insert(name.into(), target);
    }

    /// Remove the record for `name`.
    pub fn unpublish(&self, name: &str) -> bool {
        self.lock().records.remove(name).is_some()
    }

    /// Make every subsequent resolve fail with `error`.
    pub fn fail_with(self, error: NameError) -> Self {
        self.lock().fail_with = Some(error);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_failure(&self) {
        self.lock().fail_with = None;
    }

    /// Get all recorded lookups.
    pub fn lookups(&self) -> Vec<String> {
        self.lock().lookups.clone()
    }

    /// The configured depth limit.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryNameSystemInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryNameSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NameResolver for MemoryNameSystem {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn resolve(&self, cancel: &CancellationToken, path: &str) -> Result<Path, NameError> {
        if cancel.is_cancelled() {
            return Err(NameError::Cancelled);
        }

        let inner = {
            let mut inner = self.lock();
            inner.lookups.push(path.to_string());
            if let Some(err) = &inner.fail_with {
                return Err(err.clone());
            }
            inner.records.clone()
        };

        let mut current = Path::new(path)?;
        let mut hops = 0;

        while current.namespace() == Namespace::Ipns {
            if hops >= self.max_depth {
                return Err(NameError::DepthExceeded {
                    name: path.to_string(),
                    depth: self.max_depth,
                });
            }

            let name = current.root();
            let target = inner
                .get(name)
                .ok_or_else(|| NameError::NotFound(name.to_string()))?;

            tracing::trace!(name, target = %target, "followed name record");
            current = target
                .join(current.remainder())
                .map_err(|e| NameError::InvalidRecord {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            hops += 1;
        }

        Ok(current)
    }
}
