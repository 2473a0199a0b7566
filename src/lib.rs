//! dagpath - Path resolution for content-addressed graphs
//!
//! dagpath turns a human-navigable path such as `/ipns/example.com/docs/a`
//! into an immutable, content-addressed reference: a fixed CID plus whatever
//! segments could not be resolved past it. It can also fetch the node that
//! reference points at.
//!
//! # Architecture
//!
//! - [`core`] - Path types, the node model, canonical path reconstruction, configuration
//! - [`naming`] - Mutable name resolution
//! - [`store`] - Content graph stores
//! - [`walker`] - Segment walkers over the graph
//! - [`resolver`] - Local and remote resolution strategies
//! - [`rpc`] - Remote resolution procedures (HTTP API client, loopback)
//! - [`logging`] - Subscriber setup for `tracing` output
//!
//! # Guarantees
//!
//! 1. Every resolved path is rebuilt through one canonicalization function
//! 2. Local and remote resolution agree for the same graph and name records
//! 3. Immutable inputs never reach the name resolver
//! 4. Every call honors its cancellation token
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use dagpath::core::node::Node;
//! use dagpath::core::types::Path;
//! use dagpath::resolver::{LocalResolver, PathResolver};
//! use dagpath::store::MemoryDagStore;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryDagStore::new();
//! let file = store.put(&Node::file(b"hi".to_vec()).unwrap()).unwrap();
//! let root = store
//!     .put(&Node::directory(BTreeMap::from([("hi.txt".to_string(), file)])).unwrap())
//!     .unwrap();
//!
//! let resolver = LocalResolver::new(Arc::new(store), None);
//! let path = Path::new(format!("/ipfs/{}/hi.txt", root)).unwrap();
//! let resolved = resolver
//!     .resolve_path(&CancellationToken::new(), &path)
//!     .await
//!     .unwrap();
//! assert_eq!(resolved.cid(), file);
//! # });
//! ```

pub mod core;
pub mod logging;
pub mod naming;
pub mod resolver;
pub mod rpc;
pub mod store;
pub mod walker;
