//! walker
//!
//! Segment walkers over the content graph.
//!
//! # Modules
//!
//! - `traits`: Core `SegmentWalker` trait and `WalkError`
//! - [`ipld`]: Linked-data walker used for the `ipld` namespace
//! - [`unixfs`]: Directory-aware walker used for the `ipfs` namespace

pub mod ipld;
mod traits;
pub mod unixfs;

pub use ipld::LinkedDataWalker;
pub use traits::*;
pub use unixfs::UnixfsWalker;
