//! core
//!
//! Core domain types, canonicalization and configuration for dagpath.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Namespace, Path, ImmutablePath
//! - [`node`] - Content-addressed graph nodes and their encoding
//! - [`canonical`] - The shared canonical path reconstruction
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid paths from being represented
//! - Canonicalization happens in exactly one place
//! - Nodes are verified against their CID when decoded

pub mod canonical;
pub mod config;
pub mod node;
pub mod types;
