//! core::node
//!
//! Content-addressed graph nodes.
//!
//! # Encoding
//!
//! A node is encoded as JSON (`data` plus a sorted `links` map of name to CID
//! string). Its CID is a CIDv1 over that encoding with a sha2-256 multihash
//! and the `dag-json` codec, whatever the node kind.
//!
//! Decoding always re-hashes the bytes, so a node obtained through
//! [`Node::decode`] is guaranteed to match the CID it was requested by.
//! A version-0 CID carries only a sha2-256 multihash, so it addresses the
//! same node as the version-1 CID with that multihash.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use dagpath::core::node::Node;
//!
//! let file = Node::file(b"hello".to_vec()).unwrap();
//! let mut entries = BTreeMap::new();
//! entries.insert("hello.txt".to_string(), file.cid());
//! let dir = Node::directory(entries).unwrap();
//!
//! assert_eq!(dir.link("hello.txt"), Some(file.cid()));
//!
//! let bytes = dir.encode().unwrap();
//! let decoded = Node::decode(&dir.cid(), &bytes).unwrap();
//! assert_eq!(decoded, dir);
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use cid::multihash::Multihash;
use cid::{Cid, Version};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Multicodec code for dag-json.
pub const DAG_JSON: u64 = 0x0129;

/// Multihash code for sha2-256.
pub const SHA2_256: u64 = 0x12;

/// Errors from node encoding and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeError {
    #[error("failed to encode node: {0}")]
    Encode(String),

    #[error("failed to decode block {cid}: {reason}")]
    Decode { cid: Cid, reason: String },

    #[error("block integrity mismatch: requested {expected}, content hashes to {actual}")]
    IntegrityMismatch { expected: Cid, actual: Cid },
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum NodeData {
    /// A directory; its entries are the node's links.
    Directory,
    /// A file with its content bytes.
    File(Vec<u8>),
    /// A structured linked-data document.
    Document(serde_json::Value),
}

/// A node in the content graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    cid: Cid,
    data: NodeData,
    links: BTreeMap<String, Cid>,
}

/// Wire form of a node.
#[derive(Serialize, Deserialize)]
struct EncodedNode {
    data: NodeData,
    #[serde(default)]
    links: BTreeMap<String, String>,
}

impl Node {
    /// Create a node and compute its CID.
    pub fn new(data: NodeData, links: BTreeMap<String, Cid>) -> Result<Self, NodeError> {
        let bytes = encode_parts(&data, &links)?;
        let cid = compute_cid(&bytes)?;
        Ok(Self { cid, data, links })
    }

    /// Create a directory node from its entries.
    pub fn directory(entries: BTreeMap<String, Cid>) -> Result<Self, NodeError> {
        Self::new(NodeData::Directory, entries)
    }

    /// Create a file node.
    pub fn file(content: Vec<u8>) -> Result<Self, NodeError> {
        Self::new(NodeData::File(content), BTreeMap::new())
    }

    /// Create a linked-data document node.
    pub fn document(
        value: serde_json::Value,
        links: BTreeMap<String, Cid>,
    ) -> Result<Self, NodeError> {
        Self::new(NodeData::Document(value), links)
    }

    /// Decode a block and verify it hashes to `cid`.
    ///
    /// # Errors
    ///
    /// - `NodeError::Decode` if the bytes are not a valid node encoding
    /// - `NodeError::IntegrityMismatch` if the content does not hash to `cid`
    ///
    /// The decoded node always carries its version-1 CID.
    pub fn decode(cid: &Cid, bytes: &[u8]) -> Result<Self, NodeError> {
        let encoded: EncodedNode =
            serde_json::from_slice(bytes).map_err(|e| NodeError::Decode {
                cid: *cid,
                reason: e.to_string(),
            })?;

        let actual = compute_cid(bytes)?;
        if !addresses(cid, &actual) {
            return Err(NodeError::IntegrityMismatch {
                expected: *cid,
                actual,
            });
        }

        let mut links = BTreeMap::new();
        for (name, target) in encoded.links {
            let target = Cid::from_str(&target).map_err(|e| NodeError::Decode {
                cid: *cid,
                reason: format!("link '{}' has invalid CID: {}", name, e),
            })?;
            links.insert(name, target);
        }

        Ok(Self {
            cid: actual,
            data: encoded.data,
            links,
        })
    }

    /// Encode the node into its block bytes.
    pub fn encode(&self) -> Result<Vec<u8>, NodeError> {
        encode_parts(&self.data, &self.links)
    }

    /// Get the node's content identifier.
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// Get the node's payload.
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Get all named links.
    pub fn links(&self) -> &BTreeMap<String, Cid> {
        &self.links
    }

    /// Look up a named link.
    pub fn link(&self, name: &str) -> Option<Cid> {
        self.links.get(name).copied()
    }

    /// Check if this is a directory node.
    pub fn is_directory(&self) -> bool {
        matches!(self.data, NodeData::Directory)
    }

    /// Check if this is a file node.
    pub fn is_file(&self) -> bool {
        matches!(self.data, NodeData::File(_))
    }

    /// Look up a value inside a document node.
    ///
    /// Each segment selects an object key, or an index into an array.
    /// Returns `None` for non-document nodes or when any segment misses.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use dagpath::core::node::Node;
    ///
    /// let doc = Node::document(
    ///     serde_json::json!({ "meta": { "tags": ["a", "b"] } }),
    ///     BTreeMap::new(),
    /// ).unwrap();
    ///
    /// let tag = doc.field(&["meta", "tags", "1"]).unwrap();
    /// assert_eq!(tag, "b");
    /// assert!(doc.field(&["meta", "missing"]).is_none());
    /// ```
    pub fn field<S: AsRef<str>>(&self, segments: &[S]) -> Option<&serde_json::Value> {
        let NodeData::Document(value) = &self.data else {
            return None;
        };

        segments.iter().try_fold(value, |current, segment| {
            let segment = segment.as_ref();
            match current {
                serde_json::Value::Object(map) => map.get(segment),
                serde_json::Value::Array(items) => {
                    array_index(segment).and_then(|index| items.get(index))
                }
                _ => None,
            }
        })
    }
}

fn encode_parts(data: &NodeData, links: &BTreeMap<String, Cid>) -> Result<Vec<u8>, NodeError> {
    let encoded = EncodedNode {
        data: data.clone(),
        links: links
            .iter()
            .map(|(name, cid)| (name.clone(), cid.to_string()))
            .collect(),
    };
    serde_json::to_vec(&encoded).map_err(|e| NodeError::Encode(e.to_string()))
}

/// Parse an array index segment. Leading zeros are rejected so each element
/// has exactly one spelling.
fn array_index(segment: &str) -> Option<usize> {
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn compute_cid(bytes: &[u8]) -> Result<Cid, NodeError> {
    let digest = Sha256::digest(bytes);
    let hash = Multihash::<64>::wrap(SHA2_256, &digest)
        .map_err(|e| NodeError::Encode(format!("invalid multihash: {}", e)))?;
    Ok(Cid::new_v1(DAG_JSON, hash))
}

/// Whether `requested` names the content whose canonical CID is `canonical`.
fn addresses(requested: &Cid, canonical: &Cid) -> bool {
    match requested.version() {
        Version::V0 => requested.hash() == canonical.hash(),
        Version::V1 => requested == canonical,
    }
}
