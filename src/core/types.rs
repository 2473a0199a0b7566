//! core::types
//!
//! Strong types for path values.
//!
//! # Types
//!
//! - [`Namespace`] - The closed set of path namespaces (`ipfs`, `ipld`, `ipns`)
//! - [`Path`] - A parsed, cleaned path: namespace plus root plus traversal segments
//! - [`ImmutablePath`] - A [`Path`] rooted at a content identifier
//!
//! # Validation
//!
//! These types enforce validity at construction time. A [`Path`] always has a
//! namespace and a non-empty root, and an [`ImmutablePath`] always carries a
//! parsed root CID.
//!
//! # Examples
//!
//! ```
//! use dagpath::core::types::{ImmutablePath, Namespace, Path};
//!
//! let path = Path::new("/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/docs//./readme.txt").unwrap();
//! assert_eq!(path.namespace(), Namespace::Ipfs);
//! assert_eq!(path.remainder(), ["docs", "readme.txt"]);
//! assert_eq!(
//!     path.to_string(),
//!     "/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/docs/readme.txt"
//! );
//!
//! let immutable = ImmutablePath::new(path).unwrap();
//! assert_eq!(immutable.cid().to_string(), "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG");
//!
//! // Invalid constructions fail at creation time
//! assert!(Path::new("ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").is_err());
//! assert!(Path::new("/ipfs/not-a-cid").is_err());
//! assert!(ImmutablePath::new(Path::new("/ipns/example.com").unwrap()).is_err());
//! ```

use std::str::FromStr;

use cid::Cid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from path validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path '{0}': path must start with '/' and contain a namespace and a root")]
    InsufficientComponents(String),

    #[error("invalid path '{path}': unknown namespace '{namespace}'")]
    UnknownNamespace { path: String, namespace: String },

    #[error("invalid path '{path}': root is not a valid CID: {reason}")]
    InvalidCid { path: String, reason: String },

    #[error("path '{0}' is not rooted in an immutable namespace")]
    NotImmutable(String),

    #[error("canonical path '{path}' is rooted at {actual}, expected {expected}")]
    RootMismatch {
        path: String,
        expected: Cid,
        actual: Cid,
    },
}

/// The namespace of a path.
///
/// This is a closed set: paths in any other namespace fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Immutable content, walked with file-system semantics.
    Ipfs,
    /// Immutable linked data, walked generically.
    Ipld,
    /// Mutable names, resolved through a naming service.
    Ipns,
}

impl Namespace {
    /// Get the namespace tag as it appears in a path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Ipfs => "ipfs",
            Namespace::Ipld => "ipld",
            Namespace::Ipns => "ipns",
        }
    }

    /// Parse a namespace tag.
    ///
    /// # Example
    ///
    /// ```
    /// use dagpath::core::types::Namespace;
    ///
    /// assert_eq!(Namespace::parse("ipld"), Some(Namespace::Ipld));
    /// assert_eq!(Namespace::parse("IPFS"), None);
    /// ```
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "ipfs" => Some(Namespace::Ipfs),
            "ipld" => Some(Namespace::Ipld),
            "ipns" => Some(Namespace::Ipns),
            _ => None,
        }
    }

    /// Whether paths in this namespace are rooted at a content identifier.
    pub fn is_immutable(&self) -> bool {
        matches!(self, Namespace::Ipfs | Namespace::Ipld)
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated path.
///
/// A path is `/<namespace>/<root>[/<segment>]*`. Parsing cleans the input
/// lexically: empty segments and `.` are dropped and `..` removes the
/// preceding segment. Trailing slashes are not preserved.
///
/// For the immutable namespaces the root must be a valid CID; for `ipns`
/// the root is an arbitrary name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    namespace: Namespace,
    /// Root first, then the traversal segments.
    segments: Vec<String>,
}

impl Path {
    /// Parse and validate a path string.
    ///
    /// # Errors
    ///
    /// - `PathError::InsufficientComponents` if the string does not start with
    ///   `/` or lacks a namespace or root
    /// - `PathError::UnknownNamespace` for namespaces outside the closed set
    /// - `PathError::InvalidCid` if an immutable root does not parse as a CID
    pub fn new(path: impl AsRef<str>) -> Result<Self, PathError> {
        let path = path.as_ref();
        let mut components = clean_components(path);

        if !path.starts_with('/') || components.len() < 2 {
            return Err(PathError::InsufficientComponents(path.to_string()));
        }

        let tag = components.remove(0);
        let namespace = Namespace::parse(&tag).ok_or_else(|| PathError::UnknownNamespace {
            path: path.to_string(),
            namespace: tag.clone(),
        })?;

        if namespace.is_immutable() {
            parse_cid(path, &components[0])?;
        }

        Ok(Self {
            namespace,
            segments: components,
        })
    }

    /// Build a path from a namespace, a root and traversal segments.
    ///
    /// The result is parsed from its string form, so segments containing `/`
    /// are split and the usual cleaning applies.
    pub fn from_parts<S: AsRef<str>>(
        namespace: Namespace,
        root: &str,
        segments: &[S],
    ) -> Result<Self, PathError> {
        let mut joined = format!("/{}/{}", namespace, root);
        for segment in segments {
            joined.push('/');
            joined.push_str(segment.as_ref());
        }
        Self::new(joined)
    }

    /// Get the namespace.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Get all segments after the namespace, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Get the root segment (a CID string or a name).
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Get the traversal segments after the root.
    pub fn remainder(&self) -> &[String] {
        &self.segments[1..]
    }

    /// Whether this path is rooted in an immutable namespace.
    pub fn is_immutable(&self) -> bool {
        self.namespace.is_immutable()
    }

    /// Append segments to this path.
    ///
    /// # Example
    ///
    /// ```
    /// use dagpath::core::types::Path;
    ///
    /// let base = Path::new("/ipns/example.com/a").unwrap();
    /// let joined = base.join(&["b/c", "d"]).unwrap();
    /// assert_eq!(joined.to_string(), "/ipns/example.com/a/b/c/d");
    /// ```
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> Result<Self, PathError> {
        let mut all: Vec<&str> = self.remainder().iter().map(String::as_str).collect();
        all.extend(segments.iter().map(AsRef::as_ref));
        Self::from_parts(self.namespace, self.root(), &all)
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Path {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.namespace)?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// A path rooted at a content identifier.
///
/// Only the `ipfs` and `ipld` namespaces qualify. Resolvers produce these as
/// their terminal output; the value is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImmutablePath {
    path: Path,
    cid: Cid,
}

impl ImmutablePath {
    /// Wrap a path whose root is a content identifier.
    ///
    /// # Errors
    ///
    /// - `PathError::NotImmutable` if the path is in the `ipns` namespace
    /// - `PathError::InvalidCid` if the root does not parse as a CID
    pub fn new(path: Path) -> Result<Self, PathError> {
        if !path.is_immutable() {
            return Err(PathError::NotImmutable(path.to_string()));
        }
        let cid = parse_cid(&path.to_string(), path.root())?;
        Ok(Self { path, cid })
    }

    /// Get the root content identifier.
    pub fn cid(&self) -> Cid {
        self.cid
    }

    /// Get the namespace (always `Ipfs` or `Ipld`).
    pub fn namespace(&self) -> Namespace {
        self.path.namespace()
    }

    /// Get the segments after the root CID.
    pub fn remainder(&self) -> &[String] {
        self.path.remainder()
    }

    /// Borrow the underlying path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Convert into the underlying path.
    pub fn into_path(self) -> Path {
        self.path
    }
}

impl TryFrom<Path> for ImmutablePath {
    type Error = PathError;

    fn try_from(path: Path) -> Result<Self, Self::Error> {
        Self::new(path)
    }
}

impl From<ImmutablePath> for Path {
    fn from(path: ImmutablePath) -> Self {
        path.path
    }
}

impl FromStr for ImmutablePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Path::new(s)?)
    }
}

impl TryFrom<String> for ImmutablePath {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ImmutablePath> for String {
    fn from(path: ImmutablePath) -> Self {
        path.to_string()
    }
}

impl AsRef<Path> for ImmutablePath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Display for ImmutablePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.path.fmt(f)
    }
}

/// Split a path string into cleaned components.
fn clean_components(path: &str) -> Vec<String> {
    let mut components: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                components.pop();
            }
            other => components.push(other),
        }
    }
    components.into_iter().map(str::to_string).collect()
}

fn parse_cid(path: &str, root: &str) -> Result<Cid, PathError> {
    Cid::from_str(root).map_err(|e| PathError::InvalidCid {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
    const CID_V1: &str = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";

    mod namespace {
        use super::*;

        #[test]
        fn parse_known_tags() {
            assert_eq!(Namespace::parse("ipfs"), Some(Namespace::Ipfs));
            assert_eq!(Namespace::parse("ipld"), Some(Namespace::Ipld));
            assert_eq!(Namespace::parse("ipns"), Some(Namespace::Ipns));
        }

        #[test]
        fn parse_unknown_tags() {
            assert_eq!(Namespace::parse(""), None);
            assert_eq!(Namespace::parse("http"), None);
            assert_eq!(Namespace::parse("Ipfs"), None);
        }

        #[test]
        fn immutability() {
            assert!(Namespace::Ipfs.is_immutable());
            assert!(Namespace::Ipld.is_immutable());
            assert!(!Namespace::Ipns.is_immutable());
        }

        #[test]
        fn display() {
            assert_eq!(format!("{}", Namespace::Ipfs), "ipfs");
            assert_eq!(format!("{}", Namespace::Ipld), "ipld");
            assert_eq!(format!("{}", Namespace::Ipns), "ipns");
        }
    }

    mod path {
        use super::*;

        #[test]
        fn parses_immutable_path() {
            let path = Path::new(format!("/ipfs/{CID_V1}/a/b")).unwrap();
            assert_eq!(path.namespace(), Namespace::Ipfs);
            assert_eq!(path.root(), CID_V1);
            assert_eq!(path.remainder(), ["a", "b"]);
            assert_eq!(path.segments().len(), 3);
        }

        #[test]
        fn parses_mutable_path_with_any_root() {
            let path = Path::new("/ipns/example.com/docs").unwrap();
            assert_eq!(path.namespace(), Namespace::Ipns);
            assert_eq!(path.root(), "example.com");
            assert_eq!(path.remainder(), ["docs"]);
        }

        #[test]
        fn root_only_has_empty_remainder() {
            let path = Path::new(format!("/ipld/{CID_V0}")).unwrap();
            assert!(path.remainder().is_empty());
        }

        #[test]
        fn cleans_redundant_segments() {
            let path = Path::new(format!("/ipfs/{CID_V1}//a/./b/../c/")).unwrap();
            assert_eq!(path.remainder(), ["a", "c"]);
            assert_eq!(path.to_string(), format!("/ipfs/{CID_V1}/a/c"));
        }

        #[test]
        fn missing_leading_slash_rejected() {
            let err = Path::new(format!("ipfs/{CID_V1}")).unwrap_err();
            assert!(matches!(err, PathError::InsufficientComponents(_)));
        }

        #[test]
        fn missing_root_rejected() {
            assert!(matches!(
                Path::new("/ipfs"),
                Err(PathError::InsufficientComponents(_))
            ));
            assert!(matches!(
                Path::new("/ipns/"),
                Err(PathError::InsufficientComponents(_))
            ));
            assert!(matches!(
                Path::new("/"),
                Err(PathError::InsufficientComponents(_))
            ));
            assert!(matches!(
                Path::new(""),
                Err(PathError::InsufficientComponents(_))
            ));
        }

        #[test]
        fn dot_dot_past_root_rejected() {
            assert!(Path::new(format!("/ipfs/{CID_V1}/../..")).is_err());
        }

        #[test]
        fn unknown_namespace_rejected() {
            let err = Path::new("/http/example.com").unwrap_err();
            assert_eq!(
                err,
                PathError::UnknownNamespace {
                    path: "/http/example.com".to_string(),
                    namespace: "http".to_string(),
                }
            );
        }

        #[test]
        fn invalid_cid_rejected() {
            let err = Path::new("/ipfs/not-a-cid/a").unwrap_err();
            assert!(matches!(err, PathError::InvalidCid { .. }));
            assert!(Path::new("/ipld/zzz").is_err());
        }

        #[test]
        fn from_parts_matches_parse() {
            let built = Path::from_parts(Namespace::Ipfs, CID_V1, &["a", "b"]).unwrap();
            let parsed = Path::new(format!("/ipfs/{CID_V1}/a/b")).unwrap();
            assert_eq!(built, parsed);
        }

        #[test]
        fn from_parts_splits_joined_segments() {
            let built = Path::from_parts(Namespace::Ipld, CID_V1, &["a/b", "", "c"]).unwrap();
            assert_eq!(built.remainder(), ["a", "b", "c"]);
        }

        #[test]
        fn join_appends_after_remainder() {
            let base = Path::new("/ipns/example.com/a").unwrap();
            let joined = base.join(&["b"]).unwrap();
            assert_eq!(joined.to_string(), "/ipns/example.com/a/b");
            let unchanged = base.join::<&str>(&[]).unwrap();
            assert_eq!(unchanged, base);
        }

        #[test]
        fn display_roundtrip() {
            let input = format!("/ipld/{CID_V0}/x/y/z");
            let path = Path::new(&input).unwrap();
            assert_eq!(path.to_string(), input);
            assert_eq!(Path::new(path.to_string()).unwrap(), path);
        }

        #[test]
        fn serde_roundtrip() {
            let path = Path::new("/ipns/example.com/docs").unwrap();
            let json = serde_json::to_string(&path).unwrap();
            assert_eq!(json, "\"/ipns/example.com/docs\"");
            let parsed: Path = serde_json::from_str(&json).unwrap();
            assert_eq!(path, parsed);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result: Result<Path, _> = serde_json::from_str("\"/nope/x\"");
            assert!(result.is_err());
        }
    }

    mod immutable_path {
        use super::*;

        #[test]
        fn exposes_cid_and_remainder() {
            let path: ImmutablePath = format!("/ipfs/{CID_V1}/a").parse().unwrap();
            assert_eq!(path.cid().to_string(), CID_V1);
            assert_eq!(path.namespace(), Namespace::Ipfs);
            assert_eq!(path.remainder(), ["a"]);
        }

        #[test]
        fn accepts_ipld() {
            let path = ImmutablePath::new(Path::new(format!("/ipld/{CID_V0}")).unwrap()).unwrap();
            assert_eq!(path.namespace(), Namespace::Ipld);
            assert_eq!(path.cid().to_string(), CID_V0);
        }

        #[test]
        fn rejects_mutable_namespace() {
            let err = ImmutablePath::new(Path::new("/ipns/example.com").unwrap()).unwrap_err();
            assert_eq!(err, PathError::NotImmutable("/ipns/example.com".to_string()));
        }

        #[test]
        fn converts_back_to_path() {
            let path = Path::new(format!("/ipfs/{CID_V1}/a")).unwrap();
            let immutable = ImmutablePath::try_from(path.clone()).unwrap();
            assert_eq!(immutable.as_path(), &path);
            assert_eq!(Path::from(immutable.clone()), path);
            assert_eq!(immutable.into_path(), path);
        }

        #[test]
        fn serde_roundtrip() {
            let path: ImmutablePath = format!("/ipld/{CID_V1}/k").parse().unwrap();
            let json = serde_json::to_string(&path).unwrap();
            let parsed: ImmutablePath = serde_json::from_str(&json).unwrap();
            assert_eq!(path, parsed);
        }
    }
}
