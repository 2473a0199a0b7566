//! core::canonical
//!
//! Canonical reconstruction of resolved paths.
//!
//! Every resolver, local or remote, finishes by calling
//! [`build_immutable_path`]. The function formats
//! `/<namespace>/<cid>[/<segment>]*`, parses it back through [`Path::new`] and
//! wraps it as an [`ImmutablePath`], so all resolved paths share one textual
//! form no matter how deep the walk went or how the remainder was delivered.

use cid::Cid;

use super::types::{ImmutablePath, Namespace, Path, PathError};

/// Build the canonical immutable path for a resolved CID and its remainder.
///
/// Remainder entries may themselves contain `/`; they are split by the parser.
/// This is how a remote remainder string is re-split into segments.
///
/// # Errors
///
/// - `PathError::NotImmutable` if `namespace` is `Ipns` (a caller bug: both
///   resolvers gate the namespace before reaching this point)
/// - `PathError::RootMismatch` if the remainder would climb above the root
///   and re-root the path at another CID
/// - any parse error of the formatted string
///
/// # Example
///
/// ```
/// use dagpath::core::canonical::build_immutable_path;
/// use dagpath::core::types::{ImmutablePath, Namespace};
///
/// let resolved: ImmutablePath =
///     "/ipfs/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".parse().unwrap();
///
/// let path = build_immutable_path(Namespace::Ipld, &resolved.cid(), &["a/b", "c"]).unwrap();
/// assert_eq!(path.remainder(), ["a", "b", "c"]);
/// assert_eq!(
///     path.to_string(),
///     "/ipld/QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG/a/b/c"
/// );
/// ```
pub fn build_immutable_path<S: AsRef<str>>(
    namespace: Namespace,
    cid: &Cid,
    remainder: &[S],
) -> Result<ImmutablePath, PathError> {
    if !namespace.is_immutable() {
        return Err(PathError::NotImmutable(format!("/{}/{}", namespace, cid)));
    }

    let path = ImmutablePath::new(Path::from_parts(namespace, &cid.to_string(), remainder)?)?;

    if path.cid() != *cid {
        return Err(PathError::RootMismatch {
            path: path.to_string(),
            expected: *cid,
            actual: path.cid(),
        });
    }

    Ok(path)
}
