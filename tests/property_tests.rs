//! Property-based tests for path types and canonical reconstruction.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::collections::BTreeMap;
use std::sync::Arc;

use cid::Cid;
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

use dagpath::core::canonical::build_immutable_path;
use dagpath::core::node::Node;
use dagpath::core::types::{ImmutablePath, Namespace, Path};
use dagpath::naming::MemoryNameSystem;
use dagpath::resolver::{LocalResolver, PathResolver, RemoteResolver};
use dagpath::rpc::LoopbackProcedure;
use dagpath::store::{DagStore, MemoryDagStore};

/// Strategy for generating a single traversal segment.
///
/// Excludes `.` and `..`, which the parser treats as navigation.
fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_~-][a-zA-Z0-9._~-]{0,11}".prop_filter("not a dot segment", |s| {
        s != "." && s != ".."
    })
}

/// Strategy for generating remainders.
fn remainder() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 0..6)
}

/// Strategy for generating CIDs of distinct file nodes.
fn cid() -> impl Strategy<Value = Cid> {
    prop::collection::vec(any::<u8>(), 0..32).prop_map(|bytes| Node::file(bytes).unwrap().cid())
}

/// Strategy for immutable namespaces.
fn immutable_namespace() -> impl Strategy<Value = Namespace> {
    prop_oneof![Just(Namespace::Ipfs), Just(Namespace::Ipld)]
}

proptest! {
    #[test]
    fn canonicalization_is_idempotent(
        ns in immutable_namespace(),
        cid in cid(),
        rest in remainder(),
    ) {
        let once = build_immutable_path(ns, &cid, &rest).unwrap();
        let twice = build_immutable_path(once.namespace(), &once.cid(), once.remainder()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn canonicalization_preserves_parts(
        ns in immutable_namespace(),
        cid in cid(),
        rest in remainder(),
    ) {
        let built = build_immutable_path(ns, &cid, &rest).unwrap();
        prop_assert_eq!(built.namespace(), ns);
        prop_assert_eq!(built.cid(), cid);
        prop_assert_eq!(built.remainder(), rest.as_slice());
    }

    #[test]
    fn display_parse_round_trip(
        ns in immutable_namespace(),
        cid in cid(),
        rest in remainder(),
    ) {
        let built = build_immutable_path(ns, &cid, &rest).unwrap();
        let reparsed: ImmutablePath = built.to_string().parse().unwrap();
        prop_assert_eq!(reparsed, built);
    }

    #[test]
    fn joined_remainder_splits_back(
        ns in immutable_namespace(),
        cid in cid(),
        rest in remainder(),
    ) {
        let joined = rest.join("/");
        let from_parts = build_immutable_path(ns, &cid, &rest).unwrap();
        let from_joined = build_immutable_path(ns, &cid, &[joined.as_str()]).unwrap();
        prop_assert_eq!(from_parts, from_joined);
    }

    #[test]
    fn empty_and_dot_segments_are_ignored(
        cid in cid(),
        rest in remainder(),
    ) {
        let noisy = rest
            .iter()
            .flat_map(|s| [s.as_str(), ".", ""])
            .collect::<Vec<_>>()
            .join("/");
        let clean = Path::from_parts(Namespace::Ipfs, &cid.to_string(), &rest).unwrap();
        let parsed = Path::new(format!("/ipfs/{}/{}", cid, noisy)).unwrap();
        prop_assert_eq!(parsed, clean);
    }

    #[test]
    fn mutable_paths_round_trip(
        name in "[a-z][a-z0-9.-]{0,20}",
        rest in remainder(),
    ) {
        let path = Path::from_parts(Namespace::Ipns, &name, &rest).unwrap();
        let reparsed = Path::new(path.to_string()).unwrap();
        prop_assert!(!reparsed.is_immutable());
        prop_assert_eq!(reparsed, path);
    }

    #[test]
    fn serde_round_trip(
        ns in immutable_namespace(),
        cid in cid(),
        rest in remainder(),
    ) {
        let built = build_immutable_path(ns, &cid, &rest).unwrap();
        let json = serde_json::to_string(&built).unwrap();
        let back: ImmutablePath = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, built);
    }
}

/// A linear chain of directories `d0/d1/.../dn` ending in a document.
fn chain(store: &MemoryDagStore, depth: usize) -> (Cid, Vec<String>) {
    let mut current = store
        .put(&Node::document(serde_json::json!({ "leaf": { "x": 1 } }), BTreeMap::new()).unwrap())
        .unwrap();
    let mut names = Vec::new();
    for level in (0..depth).rev() {
        let name = format!("d{}", level);
        current = store
            .put(&Node::directory(BTreeMap::from([(name.clone(), current)])).unwrap())
            .unwrap();
        names.push(name);
    }
    names.reverse();
    (current, names)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn local_and_remote_agree_on_chains(depth in 0usize..6, take in 0usize..8, tail in 0usize..3) {
        let store = MemoryDagStore::new();
        let (root, dirs) = chain(&store, depth);
        let fields = ["leaf", "x", "y"];

        let mut segments: Vec<String> = dirs.iter().take(take).cloned().collect();
        if take >= depth {
            segments.extend(fields.iter().take(tail).map(|s| s.to_string()));
        }

        let shared: Arc<dyn DagStore> = Arc::new(store);
        let names = Arc::new(MemoryNameSystem::new());
        let local = LocalResolver::new(Arc::clone(&shared), Some(names.clone()));
        let remote = RemoteResolver::new(
            Arc::new(LoopbackProcedure::new(LocalResolver::new(Arc::clone(&shared), None))),
            shared,
            Some(names),
        );

        let path = Path::from_parts(Namespace::Ipfs, &root.to_string(), &segments).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let (l, r) = runtime.block_on(async {
            let cancel = CancellationToken::new();
            (
                local.resolve_path(&cancel, &path).await,
                remote.resolve_path(&cancel, &path).await,
            )
        });

        match (l, r) {
            (Ok(l), Ok(r)) => prop_assert_eq!(l, r),
            (Err(_), Err(_)) => {}
            (l, r) => prop_assert!(false, "strategies diverged: {:?} vs {:?}", l, r),
        }
    }
}
