//! End-to-end traversal tests: filesystem nodes, filters, and the
//! orchestrator composed together.

use std::fs::{self, File};

use kura_recurse::{
    AcceptFn, ArrayNode, DirFlags, DirNode, FilterNode, ParentsOnly, RecursiveNode, Traversal,
    TraversalMode, TraverseError,
};
use kura_types::{Key, Value};
use tempfile::TempDir;

/// tmp/
///   a.txt
///   empty/
///   sub/
///     b.txt
fn make_tree() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    File::create(tmp.path().join("a.txt")).unwrap();
    fs::create_dir(tmp.path().join("empty")).unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    File::create(tmp.path().join("sub/b.txt")).unwrap();
    tmp
}

fn dir_node(tmp: &TempDir, flags: DirFlags) -> Box<dyn RecursiveNode> {
    Box::new(DirNode::new(tmp.path(), flags).unwrap())
}

/// Visited keys, sorted — directory snapshot order is OS-dependent.
fn sorted_keys(t: &mut Traversal) -> Vec<String> {
    let mut keys: Vec<String> = t
        .collect_entries()
        .unwrap()
        .into_iter()
        .map(|(k, _)| k.to_string())
        .collect();
    keys.sort();
    keys
}

#[test]
fn leaves_only_visits_files_and_skips_empty_dirs() {
    let tmp = make_tree();
    let mut t = Traversal::new(
        dir_node(&tmp, DirFlags::SKIP_DOTS),
        TraversalMode::LeavesOnly,
    );
    // Directories are descended through; "empty" produces no position.
    assert_eq!(sorted_keys(&mut t), vec!["a.txt", "b.txt"]);
}

#[test]
fn self_first_visits_dirs_and_files() {
    let tmp = make_tree();
    let mut t = Traversal::new(
        dir_node(&tmp, DirFlags::SKIP_DOTS),
        TraversalMode::SelfFirst,
    );
    assert_eq!(
        sorted_keys(&mut t),
        vec!["a.txt", "b.txt", "empty", "sub"]
    );
}

#[test]
fn child_first_emits_containers_after_their_contents() {
    let tmp = make_tree();
    let mut t = Traversal::new(
        dir_node(&tmp, DirFlags::SKIP_DOTS),
        TraversalMode::ChildFirst,
    );
    let keys: Vec<String> = t
        .collect_entries()
        .unwrap()
        .into_iter()
        .map(|(k, _)| k.to_string())
        .collect();
    let sub = keys.iter().position(|k| k == "sub").unwrap();
    let b = keys.iter().position(|k| k == "b.txt").unwrap();
    assert!(b < sub, "contents must precede their directory: {keys:?}");
    assert_eq!(keys.len(), 4);
}

#[test]
fn max_depth_keeps_traversal_at_top_level() {
    let tmp = make_tree();
    let mut t = Traversal::new(
        dir_node(&tmp, DirFlags::SKIP_DOTS),
        TraversalMode::LeavesOnly,
    )
    .with_max_depth(Some(0));
    // Nothing below the root level; directories surface as leaves.
    assert_eq!(sorted_keys(&mut t), vec!["a.txt", "empty", "sub"]);
}

#[test]
fn parent_filter_yields_only_the_directory_with_children() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    File::create(tmp.path().join("sub/inner.txt")).unwrap();
    File::create(tmp.path().join("plain.txt")).unwrap();

    let inner = DirNode::new(tmp.path(), DirFlags::SKIP_DOTS).unwrap();
    let filtered = FilterNode::new(Box::new(inner), ParentsOnly);
    let mut t = Traversal::new(Box::new(filtered), TraversalMode::SelfFirst);

    let entries = t.collect_entries().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, Key::from("sub"));
}

#[test]
fn filter_applies_at_every_depth() {
    let input = Value::map([
        (Key::from("a"), Value::Int(1)),
        (
            Key::from("b"),
            Value::map([
                (Key::from("b1"), Value::Int(2)),
                (Key::from("b2"), Value::Int(3)),
            ]),
        ),
        (Key::from("c"), Value::Int(4)),
    ]);
    let skip_b1 = AcceptFn(|n: &dyn RecursiveNode| {
        n.key().map(|k| k.to_string()) != Some("b1".to_string())
    });
    let filtered = FilterNode::new(Box::new(ArrayNode::new(&input).unwrap()), skip_b1);
    let mut t = Traversal::new(Box::new(filtered), TraversalMode::LeavesOnly);

    // "b1" is hidden inside the descended subtree, not just at the top.
    assert_eq!(
        t.collect_entries().unwrap(),
        vec![
            (Key::from("a"), Value::Int(1)),
            (Key::from("b2"), Value::Int(3)),
            (Key::from("c"), Value::Int(4)),
        ]
    );
}

#[test]
fn re_rewind_repeats_a_filesystem_traversal() {
    let tmp = make_tree();
    let mut t = Traversal::new(
        dir_node(&tmp, DirFlags::SKIP_DOTS),
        TraversalMode::LeavesOnly,
    );
    let first = t.collect_entries().unwrap();
    let second = t.collect_entries().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn descent_error_propagates_to_the_caller() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    File::create(tmp.path().join("sub/inner.txt")).unwrap();

    // Snapshot first, then pull the subdirectory out from under it.
    let node = DirNode::new(tmp.path(), DirFlags::SKIP_DOTS).unwrap();
    fs::remove_dir_all(tmp.path().join("sub")).unwrap();

    let mut t = Traversal::new(Box::new(node), TraversalMode::LeavesOnly);
    let err = t.rewind().unwrap_err();
    assert!(matches!(err, TraverseError::NotFound(_)));
}

#[test]
fn current_reports_the_deepest_frames_element() {
    let tmp = make_tree();
    let mut t = Traversal::new(
        dir_node(&tmp, DirFlags::SKIP_DOTS | DirFlags::CURRENT_AS_NAME),
        TraversalMode::LeavesOnly,
    );
    t.rewind().unwrap();
    let mut seen = Vec::new();
    while t.valid() {
        seen.push((t.key().unwrap().to_string(), t.current().unwrap()));
        t.next().unwrap();
    }
    for (key, value) in seen {
        assert_eq!(value, Value::from(key.as_str()));
    }
}
