use pretty_assertions::assert_eq;

use super::*;
use crate::result::Field;

const INPUT: &str = "testbob!";

fn fold(parts: Vec<ResultNode<'static>>) -> ResultNode<'static> {
    let start = parts
        .first()
        .and_then(|p| p.slices().first().map(Slice::offset))
        .unwrap_or(0);
    let mut builder = SequenceBuilder::new(INPUT, start);
    for part in parts {
        builder.push(part);
    }
    builder.finish()
}

fn label(name: &str, node: ResultNode<'static>) -> ResultNode<'static> {
    capture(&Name::from(name), node)
}

#[test]
fn test_text_slices_input() {
    assert_eq!(text(INPUT, 4, 7), ResultNode::text("bob", 4));
    assert_eq!(empty(3), ResultNode::text("", 3));
}

#[test]
fn test_empty_sequence_is_empty_text() {
    assert_eq!(SequenceBuilder::new(INPUT, 2).finish(), empty(2));
}

#[test]
fn test_adjacent_text_coalesces() {
    let node = fold(vec![text(INPUT, 0, 4), text(INPUT, 4, 7)]);
    assert_eq!(node, ResultNode::text("testbob", 0));
}

#[test]
fn test_single_part_kept_as_is() {
    let inner = label("nigel", text(INPUT, 0, 4));
    assert_eq!(fold(vec![inner.clone()]), inner);
}

#[test]
fn test_labeled_parts_merge() {
    let node = fold(vec![
        label("nigel", text(INPUT, 0, 4)),
        label("fred", text(INPUT, 4, 7)),
    ]);
    assert_eq!(
        node,
        ResultNode::labeled([
            ("nigel", ResultNode::text("test", 0)),
            ("fred", ResultNode::text("bob", 4)),
        ])
    );
}

#[test]
fn test_repeated_label_merges_into_repeated_field() {
    let node = fold(vec![
        label("x", text(INPUT, 0, 1)),
        label("x", text(INPUT, 1, 2)),
    ]);
    let field = node.as_labeled().and_then(|c| c.get("x")).cloned();
    assert_eq!(
        field,
        Some(Field::Repeated(vec![
            ResultNode::text("t", 0),
            ResultNode::text("e", 1),
        ]))
    );
}

#[test]
fn test_mixed_parts_become_list() {
    let node = fold(vec![
        text(INPUT, 0, 4),
        label("fred", text(INPUT, 4, 7)),
        text(INPUT, 7, 8),
    ]);
    assert_eq!(
        node,
        ResultNode::List(vec![
            ResultNode::text("test", 0),
            ResultNode::labeled([("fred", ResultNode::text("bob", 4))]),
            ResultNode::text("!", 7),
        ])
    );
}

#[test]
fn test_empty_text_dropped_beside_other_parts() {
    // A lookahead contributes an empty slice; it must not turn a single
    // capture into a list.
    let node = fold(vec![empty(0), label("nigel", text(INPUT, 0, 4))]);
    assert_eq!(node, label("nigel", text(INPUT, 0, 4)));
}

#[test]
fn test_empty_text_coalesces_with_text() {
    let node = fold(vec![text(INPUT, 0, 4), empty(4), text(INPUT, 4, 7)]);
    assert_eq!(node, ResultNode::text("testbob", 0));
}

#[test]
fn test_fold_preserves_text() {
    let node = fold(vec![
        text(INPUT, 0, 2),
        label("a", text(INPUT, 2, 4)),
        ResultNode::List(vec![text(INPUT, 4, 5), text(INPUT, 5, 7)]),
        text(INPUT, 7, 8),
    ]);
    assert_eq!(node.flatten(), INPUT);
}
