use pretty_assertions::assert_eq;

use super::*;
use crate::error::{ErrorKind, RuleCycle};
use crate::expr::{any, choice, literal, repeat, rule_ref, sequence};
use crate::CharClass;

fn names(list: &[&str]) -> Vec<Name> {
    list.iter().map(|n| Name::from(*n)).collect()
}

#[test]
fn test_build_and_inspect() {
    let g = match Grammar::new(
        [
            rule("greeting", sequence([literal("hello "), rule_ref("name")])),
            rule("name", choice(["bob", "fred"])),
        ],
        "greeting",
    ) {
        Ok(g) => g,
        Err(e) => panic!("grammar should build: {e}"),
    };

    assert_eq!(g.len(), 2);
    assert!(!g.is_empty());
    assert_eq!(g.root_rule().name, "greeting");
    assert_eq!(g.lookup("name").map(RuleId::index), Some(1));
    assert_eq!(g.lookup("missing"), None);
    assert_eq!(
        g.rule_names().cloned().collect::<Vec<_>>(),
        names(&["greeting", "name"])
    );
    assert_eq!(
        format!("{g:?}"),
        "{:greeting: Expr(('hello ' name)), :name: Expr(('bob' / 'fred'))} root=greeting"
    );
}

#[test]
fn test_single_rule_grammar() {
    let g = Grammar::single(literal("a").repeat(2, None));
    assert!(matches!(g, Ok(ref g) if g.root_rule().name == Grammar::SINGLE_ROOT));
}

#[test]
fn test_empty_grammar() {
    let err = Grammar::new(Vec::new(), "root").err();
    assert_eq!(err, Some(GrammarError::EmptyGrammar));
}

#[test]
fn test_duplicate_rule() {
    let err = Grammar::new([rule("a", "x"), rule("a", "y")], "a").err();
    assert_eq!(
        err,
        Some(GrammarError::DuplicateRule {
            name: Name::from("a")
        })
    );
}

#[test]
fn test_unknown_root() {
    let err = Grammar::new([rule("a", "x")], "b").err();
    assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::UnknownRoot));
}

#[test]
fn test_unresolved_rule_is_eager() {
    // `missing` sits behind a choice that would never reach it on most
    // inputs; it is still rejected at build.
    let err = Grammar::new(
        [rule("top", choice([literal("a"), rule_ref("missing")]))],
        "top",
    )
    .err();
    assert_eq!(
        err,
        Some(GrammarError::UnresolvedRule {
            name: Name::from("missing"),
            referenced_from: Name::from("top"),
        })
    );
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("rule `top` refers to undefined rule `missing`".to_string())
    );
}

#[test]
fn test_invalid_repeat_bounds() {
    let err = Grammar::single(repeat(literal("a"), 3, Some(1))).err();
    assert_eq!(
        err,
        Some(GrammarError::InvalidRepeatBounds {
            rule: Name::from("root"),
            min: 3,
            max: 1,
        })
    );
    assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::InvalidRepeatBounds));
}

#[test]
fn test_invalid_char_range() {
    let err = Grammar::single(CharClass::new().range('z', 'a')).err();
    assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::InvalidCharRange));
}

#[test]
fn test_first_error_in_declaration_order() {
    let err = Grammar::new(
        [
            rule("a", repeat(literal("x"), 2, Some(1))),
            rule("b", rule_ref("nowhere")),
        ],
        "a",
    )
    .err();
    assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::InvalidRepeatBounds));
}

#[test]
fn test_direct_left_recursion() {
    let err = Grammar::new(
        [rule(
            "expr",
            choice([sequence([rule_ref("expr"), literal("+"), literal("1")]), literal("1")]),
        )],
        "expr",
    )
    .err();
    assert_eq!(
        err,
        Some(GrammarError::LeftRecursion {
            cycle: RuleCycle(names(&["expr", "expr"])),
        })
    );
}

#[test]
fn test_indirect_left_recursion_through_nullable_prefix() {
    // `b` starts with an optional `ws`, so it can reach `a` at its own offset.
    let err = Grammar::new(
        [
            rule("a", sequence([rule_ref("b"), literal("x")])),
            rule("b", sequence([rule_ref("ws"), rule_ref("a")])),
            rule("ws", repeat(literal(" "), 0, None)),
        ],
        "a",
    )
    .err();
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("left-recursive rule cycle: a -> b -> a".to_string())
    );
}

#[test]
fn test_right_recursion_is_accepted() {
    let g = Grammar::new(
        [rule(
            "parens",
            choice([
                sequence([literal("("), rule_ref("parens"), literal(")")]),
                literal(""),
            ]),
        )],
        "parens",
    );
    assert!(g.is_ok());
}

#[test]
fn test_recursion_after_consuming_is_accepted() {
    let g = Grammar::new(
        [
            rule("list", sequence([any(), rule_ref("rest")])),
            rule("rest", repeat(sequence([literal(","), rule_ref("list")]), 0, None)),
        ],
        "list",
    );
    assert!(g.is_ok());
}

#[test]
fn test_zero_max_repeat_never_calls_inner() {
    let g = Grammar::new(
        [rule(
            "a",
            sequence([repeat(rule_ref("a"), 0, Some(0)), literal("x")]),
        )],
        "a",
    );
    assert!(g.is_ok());
}

#[test]
fn test_lookahead_is_nullable_prefix() {
    let err = Grammar::new(
        [rule("a", sequence([literal("x").present(), rule_ref("a")]))],
        "a",
    )
    .err();
    assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::LeftRecursion));
}

/// `levels` nested sequences, each holding its child twice.
fn doubled(base: Expr, levels: usize) -> Expr {
    (0..levels).fold(base, |e, _| sequence([&e, &e]))
}

#[test]
fn test_shared_subtrees_are_checked_once() {
    // 2^40 paths through 41 distinct nodes.
    let g = Grammar::single(doubled(literal("a"), 40));
    assert!(g.is_ok());

    let err = Grammar::single(doubled(rule_ref("missing"), 40)).err();
    assert_eq!(err.map(|e| e.kind()), Some(ErrorKind::UnresolvedRule));
}

#[test]
fn test_left_recursion_through_shared_nullable_subtree() {
    let prefix = doubled(literal("").maybe(), 40);
    let err = Grammar::new(
        [
            rule("a", sequence([prefix.clone(), rule_ref("a")])),
            rule("b", choice([doubled(rule_ref("a"), 40), prefix])),
        ],
        "a",
    )
    .err();
    assert_eq!(
        err,
        Some(GrammarError::LeftRecursion {
            cycle: RuleCycle(names(&["a", "a"]))
        })
    );
}
