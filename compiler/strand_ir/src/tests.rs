use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_literal_display_escapes() {
    assert_eq!(literal("bob").to_string(), "'bob'");
    assert_eq!(literal("it's\n").to_string(), "'it\\'s\\n'");
}

#[test]
fn test_fluent_and_free_functions_build_same_tree() {
    let free = sequence([
        capture(literal("test"), "nigel"),
        capture(literal("bob"), "fred"),
    ]);
    let fluent = literal("test")
        .capture("nigel")
        .then(literal("bob").capture("fred"));
    assert_eq!(free, fluent);
    assert_eq!(fluent.to_string(), "(nigel:'test' fred:'bob')");
}

#[test]
fn test_then_flattens_sequences() {
    let expr = literal("a").then("b").then("c");
    match expr.kind() {
        ExprKind::Sequence(children) => assert_eq!(children.len(), 3),
        other => panic!("expected sequence, got {other:?}"),
    }
}

#[test]
fn test_or_flattens_choices() {
    let expr = literal("a").or("b").or("c");
    assert_eq!(expr.to_string(), "('a' / 'b' / 'c')");
}

#[test]
fn test_combinators_do_not_mutate_operands() {
    let base = literal("a").then("b");
    let extended = base.then("c");
    assert_eq!(base.to_string(), "('a' 'b')");
    assert_eq!(extended.to_string(), "('a' 'b' 'c')");
}

#[test]
fn test_subtrees_are_shared() {
    let word = literal("word");
    let twice = sequence([word.clone(), word.clone()]);
    let ExprKind::Sequence(children) = twice.kind() else {
        panic!("expected sequence, got {twice}");
    };
    assert!(children[0].ptr_eq(&word));
    assert!(children[1].ptr_eq(&word));
}

#[test]
fn test_repeat_bounds_display() {
    assert_eq!(literal("a").repeat(0, None).to_string(), "'a'*");
    assert_eq!(literal("a").repeat(1, None).to_string(), "'a'+");
    assert_eq!(literal("a").maybe().to_string(), "'a'?");
    assert_eq!(literal("a").repeat(2, None).to_string(), "'a'{2,}");
    assert_eq!(literal("a").repeat(3, Some(3)).to_string(), "'a'{3}");
    assert_eq!(literal("a").repeat(1, Some(4)).to_string(), "'a'{1,4}");
}

#[test]
fn test_repeat_bounds_validity() {
    assert!(RepeatBounds::new(2, None).is_valid());
    assert!(RepeatBounds::new(2, Some(2)).is_valid());
    assert!(!RepeatBounds::new(3, Some(2)).is_valid());
    assert!(RepeatBounds::new(0, Some(2)).allows_more(1));
    assert!(!RepeatBounds::new(0, Some(2)).allows_more(2));
    assert!(RepeatBounds::new(0, None).allows_more(usize::MAX - 1));
}

#[test]
fn test_lookahead_display() {
    assert_eq!(literal("x").present().to_string(), "&'x'");
    assert_eq!(any().absent().to_string(), "!.");
}

#[test]
fn test_char_class_matches() {
    let ident = CharClass::new().range('a', 'z').chars("_");
    assert!(ident.matches('q'));
    assert!(ident.matches('_'));
    assert!(!ident.matches('Q'));

    let not_digit = CharClass::new().range('0', '9').negate();
    assert!(not_digit.matches('x'));
    assert!(!not_digit.matches('5'));
}

#[test]
fn test_char_class_display() {
    assert_eq!(CharClass::new().range('a', 'z').char('_').to_string(), "[a-z_]");
    assert_eq!(CharClass::new().range('0', '9').negate().to_string(), "[^0-9]");
    assert_eq!(CharClass::new().chars("]-").to_string(), "[\\]\\-]");
}

#[test]
fn test_empty_class_matches_nothing() {
    let empty = CharClass::new();
    assert!(!empty.matches('a'));
    assert!(empty.negate().matches('a'));
}

#[test]
fn test_name_comparisons() {
    let name = Name::from("nigel");
    assert_eq!(name, "nigel");
    assert_eq!(name.as_str(), "nigel");
    assert_eq!(format!("{name:?}"), ":nigel");
    assert_eq!(Name::from(String::from("nigel")), name);
}
