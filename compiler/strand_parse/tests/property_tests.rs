//! Property-based tests for the parser engine.
//!
//! Generates inputs for small fixed grammars and verifies:
//! 1. Round trip: the slices of a successful result reassemble the consumed input
//! 2. Idempotence: parsing twice with one grammar yields identical results
//! 3. Memoisation never changes the outcome

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use strand_parse::{
    any, choice, class, grammar, literal, parse, parse_with, rule, rule_ref, sequence, CharClass,
    Grammar, ParseOptions,
};

/// A comma-separated list of words or parenthesised lists.
fn list_grammar() -> Grammar {
    let word = class(CharClass::new().range('a', 'z')).repeat(1, None);
    grammar(
        [
            rule(
                "list",
                sequence([
                    rule_ref("item").capture("item"),
                    sequence([literal(","), rule_ref("item").capture("item")]).repeat(0, None),
                ]),
            ),
            rule(
                "item",
                choice([
                    sequence([literal("("), rule_ref("list"), literal(")")]),
                    word.capture("word"),
                ]),
            ),
        ],
        "list",
    )
    .expect("grammar builds")
}

/// Anything up to a `;`, then the rest.
fn statement_grammar() -> Grammar {
    Grammar::single(sequence([
        literal(";").absent().then(any()).repeat(0, None).capture("body"),
        literal(";").maybe(),
        any().repeat(0, None).capture("rest"),
    ]))
    .expect("grammar builds")
}

// -- Input Strategies --

/// A well-formed list, nested at most four levels deep.
fn list_strategy() -> impl Strategy<Value = String> {
    let word = "[a-z]{1,6}";
    word.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|items| format!("({})", items.join(",")))
    })
    .prop_flat_map(|first| {
        prop::collection::vec("[a-z]{1,4}", 0..4).prop_map(move |rest| {
            let mut out = first.clone();
            for r in rest {
                out.push(',');
                out.push_str(&r);
            }
            out
        })
    })
}

/// Mostly-list-like noise, valid or not.
fn noise_strategy() -> impl Strategy<Value = String> {
    "[a-c(),]{0,24}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn valid_lists_round_trip(input in list_strategy()) {
        let g = list_grammar();
        let parsed = parse(&g, &input).expect("well-formed list parses");
        prop_assert_eq!(parsed.end, input.len());
        prop_assert_eq!(parsed.value.flatten(), input.as_str());
    }

    #[test]
    fn any_input_round_trips_or_fails(input in noise_strategy()) {
        let g = list_grammar();
        match parse_with(&g, &input, &ParseOptions::default().partial()) {
            Ok(parsed) => prop_assert_eq!(parsed.value.flatten(), &input[..parsed.end]),
            Err(err) => prop_assert!(err.position <= input.len()),
        }
    }

    #[test]
    fn statements_round_trip(input in "\\PC{0,32}") {
        let g = statement_grammar();
        let parsed = parse(&g, &input).expect("statement grammar accepts everything");
        prop_assert_eq!(parsed.value.flatten(), input.as_str());
    }

    #[test]
    fn parsing_is_idempotent(input in noise_strategy()) {
        let g = list_grammar();
        prop_assert_eq!(parse(&g, &input), parse(&g, &input));
    }

    #[test]
    fn memoisation_preserves_outcome(input in noise_strategy()) {
        let g = list_grammar();
        let memo = ParseOptions::default().memoized();
        prop_assert_eq!(parse_with(&g, &input, &memo), parse(&g, &input));
    }
}
