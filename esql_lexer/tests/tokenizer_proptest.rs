//! Property-based tests for the tokenizer
//!
//! Tokenizing is total: whatever the input, the tokens tile it exactly and
//! end with a single EOF, and repeated runs agree.

use esql_lexer::{tokenize_all, Token};
use proptest::prelude::*;

fn assert_tiles_input(input: &str, tokens: &[Token]) {
    let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(rebuilt, input);

    let eof_count = tokens.iter().filter(|t| t.is_eof()).count();
    assert_eq!(eof_count, 1);
    let last = tokens.last().expect("at least the EOF token");
    assert!(last.is_eof());
    assert_eq!(last.start_offset(), input.len());

    assert_eq!(tokens[0].start_offset(), 0);
    for pair in tokens.windows(2) {
        assert_eq!(pair[0].end_offset(), pair[1].start_offset());
    }
    for token in &tokens[..tokens.len() - 1] {
        assert!(!token.text.is_empty(), "empty token {:?}", token);
    }
}

/// Pieces of queries, well-formed and not, joined by random separators
fn query_strategy() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("FROM".to_string()),
        Just("ROW".to_string()),
        Just("EVAL".to_string()),
        Just("WHERE".to_string()),
        Just("STATS".to_string()),
        Just("KEEP".to_string()),
        Just("DROP".to_string()),
        Just("RENAME".to_string()),
        Just("ENRICH".to_string()),
        Just("LOOKUP".to_string()),
        Just("METRICS".to_string()),
        Just("EXPLAIN".to_string()),
        Just("MV_EXPAND".to_string()),
        Just("SHOW info".to_string()),
        Just("META functions".to_string()),
        Just("METADATA".to_string()),
        Just("ON".to_string()),
        Just("WITH".to_string()),
        Just("BY".to_string()),
        Just("AS".to_string()),
        Just("|".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("/*".to_string()),
        Just("*/".to_string()),
        Just("//".to_string()),
        Just("\"".to_string()),
        Just("\"\"\"".to_string()),
        Just("`".to_string()),
        Just("?".to_string()),
        "[=<>!:,.+*/%()-]{1,3}",
        "[a-z_@][a-z0-9_*]{0,8}",
        "[0-9]{1,4}(\\.[0-9]{0,3})?([eE][+-]?[0-9]{0,2})?",
        "\"[a-z \\\\]{0,6}\"?",
        "`[a-z`]{0,5}`?",
        "[a-z]{1,5}(:[a-z]{1,5})?",
        "\\PC",
    ];
    let separator = prop_oneof![
        Just(" "),
        Just(""),
        Just("\n"),
        Just("\t"),
        Just(" | "),
        Just(", "),
    ];
    prop::collection::vec((fragment, separator), 0..24).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(fragment, separator)| fragment + separator)
            .collect()
    })
}

proptest! {
    #[test]
    fn test_arbitrary_strings_are_tiled(input in any::<String>()) {
        let tokens = tokenize_all(&input);
        assert_tiles_input(&input, &tokens);
    }

    #[test]
    fn test_query_fragments_are_tiled(input in query_strategy()) {
        let tokens = tokenize_all(&input);
        assert_tiles_input(&input, &tokens);
    }

    #[test]
    fn test_runs_are_deterministic(input in query_strategy()) {
        prop_assert_eq!(tokenize_all(&input), tokenize_all(&input));
    }

    #[test]
    fn test_arbitrary_runs_are_deterministic(input in any::<String>()) {
        prop_assert_eq!(tokenize_all(&input), tokenize_all(&input));
    }
}
