//! Pattern matchers behind the lexer rules
//!
//! Every recognizer answers how many bytes at the start of the remaining
//! input the pattern matches (0 = no match), and, for error recovery, how
//! far it got before the input stopped fitting. Character classes are
//! ASCII; negated classes accept any non-ASCII character, so scanning bytes
//! never stops inside a multi-byte character.

/// Pattern a lexer rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognizer {
    /// Exact punctuation or operator text
    Literal(&'static str),
    /// Keyword compared ASCII case-insensitively
    Keyword(&'static str),
    /// `//` to end of line, newline excluded
    LineComment,
    /// `/* ... */`, nested
    MultilineComment,
    /// `[ \t\r\n]+`
    Whitespace,
    /// Any run of characters other than whitespace, brackets, or `/`
    UnknownCommand,
    /// Index pattern such as `logs-*` or `cluster:idx/2024`
    UnquotedSource,
    /// `"..."` with escapes, or `"""..."""` on a single line
    QuotedString,
    IntegerLiteral,
    DecimalLiteral,
    /// `?name` or `?1`
    NamedOrPositionalParam,
    UnquotedIdentifier,
    /// Backquoted identifier, doubled backquote escapes
    QuotedIdentifier,
    /// Field pattern with `*` wildcards and quoted parts
    IdPattern,
    /// Policy name with optional `prefix:`
    EnrichPolicyName,
    /// Setting name or value inside `[...]`
    Setting,
}

impl Recognizer {
    /// Byte length of the longest prefix of `input` this pattern accepts
    pub fn match_len(&self, input: &str) -> usize {
        let bytes = input.as_bytes();
        match *self {
            Recognizer::Literal(text) => {
                if input.starts_with(text) {
                    text.len()
                } else {
                    0
                }
            }
            Recognizer::Keyword(word) => keyword(bytes, word),
            Recognizer::LineComment => line_comment(bytes),
            Recognizer::MultilineComment => multiline_comment(bytes),
            Recognizer::Whitespace => run(bytes, 0, is_whitespace),
            Recognizer::UnknownCommand => run(bytes, 0, |b| {
                !matches!(b, b' ' | b'\r' | b'\n' | b'\t' | b'[' | b']' | b'/')
            }),
            Recognizer::UnquotedSource => unquoted_source(bytes),
            Recognizer::QuotedString => quoted_string(bytes),
            Recognizer::IntegerLiteral => run(bytes, 0, is_digit),
            Recognizer::DecimalLiteral => decimal_literal(bytes),
            Recognizer::NamedOrPositionalParam => named_or_positional_param(bytes),
            Recognizer::UnquotedIdentifier => unquoted_identifier(bytes),
            Recognizer::QuotedIdentifier => quoted_identifier(bytes),
            Recognizer::IdPattern => id_pattern(bytes),
            Recognizer::EnrichPolicyName => enrich_policy_name(bytes),
            Recognizer::Setting => run(bytes, 0, |b| {
                matches!(b, b'@' | b'.' | b'_') || is_letter(b) || is_digit(b)
            }),
        }
    }

    /// Byte length of the longest prefix of `input` that some accepted
    /// text still starts with
    ///
    /// This is where the pattern gives up: a string opened but never closed
    /// reaches the end of the input, a keyword stops at the first letter
    /// that differs. Never shorter than `match_len`.
    pub fn attempt_len(&self, input: &str) -> usize {
        let bytes = input.as_bytes();
        let attempted = match *self {
            Recognizer::Literal(text) => common_prefix(bytes, text.as_bytes(), |a, b| a == b),
            Recognizer::Keyword(word) => {
                common_prefix(bytes, word.as_bytes(), |a, b| a.eq_ignore_ascii_case(b))
            }
            Recognizer::LineComment | Recognizer::MultilineComment => comment_attempt(bytes, *self),
            Recognizer::UnquotedSource => {
                let len = unquoted_source(bytes);
                // A trailing `/` could still continue the source
                len + usize::from(bytes.get(len) == Some(&b'/'))
            }
            Recognizer::QuotedString => {
                simple_quoted_string_attempt(bytes).max(triple_quoted_string_attempt(bytes))
            }
            Recognizer::DecimalLiteral => decimal_attempt(bytes),
            Recognizer::NamedOrPositionalParam => usize::from(bytes.first() == Some(&b'?')),
            Recognizer::UnquotedIdentifier => usize::from(matches!(bytes.first(), Some(b'_' | b'@'))),
            Recognizer::QuotedIdentifier => quoted_identifier_attempt(bytes),
            Recognizer::IdPattern => id_pattern_attempt(bytes),
            Recognizer::EnrichPolicyName => {
                let head = run(bytes, 0, is_policy_char);
                head + usize::from(head > 0 && bytes.get(head) == Some(&b':'))
            }
            Recognizer::Whitespace
            | Recognizer::UnknownCommand
            | Recognizer::IntegerLiteral
            | Recognizer::Setting => 0,
        };
        attempted.max(self.match_len(input))
    }
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

fn is_letter(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_id_body(b: u8) -> bool {
    is_letter(b) || is_digit(b) || b == b'_'
}

fn is_id_pattern_body(b: u8) -> bool {
    is_id_body(b) || b == b'*'
}

fn is_source_char(b: u8) -> bool {
    !matches!(
        b,
        b':' | b'"' | b'=' | b'|' | b',' | b'[' | b']' | b'/' | b' ' | b'\t' | b'\r' | b'\n'
    )
}

fn is_policy_char(b: u8) -> bool {
    !matches!(
        b,
        b'\\' | b'/' | b'?' | b'"' | b'<' | b'>' | b'|' | b' ' | b',' | b'#' | b'\t' | b'\r'
            | b'\n' | b':'
    )
}

/// Count bytes from `start` accepted by `pred`
fn run(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    bytes
        .get(start..)
        .map(|rest| rest.iter().take_while(|&&b| pred(b)).count())
        .unwrap_or(0)
}

// ============================================================================
// MATCHERS
// ============================================================================

fn keyword(bytes: &[u8], word: &str) -> usize {
    let word = word.as_bytes();
    match bytes.get(..word.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(word) => word.len(),
        _ => 0,
    }
}

fn line_comment(bytes: &[u8]) -> usize {
    if !bytes.starts_with(b"//") {
        return 0;
    }
    2 + run(bytes, 2, |b| b != b'\r' && b != b'\n')
}

fn multiline_comment(bytes: &[u8]) -> usize {
    if !bytes.starts_with(b"/*") {
        return 0;
    }
    comment_body_ends(bytes).get(2).copied().flatten().unwrap_or(0)
}

/// For every offset `i`, where a comment body starting at `i` ends
///
/// The body prefers closing at the first `*/`, then a nested comment
/// followed by the rest of the body, then any single byte. Results only
/// depend on the offset, so they are filled right to left.
fn comment_body_ends(bytes: &[u8]) -> Vec<Option<usize>> {
    let mut ends = vec![None; bytes.len() + 1];
    for i in (0..bytes.len()).rev() {
        let rest = &bytes[i..];
        ends[i] = if rest.starts_with(b"*/") {
            Some(i + 2)
        } else {
            let nested = if rest.starts_with(b"/*") {
                ends[i + 2].and_then(|inner| ends[inner])
            } else {
                None
            };
            nested.or(ends[i + 1])
        };
    }
    ends
}

fn unquoted_source(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if is_source_char(b) {
            i += 1;
        } else if b == b'/' {
            // A single `/` is part of the source unless it starts a comment
            match bytes.get(i + 1) {
                Some(&next) if next != b'*' && next != b'/' => i += 2,
                _ => break,
            }
        } else {
            break;
        }
    }
    i
}

fn quoted_string(bytes: &[u8]) -> usize {
    simple_quoted_string(bytes).max(triple_quoted_string(bytes))
}

fn simple_quoted_string(bytes: &[u8]) -> usize {
    if bytes.first() != Some(&b'"') {
        return 0;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return i + 1,
            b'\\' => match bytes.get(i + 1) {
                Some(b't' | b'n' | b'r' | b'T' | b'N' | b'R' | b'"' | b'\\') => i += 2,
                _ => return 0,
            },
            b'\r' | b'\n' => return 0,
            _ => i += 1,
        }
    }
    0
}

fn triple_quoted_string(bytes: &[u8]) -> usize {
    if !bytes.starts_with(b"\"\"\"") {
        return 0;
    }
    let mut i = 3;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"\"\"\"") {
            // Up to two extra quotes belong to the literal
            let end = i + 3;
            return end + run(bytes, end, |b| b == b'"').min(2);
        }
        if matches!(bytes[i], b'\r' | b'\n') {
            return 0;
        }
        i += 1;
    }
    0
}

fn exponent(bytes: &[u8], start: usize) -> usize {
    match bytes.get(start) {
        Some(b'e' | b'E') => {}
        _ => return 0,
    }
    let sign = usize::from(matches!(bytes.get(start + 1), Some(b'+' | b'-')));
    let digits = run(bytes, start + 1 + sign, is_digit);
    if digits == 0 {
        0
    } else {
        1 + sign + digits
    }
}

fn decimal_literal(bytes: &[u8]) -> usize {
    let int_digits = run(bytes, 0, is_digit);
    let mut best = 0;

    if int_digits > 0 {
        // DIGIT+ EXPONENT
        let exp = exponent(bytes, int_digits);
        if exp > 0 {
            best = int_digits + exp;
        }
        // DIGIT+ '.' DIGIT* EXPONENT?
        if bytes.get(int_digits) == Some(&b'.') {
            let fraction_end = int_digits + 1 + run(bytes, int_digits + 1, is_digit);
            best = best.max(fraction_end + exponent(bytes, fraction_end));
        }
    } else if bytes.first() == Some(&b'.') {
        // '.' DIGIT+ EXPONENT?
        let fraction = run(bytes, 1, is_digit);
        if fraction > 0 {
            let fraction_end = 1 + fraction;
            best = fraction_end + exponent(bytes, fraction_end);
        }
    }
    best
}

fn named_or_positional_param(bytes: &[u8]) -> usize {
    if bytes.first() != Some(&b'?') {
        return 0;
    }
    match bytes.get(1) {
        Some(&b) if is_letter(b) => 2 + run(bytes, 2, is_id_body),
        Some(&b) if is_digit(b) => 1 + run(bytes, 1, is_digit),
        _ => 0,
    }
}

fn unquoted_identifier(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(&b) if is_letter(b) => 1 + run(bytes, 1, is_id_body),
        Some(b'_' | b'@') => {
            let body = run(bytes, 1, is_id_body);
            if body == 0 {
                0
            } else {
                1 + body
            }
        }
        _ => 0,
    }
}

fn quoted_identifier(bytes: &[u8]) -> usize {
    if bytes.first() != Some(&b'`') {
        return 0;
    }
    let mut i = 1;
    let mut blocks = 0;
    let mut accepted = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            if blocks > 0 {
                accepted = i + 1;
            }
            if bytes.get(i + 1) == Some(&b'`') {
                // Escaped backquote; keep scanning for a longer match
                blocks += 1;
                i += 2;
            } else {
                break;
            }
        } else {
            blocks += 1;
            i += 1;
        }
    }
    accepted
}

fn unquoted_id_pattern(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(&b) if is_letter(b) || b == b'*' => 1 + run(bytes, 1, is_id_pattern_body),
        Some(b'_' | b'@') => {
            let body = run(bytes, 1, is_id_pattern_body);
            if body == 0 {
                0
            } else {
                1 + body
            }
        }
        _ => 0,
    }
}

fn id_pattern(bytes: &[u8]) -> usize {
    let mut i = 0;
    loop {
        let rest = &bytes[i..];
        let piece = unquoted_id_pattern(rest).max(quoted_identifier(rest));
        if piece == 0 {
            return i;
        }
        i += piece;
    }
}

fn enrich_policy_name(bytes: &[u8]) -> usize {
    let head = run(bytes, 0, is_policy_char);
    if head == 0 {
        return 0;
    }
    if bytes.get(head) == Some(&b':') {
        let tail = run(bytes, head + 1, is_policy_char);
        if tail > 0 {
            return head + 1 + tail;
        }
    }
    head
}

// ============================================================================
// ERROR RECOVERY
// ============================================================================

fn common_prefix(bytes: &[u8], expected: &[u8], same: impl Fn(&u8, &u8) -> bool) -> usize {
    bytes
        .iter()
        .zip(expected)
        .take_while(|&(a, b)| same(a, b))
        .count()
}

fn comment_attempt(bytes: &[u8], recognizer: Recognizer) -> usize {
    match (bytes, recognizer) {
        // An open block comment can swallow anything that follows
        ([b'/', b'*', ..], Recognizer::MultilineComment) => bytes.len(),
        ([b'/', ..], _) => 1,
        _ => 0,
    }
}

fn simple_quoted_string_attempt(bytes: &[u8]) -> usize {
    if bytes.first() != Some(&b'"') {
        return 0;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return i + 1,
            b'\\' => match bytes.get(i + 1) {
                Some(b't' | b'n' | b'r' | b'T' | b'N' | b'R' | b'"' | b'\\') => i += 2,
                Some(_) => return i + 1,
                None => return bytes.len(),
            },
            b'\r' | b'\n' => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn triple_quoted_string_attempt(bytes: &[u8]) -> usize {
    let quotes = run(bytes, 0, |b| b == b'"').min(3);
    if quotes < 3 {
        return quotes;
    }
    3 + run(bytes, 3, |b| b != b'\r' && b != b'\n')
}

fn decimal_attempt(bytes: &[u8]) -> usize {
    let int_digits = run(bytes, 0, is_digit);
    let mantissa_end = if int_digits > 0 {
        if bytes.get(int_digits) == Some(&b'.') {
            int_digits + 1 + run(bytes, int_digits + 1, is_digit)
        } else {
            int_digits
        }
    } else if bytes.first() == Some(&b'.') {
        let fraction = run(bytes, 1, is_digit);
        if fraction == 0 {
            return 1;
        }
        1 + fraction
    } else {
        return 0;
    };

    // A dangling exponent marker, with or without its sign
    match bytes.get(mantissa_end) {
        Some(b'e' | b'E') => {
            let sign = usize::from(matches!(bytes.get(mantissa_end + 1), Some(b'+' | b'-')));
            mantissa_end + 1 + sign + run(bytes, mantissa_end + 1 + sign, is_digit)
        }
        _ => mantissa_end,
    }
}

fn quoted_identifier_attempt(bytes: &[u8]) -> usize {
    if bytes.first() != Some(&b'`') {
        return 0;
    }
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
        } else if bytes.get(i + 1) == Some(&b'`') {
            i += 2;
        } else {
            // Closes the identifier, or after "``" could only continue as an
            // escaped backquote
            return i + 1;
        }
    }
    bytes.len()
}

fn id_pattern_attempt(bytes: &[u8]) -> usize {
    let matched = id_pattern(bytes);
    let rest = &bytes[matched..];
    let stuck = match rest.first() {
        Some(b'_' | b'@') => 1,
        Some(b'`') => quoted_identifier_attempt(rest),
        _ => 0,
    };
    matched + stuck
}

#[cfg(test)]
mod tests {
    use super::Recognizer::*;
    use super::*;

    fn len(r: Recognizer, input: &str) -> usize {
        r.match_len(input)
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(len(Keyword("from"), "FrOm logs"), 4);
        assert_eq!(len(Keyword("from"), "fro"), 0);
        assert_eq!(len(Keyword("by"), "bé"), 0);
    }

    #[test]
    fn test_comments() {
        assert_eq!(len(LineComment, "// note\nrest"), 7);
        assert_eq!(len(LineComment, "/ not"), 0);
        assert_eq!(len(MultilineComment, "/* a */ b"), 7);
        assert_eq!(len(MultilineComment, "/* a /* b */ c */ d"), 17);
        assert_eq!(len(MultilineComment, "/* a /* b */"), 12);
        assert_eq!(len(MultilineComment, "/* /* /* x */ y */"), 18);
        assert_eq!(len(MultilineComment, "/* a /* b */ c */ d */"), 17);
        assert_eq!(len(MultilineComment, "/**/"), 4);
        assert_eq!(len(MultilineComment, "/* never closed"), 0);
        assert_eq!(len(MultilineComment, "/*/"), 0);
    }

    #[test]
    fn test_unquoted_source() {
        assert_eq!(len(UnquotedSource, "logs-* | x"), 6);
        assert_eq!(len(UnquotedSource, "<logs-{now/d}>,"), 14);
        assert_eq!(len(UnquotedSource, "a//b"), 1);
        assert_eq!(len(UnquotedSource, "a/*b"), 1);
        assert_eq!(len(UnquotedSource, "idx:cluster"), 3);
        assert_eq!(len(UnquotedSource, "índice"), "índice".len());
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(len(QuotedString, r#""a\"b" rest"#), 6);
        assert_eq!(len(QuotedString, r#""bad \x""#), 0);
        assert_eq!(len(QuotedString, "\"abc"), 0);
        assert_eq!(len(QuotedString, "\"a\nb\""), 0);
        assert_eq!(len(QuotedString, r#""""a "b" c""" x"#), 13);
        assert_eq!(len(QuotedString, r#""""a""""""#), 9);
        assert_eq!(len(QuotedString, r#""""open"#), 2);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(len(IntegerLiteral, "123abc"), 3);
        assert_eq!(len(DecimalLiteral, "1.5"), 3);
        assert_eq!(len(DecimalLiteral, "1."), 2);
        assert_eq!(len(DecimalLiteral, ".5e-3"), 5);
        assert_eq!(len(DecimalLiteral, "2E10"), 4);
        assert_eq!(len(DecimalLiteral, "1e"), 0);
        assert_eq!(len(DecimalLiteral, "12"), 0);
        assert_eq!(len(DecimalLiteral, "."), 0);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(len(UnquotedIdentifier, "field_1.x"), 7);
        assert_eq!(len(UnquotedIdentifier, "@timestamp"), 10);
        assert_eq!(len(UnquotedIdentifier, "_"), 0);
        assert_eq!(len(UnquotedIdentifier, "1abc"), 0);
        assert_eq!(len(QuotedIdentifier, "`a b` x"), 5);
        assert_eq!(len(QuotedIdentifier, "`a``b` x"), 6);
        assert_eq!(len(QuotedIdentifier, "``"), 0);
        assert_eq!(len(QuotedIdentifier, "`a``"), 3);
        assert_eq!(len(QuotedIdentifier, "````"), 4);
    }

    #[test]
    fn test_params() {
        assert_eq!(len(NamedOrPositionalParam, "?name1 "), 6);
        assert_eq!(len(NamedOrPositionalParam, "?12"), 3);
        assert_eq!(len(NamedOrPositionalParam, "?"), 0);
        assert_eq!(len(NamedOrPositionalParam, "?_x"), 0);
    }

    #[test]
    fn test_id_pattern() {
        assert_eq!(len(IdPattern, "host.*"), 4);
        assert_eq!(len(IdPattern, "*name*, x"), 6);
        assert_eq!(len(IdPattern, "a`b c`d"), 7);
        assert_eq!(len(IdPattern, "a@b"), 3);
        assert_eq!(len(IdPattern, "9lives"), 0);
    }

    #[test]
    fn test_enrich_policy_name_and_setting() {
        assert_eq!(len(EnrichPolicyName, "my-policy on"), 9);
        assert_eq!(len(EnrichPolicyName, "remote:policy"), 13);
        assert_eq!(len(EnrichPolicyName, "remote: policy"), 6);
        assert_eq!(len(EnrichPolicyName, "|"), 0);
        assert_eq!(len(Setting, "ccq.mode:any"), 8);
    }

    #[test]
    fn test_attempt_stops_where_input_stops_fitting() {
        assert_eq!(QuotedString.attempt_len("\"abc"), 4);
        assert_eq!(QuotedString.attempt_len("\"ab\ncd\""), 3);
        assert_eq!(QuotedString.attempt_len("\"a\\q\""), 3);
        assert_eq!(QuotedString.attempt_len("\"\"\"open"), 7);
        assert_eq!(QuotedIdentifier.attempt_len("`ab"), 3);
        assert_eq!(QuotedIdentifier.attempt_len("``x"), 2);
        assert_eq!(MultilineComment.attempt_len("/* open"), 7);
        assert_eq!(LineComment.attempt_len("/* open"), 1);
        assert_eq!(Literal("!=").attempt_len("!x"), 1);
        assert_eq!(Keyword("metadata").attempt_len("META!"), 4);
        assert_eq!(DecimalLiteral.attempt_len("1e+"), 3);
        assert_eq!(IdPattern.attempt_len("a`b"), 3);
        assert_eq!(Whitespace.attempt_len("x"), 0);
    }

    #[test]
    fn test_attempt_is_never_shorter_than_match() {
        let inputs = ["\"a\" b", "`a``b` c", "/* a */ b", "logs-* x", "1.5e3", "?p1"];
        for recognizer in [QuotedString, QuotedIdentifier, MultilineComment, UnquotedSource, DecimalLiteral, NamedOrPositionalParam] {
            for input in inputs {
                assert!(recognizer.attempt_len(input) >= recognizer.match_len(input));
            }
        }
    }
}
