//! Mode-stack tokenizer
//!
//! Pulls one token at a time from the input. Every call makes progress, so
//! draining a tokenizer always terminates with a single `EOF` token.

use super::modes::{Mode, ModeStack};
use super::rules::{longest_match, rules_for};
use crate::tokens::{Channel, Token, TokenKind};
use crate::utils::{Position, Span};
use std::iter::FusedIterator;

/// Lazy tokenizer over one query string
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    position: Position,
    modes: ModeStack,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Start a fresh run at offset 0 in `DEFAULT` mode
    pub fn new(input: &'a str) -> Self {
        Self::with_mode_stack(input, ModeStack::new())
    }

    /// Start a fresh run whose mode stack holds at most `max_depth` modes
    pub fn with_max_depth(input: &'a str, max_depth: usize) -> Self {
        Self::with_mode_stack(input, ModeStack::with_max_depth(max_depth))
    }

    fn with_mode_stack(input: &'a str, modes: ModeStack) -> Self {
        Self {
            input,
            position: Position::start(),
            modes,
            finished: false,
        }
    }

    /// Lex the next token
    ///
    /// Input no rule accepts becomes one `UNKNOWN` token covering everything
    /// the mode's rules got through before failing, plus the character they
    /// failed on. Once the input is exhausted every call returns `EOF`.
    pub fn next_token(&mut self) -> Token {
        let rest = &self.input[self.position.offset..];
        if rest.is_empty() {
            self.finished = true;
            return Token::eof(self.position);
        }

        let matched = longest_match(self.modes.current(), rest)
            .and_then(|(rule, len)| rest.get(..len).map(|text| (rule, text)));

        match matched {
            Some((rule, text)) => {
                let token = self.emit(rule.kind, text, rule.channel);
                self.modes.apply_all(rule.actions);
                token
            }
            None => {
                let width = unrecognized_width(self.modes.current(), rest);
                self.emit(TokenKind::Unknown, &rest[..width], Channel::Default)
            }
        }
    }

    fn emit(&mut self, kind: TokenKind, text: &str, channel: Channel) -> Token {
        let start = self.position;
        self.position = start.advance_str(text);
        Token::new(kind, text, Span::new(start, self.position), channel)
    }

    /// Mode the next token will be lexed in
    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    pub fn mode_stack(&self) -> &ModeStack {
        &self.modes
    }

    /// Position of the next unread character
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether `EOF` has been produced
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn input(&self) -> &'a str {
        self.input
    }
}

/// Byte width of the `UNKNOWN` token at the start of `rest`
///
/// Covers the longest prefix any rule of `mode` still accepted, then the
/// offending character; at least one character, never a partial one.
fn unrecognized_width(mode: Mode, rest: &str) -> usize {
    let attempted = rules_for(mode)
        .iter()
        .map(|rule| rule.recognizer.attempt_len(rest))
        .max()
        .unwrap_or(0);

    let mut width = attempted.min(rest.len());
    while !rest.is_char_boundary(width) {
        width += 1;
    }
    width + rest[width..].chars().next().map_or(0, char::len_utf8)
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Lazily tokenize a query; the sequence ends with one `EOF` token
pub fn tokenize(input: &str) -> Tokenizer<'_> {
    Tokenizer::new(input)
}

/// Tokenize a whole query, hidden tokens included
pub fn tokenize_all(input: &str) -> Vec<Token> {
    tokenize(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn significant(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .filter(|t| t.channel == Channel::Default)
            .map(|t| t.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input)
            .filter(|t| t.channel == Channel::Default && !t.is_eof())
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_from_then_where() {
        assert_eq!(
            significant("FROM my_index | WHERE a > 1"),
            [From, UnquotedSource, Pipe, Where, UnquotedIdentifier, Gt, IntegerLiteral, Eof]
        );
        assert_eq!(
            texts("FROM my_index | WHERE a > 1"),
            ["FROM", "my_index", "|", "WHERE", "a", ">", "1"]
        );
    }

    #[test]
    fn test_by_does_not_switch_mode() {
        assert_eq!(
            significant("FROM logs | STATS count() BY field"),
            [From, UnquotedSource, Pipe, Stats, UnquotedIdentifier, Lp, Rp, By, UnquotedIdentifier, Eof]
        );
    }

    #[test]
    fn test_keyword_beats_identifier_of_equal_length() {
        assert_eq!(significant("ROW true"), [Row, True, Eof]);
        assert_eq!(significant("ROW trueish"), [Row, UnquotedIdentifier, Eof]);
        assert_eq!(significant("ROW insert"), [Row, UnquotedIdentifier, Eof]);
        assert_eq!(significant("from LOGS"), [From, UnquotedSource, Eof]);
        assert_eq!(significant("fromage"), [UnknownCmd, Eof]);
    }

    #[test]
    fn test_line_comment_is_hidden_and_excludes_newline() {
        let tokens = tokenize_all("// comment\nROW a = 1");
        assert_eq!(tokens[0].kind, LineComment);
        assert_eq!(tokens[0].text, "// comment");
        assert_eq!(tokens[0].channel, Channel::Hidden);
        assert_eq!(tokens[1].kind, Ws);
        assert_eq!(tokens[1].text, "\n");

        let tokens = tokenize_all("ROW a // trailing\n");
        let comment = tokens.iter().find(|t| t.is_hidden() && t.kind.is_comment()).unwrap();
        assert_eq!(comment.kind, ExprLineComment);
        assert_eq!(comment.text, "// trailing");
    }

    #[test]
    fn test_assign_and_eq_depend_on_context() {
        assert_eq!(significant("ROW a = 1"), [Row, UnquotedIdentifier, Assign, IntegerLiteral, Eof]);
        assert_eq!(significant("WHERE a == 1"), [Where, UnquotedIdentifier, Eq, IntegerLiteral, Eof]);
        assert_eq!(significant("WHERE a =~ \"x\""), [Where, UnquotedIdentifier, Cieq, QuotedString, Eof]);
        assert_eq!(significant("EVAL x = y::long"), [Eval, UnquotedIdentifier, Assign, UnquotedIdentifier, CastOp, UnquotedIdentifier, Eof]);
    }

    #[test]
    fn test_unterminated_string_yields_unknown() {
        let tokens: Vec<_> = tokenize("FROM \"abc").filter(|t| !t.is_hidden()).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, From);
        assert_eq!(tokens[1].kind, Unknown);
        assert_eq!(tokens[1].text, "\"abc");
        assert_eq!(tokens[1].channel, Channel::Default);
        assert!(tokens[2].is_eof());
    }

    #[test]
    fn test_unknown_covers_dangling_content() {
        assert_eq!(texts("ROW `ab"), ["ROW", "`ab"]);
        assert_eq!(significant("ROW `ab"), [Row, Unknown, Eof]);
        assert_eq!(texts("ROW \"abc def"), ["ROW", "\"abc def"]);
        assert_eq!(texts("FROM /* open"), ["FROM", "/* open"]);

        // The character the rules failed on goes with the prefix
        assert_eq!(texts("ROW \"a\\q\" + 1"), ["ROW", "\"a\\q", "\" + 1"]);
        assert_eq!(significant("ROW !x"), [Row, Unknown, Eof]);
        assert_eq!(texts("ROW a !x"), ["ROW", "a", "!x"]);
        assert_eq!(texts("ROW ü b"), ["ROW", "ü", "b"]);
    }

    #[test]
    fn test_total_on_degenerate_input() {
        let empty = tokenize_all("");
        assert_eq!(empty.len(), 1);
        assert!(empty[0].is_eof());
        assert_eq!(empty[0].span, Span::empty(Position::start()));

        let blank = tokenize_all("  \n\t");
        assert_eq!(blank.iter().map(|t| t.kind).collect::<Vec<_>>(), [Ws, Eof]);
        assert!(blank[0].is_hidden());

        for input in ["[[[", "]]]|||", "\u{0}\u{1}\u{7f}", "``````", "/*", "\"\"\"", "ROW ?_ @ $"] {
            let tokens = tokenize_all(input);
            assert!(tokens.last().unwrap().is_eof(), "{:?}", input);
            assert_eq!(tokens.iter().filter(|t| t.is_eof()).count(), 1);
            let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
            assert_eq!(rebuilt, input);
        }
    }

    #[test]
    fn test_multibyte_unknown_covers_whole_character() {
        let tokens = tokenize_all("ROW ü");
        let unknown = &tokens[2];
        assert_eq!(unknown.kind, Unknown);
        assert_eq!(unknown.text, "ü");
        assert_eq!(unknown.column(), 5);
        let eof = tokens.last().unwrap();
        assert_eq!(eof.start_offset(), 6);
        assert_eq!(eof.column(), 6);
    }

    #[test]
    fn test_round_trip_and_positions() {
        let query = "FROM a\n| WHERE b /* note */ AND c";
        let tokens = tokenize_all(query);
        let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(rebuilt, query);

        for pair in tokens.windows(2) {
            assert_eq!(pair[0].end_offset(), pair[1].start_offset());
        }

        let where_token = tokens.iter().find(|t| t.kind == Where).unwrap();
        assert_eq!((where_token.line(), where_token.column()), (2, 3));
        let comment = tokens.iter().find(|t| t.kind == ExprMultilineComment).unwrap();
        assert!(comment.is_hidden());
    }

    #[test]
    fn test_fresh_runs_are_identical() {
        let query = "FROM logs METADATA _id | EVAL x = ?p + 1.5e3 | KEEP a*, `b`";
        assert_eq!(tokenize_all(query), tokenize_all(query));
    }

    #[test]
    fn test_eof_repeats_but_iterator_ends() {
        let mut tokenizer = Tokenizer::new("ROW");
        assert_eq!(tokenizer.next_token().kind, Row);
        assert!(!tokenizer.is_finished());
        assert!(tokenizer.next_token().is_eof());
        assert!(tokenizer.next_token().is_eof());
        assert!(tokenizer.is_finished());
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn test_enrich_modes() {
        let query = "ENRICH policy ON a WITH b = c | LIMIT 1";
        assert_eq!(
            significant(query),
            [Enrich, EnrichPolicyName, On, IdPattern, With, IdPattern, Assign, IdPattern, Pipe, Limit, IntegerLiteral, Eof]
        );

        let mut tokenizer = tokenize("ENRICH p ON a ");
        for _ in 0..5 {
            tokenizer.next_token();
        }
        assert_eq!(tokenizer.mode_stack().modes(), [Mode::Default, Mode::Enrich, Mode::EnrichField]);
    }

    #[test]
    fn test_enrich_setting_brackets() {
        assert_eq!(
            significant("ENRICH [ ccq.mode : any ] _remote:policy"),
            [Enrich, OpeningBracket, Setting, Colon, Setting, ClosingBracket, EnrichPolicyName, Eof]
        );
        assert_eq!(texts("ENRICH [ ccq.mode : any ] _remote:policy")[6], "_remote:policy");
    }

    #[test]
    fn test_lookup_modes() {
        let mut tokenizer = tokenize("LOOKUP idx ON key | KEEP a");
        let kinds: Vec<_> = tokenizer.by_ref().filter(|t| !t.is_hidden()).map(|t| t.kind).collect();
        assert_eq!(kinds, [Lookup, UnquotedSource, On, IdPattern, Pipe, Keep, IdPattern, Eof]);
        assert_eq!(tokenizer.mode(), Mode::Project);
    }

    #[test]
    fn test_metrics_switches_through_closing_metrics() {
        assert_eq!(
            significant("METRICS k8s max(cpu) BY host | LIMIT 5"),
            [Metrics, UnquotedSource, UnquotedIdentifier, Lp, UnquotedIdentifier, Rp, By, UnquotedIdentifier, Pipe, Limit, IntegerLiteral, Eof]
        );

        let mut tokenizer = tokenize("METRICS a,b");
        let kinds: Vec<_> = tokenizer.by_ref().map(|t| t.kind).collect();
        assert_eq!(kinds, [Metrics, MetricsWs, UnquotedSource, Comma, UnquotedSource, Eof]);
        assert_eq!(tokenizer.mode_stack().modes(), [Mode::Default, Mode::ClosingMetrics]);
    }

    #[test]
    fn test_explain_relexes_subquery() {
        assert_eq!(
            significant("EXPLAIN [FROM a | LIMIT 1] | ROW 1"),
            [Explain, OpeningBracket, From, UnquotedSource, Pipe, Limit, IntegerLiteral, ClosingBracket, Pipe, Row, IntegerLiteral, Eof]
        );
    }

    #[test]
    fn test_field_list_commands() {
        assert_eq!(significant("DROP foo*, `bar`"), [Drop, IdPattern, Comma, IdPattern, Eof]);
        assert_eq!(texts("DROP foo*, `bar`"), ["DROP", "foo*", ",", "`bar`"]);
        assert_eq!(significant("RENAME a AS b"), [Rename, IdPattern, As, IdPattern, Eof]);
        assert_eq!(significant("MV_EXPAND a.b"), [MvExpand, UnquotedIdentifier, Dot, UnquotedIdentifier, Eof]);
        assert_eq!(significant("SHOW info"), [Show, Info, Eof]);
        assert_eq!(significant("META functions"), [Meta, Functions, Eof]);
    }

    #[test]
    fn test_nested_comment_and_numbers() {
        let tokens = tokenize_all("ROW /* a /* b */ c */ 1");
        assert_eq!(tokens[2].kind, ExprMultilineComment);
        assert_eq!(tokens[2].text, "/* a /* b */ c */");

        assert_eq!(
            texts("ROW 1.5e3, .5, 2"),
            ["ROW", "1.5e3", ",", ".5", ",", "2"]
        );
        assert_eq!(
            significant("ROW 1.5e3, .5, 2"),
            [Row, DecimalLiteral, Comma, DecimalLiteral, Comma, IntegerLiteral, Eof]
        );
    }

    #[test]
    fn test_unclosed_inner_comment_is_plain_text() {
        let tokens = tokenize_all("ROW /* /* /* x */ y */");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[2].kind, ExprMultilineComment);
        assert_eq!(tokens[2].text, "/* /* /* x */ y */");

        let tokens = tokenize_all("ROW /* a /* b */ c */ d */");
        assert_eq!(tokens[2].text, "/* a /* b */ c */");
        assert_eq!(significant("ROW /* a /* b */ c */ d */"), [Row, UnquotedIdentifier, Asterisk, Slash, Eof]);

        let tokens = tokenize_all("ROW /* a /* b */");
        assert_eq!(tokens[2].text, "/* a /* b */");
        assert_eq!(tokens[2].text.len(), 12);
    }

    #[test]
    fn test_line_comment_in_every_mode() {
        let cases = [
            ("", Mode::Default, LineComment),
            ("EXPLAIN ", Mode::Explain, ExplainLineComment),
            ("ROW a ", Mode::Expression, ExprLineComment),
            ("FROM a ", Mode::From, FromLineComment),
            ("KEEP a ", Mode::Project, ProjectLineComment),
            ("RENAME a ", Mode::Rename, RenameLineComment),
            ("ENRICH p ", Mode::Enrich, EnrichLineComment),
            ("ENRICH p ON a ", Mode::EnrichField, EnrichFieldLineComment),
            ("LOOKUP i ", Mode::Lookup, LookupLineComment),
            ("LOOKUP i ON k ", Mode::LookupField, LookupFieldLineComment),
            ("MV_EXPAND a ", Mode::MvExpand, MvExpandLineComment),
            ("SHOW ", Mode::Show, ShowLineComment),
            ("META ", Mode::Meta, MetaLineComment),
            ("ENRICH [ ", Mode::Setting, SettingLineComment),
            ("METRICS ", Mode::Metrics, MetricsLineComment),
            ("METRICS a ", Mode::ClosingMetrics, ClosingMetricsLineComment),
        ];
        assert_eq!(cases.len(), Mode::ALL.len());

        for (prefix, mode, kind) in cases {
            let query = format!("{}// comment\n", prefix);
            let mut tokenizer = tokenize(&query);
            while tokenizer.position().offset < prefix.len() {
                tokenizer.next_token();
            }
            assert_eq!(tokenizer.mode(), mode, "{:?}", prefix);
            let stack_before = tokenizer.mode_stack().modes().to_vec();

            let comment = tokenizer.next_token();
            assert_eq!(comment.kind, kind, "{:?}", prefix);
            assert_eq!(comment.channel, Channel::Hidden);
            assert_eq!(comment.text, "// comment");
            assert_eq!(tokenizer.mode_stack().modes(), stack_before.as_slice());

            assert_eq!(tokenizer.next_token().text, "\n");
            assert!(tokenizer.next_token().is_eof());
        }
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            significant("ROW ?, ?name, ?1"),
            [Row, Param, Comma, NamedOrPositionalParam, Comma, NamedOrPositionalParam, Eof]
        );
    }

    #[test]
    fn test_closing_bracket_at_root_stays_total() {
        let mut tokenizer = tokenize("ROW ] FROM a");
        let kinds: Vec<_> = tokenizer.by_ref().filter(|t| !t.is_hidden()).map(|t| t.kind).collect();
        assert_eq!(kinds, [Row, ClosingBracket, From, UnquotedSource, Eof]);
        assert_eq!(tokenizer.mode(), Mode::From);
    }

    #[test]
    fn test_depth_limit_drops_pushes() {
        let mut tokenizer = Tokenizer::with_max_depth("ROW [[[[ 1", 3);
        let tokens: Vec<_> = tokenizer.by_ref().collect();
        assert!(tokens.last().unwrap().is_eof());
        assert_eq!(tokenizer.mode_stack().depth(), 3);
        assert!(tokenizer.mode_stack().dropped_pushes() > 0);
    }

    #[test]
    fn test_pipe_in_default_mode_is_unknown_command() {
        assert_eq!(significant("|"), [UnknownCmd, Eof]);
        assert_eq!(significant("a/b"), [UnquotedSource, Eof]);
    }
}
