//! Per-mode rule tables
//!
//! Rules are listed in grammar declaration order. The tokenizer picks the
//! longest match and, on equal length, the rule listed first, so keywords
//! sit ahead of the identifier and source rules that would also accept them.

use super::modes::{Mode, ModeAction};
use super::recognizers::Recognizer::{self, *};
use crate::tokens::{Channel, TokenKind};

/// One lexer rule: what it matches, what it emits, how it moves the stack
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Grammar rule name, e.g. `FROM_PIPE`
    pub name: &'static str,
    pub recognizer: Recognizer,
    /// Kind of the emitted token (after type remapping)
    pub kind: TokenKind,
    pub channel: Channel,
    /// Stack operations applied in order after the token is emitted
    pub actions: &'static [ModeAction],
}

impl Rule {
    const fn new(name: &'static str, recognizer: Recognizer, kind: TokenKind) -> Self {
        Self {
            name,
            recognizer,
            kind,
            channel: Channel::Default,
            actions: &[],
        }
    }

    const fn hidden(name: &'static str, recognizer: Recognizer, kind: TokenKind) -> Self {
        Self {
            channel: Channel::Hidden,
            ..Self::new(name, recognizer, kind)
        }
    }

    const fn line_comment(name: &'static str, kind: TokenKind) -> Self {
        Self::hidden(name, LineComment, kind)
    }

    const fn multiline_comment(name: &'static str, kind: TokenKind) -> Self {
        Self::hidden(name, MultilineComment, kind)
    }

    const fn whitespace(name: &'static str, kind: TokenKind) -> Self {
        Self::hidden(name, Whitespace, kind)
    }

    const fn then(self, actions: &'static [ModeAction]) -> Self {
        Self { actions, ..self }
    }
}

const POP: &[ModeAction] = &[ModeAction::Pop];
const POP_TWICE: &[ModeAction] = &[ModeAction::Pop, ModeAction::Pop];
const TO_EXPRESSION: &[ModeAction] = &[ModeAction::Push(Mode::Expression)];
const TO_PROJECT: &[ModeAction] = &[ModeAction::Push(Mode::Project)];
const TO_CLOSING_METRICS: &[ModeAction] = &[ModeAction::Switch(Mode::ClosingMetrics)];
const BACK_TO_METRICS: &[ModeAction] = &[ModeAction::Switch(Mode::Metrics)];
const METRICS_TO_EXPRESSION: &[ModeAction] = &[ModeAction::Switch(Mode::Expression)];

// ============================================================================
// COMMAND POSITION
// ============================================================================

pub static DEFAULT_RULES: &[Rule] = &[
    Rule::new("DISSECT", Keyword("dissect"), TokenKind::Dissect).then(TO_EXPRESSION),
    Rule::new("DROP", Keyword("drop"), TokenKind::Drop).then(TO_PROJECT),
    Rule::new("ENRICH", Keyword("enrich"), TokenKind::Enrich)
        .then(&[ModeAction::Push(Mode::Enrich)]),
    Rule::new("EVAL", Keyword("eval"), TokenKind::Eval).then(TO_EXPRESSION),
    Rule::new("EXPLAIN", Keyword("explain"), TokenKind::Explain)
        .then(&[ModeAction::Push(Mode::Explain)]),
    Rule::new("FROM", Keyword("from"), TokenKind::From).then(&[ModeAction::Push(Mode::From)]),
    Rule::new("GROK", Keyword("grok"), TokenKind::Grok).then(TO_EXPRESSION),
    Rule::new("INLINESTATS", Keyword("inlinestats"), TokenKind::InlineStats)
        .then(TO_EXPRESSION),
    Rule::new("KEEP", Keyword("keep"), TokenKind::Keep).then(TO_PROJECT),
    Rule::new("LIMIT", Keyword("limit"), TokenKind::Limit).then(TO_EXPRESSION),
    Rule::new("LOOKUP", Keyword("lookup"), TokenKind::Lookup)
        .then(&[ModeAction::Push(Mode::Lookup)]),
    Rule::new("META", Keyword("meta"), TokenKind::Meta).then(&[ModeAction::Push(Mode::Meta)]),
    Rule::new("METRICS", Keyword("metrics"), TokenKind::Metrics)
        .then(&[ModeAction::Push(Mode::Metrics)]),
    Rule::new("MV_EXPAND", Keyword("mv_expand"), TokenKind::MvExpand)
        .then(&[ModeAction::Push(Mode::MvExpand)]),
    Rule::new("RENAME", Keyword("rename"), TokenKind::Rename)
        .then(&[ModeAction::Push(Mode::Rename)]),
    Rule::new("ROW", Keyword("row"), TokenKind::Row).then(TO_EXPRESSION),
    Rule::new("SHOW", Keyword("show"), TokenKind::Show).then(&[ModeAction::Push(Mode::Show)]),
    Rule::new("SORT", Keyword("sort"), TokenKind::Sort).then(TO_EXPRESSION),
    Rule::new("STATS", Keyword("stats"), TokenKind::Stats).then(TO_EXPRESSION),
    Rule::new("WHERE", Keyword("where"), TokenKind::Where).then(TO_EXPRESSION),
    Rule::new("MATCH", Keyword("match"), TokenKind::Match).then(TO_EXPRESSION),
    Rule::new("UNKNOWN_CMD", UnknownCommand, TokenKind::UnknownCmd).then(TO_EXPRESSION),
    Rule::line_comment("LINE_COMMENT", TokenKind::LineComment),
    Rule::multiline_comment("MULTILINE_COMMENT", TokenKind::MultilineComment),
    Rule::whitespace("WS", TokenKind::Ws),
    Rule::new("UNQUOTED_SOURCE", UnquotedSource, TokenKind::UnquotedSource),
];

pub static EXPLAIN_RULES: &[Rule] = &[
    Rule::new("EXPLAIN_OPENING_BRACKET", Literal("["), TokenKind::OpeningBracket)
        .then(&[ModeAction::Push(Mode::Default)]),
    Rule::new("EXPLAIN_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::whitespace("EXPLAIN_WS", TokenKind::ExplainWs),
    Rule::line_comment("EXPLAIN_LINE_COMMENT", TokenKind::ExplainLineComment),
    Rule::multiline_comment("EXPLAIN_MULTILINE_COMMENT", TokenKind::ExplainMultilineComment),
];

// ============================================================================
// EXPRESSIONS
// ============================================================================

pub static EXPRESSION_RULES: &[Rule] = &[
    Rule::new("PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("QUOTED_STRING", QuotedString, TokenKind::QuotedString),
    Rule::new("INTEGER_LITERAL", IntegerLiteral, TokenKind::IntegerLiteral),
    Rule::new("DECIMAL_LITERAL", DecimalLiteral, TokenKind::DecimalLiteral),
    Rule::new("BY", Keyword("by"), TokenKind::By),
    Rule::new("AND", Keyword("and"), TokenKind::And),
    Rule::new("ASC", Keyword("asc"), TokenKind::Asc),
    Rule::new("ASSIGN", Literal("="), TokenKind::Assign),
    Rule::new("CAST_OP", Literal("::"), TokenKind::CastOp),
    Rule::new("COMMA", Literal(","), TokenKind::Comma),
    Rule::new("DESC", Keyword("desc"), TokenKind::Desc),
    Rule::new("DOT", Literal("."), TokenKind::Dot),
    Rule::new("FALSE", Keyword("false"), TokenKind::False),
    Rule::new("FIRST", Keyword("first"), TokenKind::First),
    Rule::new("IN", Keyword("in"), TokenKind::In),
    Rule::new("IS", Keyword("is"), TokenKind::Is),
    Rule::new("LAST", Keyword("last"), TokenKind::Last),
    Rule::new("LIKE", Keyword("like"), TokenKind::Like),
    Rule::new("LP", Literal("("), TokenKind::Lp),
    Rule::new("MATCH_OPERATOR", Keyword("match"), TokenKind::MatchOperator),
    Rule::new("NOT", Keyword("not"), TokenKind::Not),
    Rule::new("NULL", Keyword("null"), TokenKind::Null),
    Rule::new("NULLS", Keyword("nulls"), TokenKind::Nulls),
    Rule::new("OR", Keyword("or"), TokenKind::Or),
    Rule::new("PARAM", Literal("?"), TokenKind::Param),
    Rule::new("RLIKE", Keyword("rlike"), TokenKind::Rlike),
    Rule::new("RP", Literal(")"), TokenKind::Rp),
    Rule::new("TRUE", Keyword("true"), TokenKind::True),
    Rule::new("EQ", Literal("=="), TokenKind::Eq),
    Rule::new("CIEQ", Literal("=~"), TokenKind::Cieq),
    Rule::new("NEQ", Literal("!="), TokenKind::Neq),
    Rule::new("LT", Literal("<"), TokenKind::Lt),
    Rule::new("LTE", Literal("<="), TokenKind::Lte),
    Rule::new("GT", Literal(">"), TokenKind::Gt),
    Rule::new("GTE", Literal(">="), TokenKind::Gte),
    Rule::new("PLUS", Literal("+"), TokenKind::Plus),
    Rule::new("MINUS", Literal("-"), TokenKind::Minus),
    Rule::new("ASTERISK", Literal("*"), TokenKind::Asterisk),
    Rule::new("SLASH", Literal("/"), TokenKind::Slash),
    Rule::new("PERCENT", Literal("%"), TokenKind::Percent),
    Rule::new(
        "NAMED_OR_POSITIONAL_PARAM",
        NamedOrPositionalParam,
        TokenKind::NamedOrPositionalParam,
    ),
    Rule::new("OPENING_BRACKET", Literal("["), TokenKind::OpeningBracket)
        .then(&[ModeAction::Push(Mode::Expression), ModeAction::Push(Mode::Expression)]),
    Rule::new("CLOSING_BRACKET", Literal("]"), TokenKind::ClosingBracket).then(POP_TWICE),
    Rule::new("UNQUOTED_IDENTIFIER", UnquotedIdentifier, TokenKind::UnquotedIdentifier),
    Rule::new("QUOTED_IDENTIFIER", QuotedIdentifier, TokenKind::QuotedIdentifier),
    Rule::line_comment("EXPR_LINE_COMMENT", TokenKind::ExprLineComment),
    Rule::multiline_comment("EXPR_MULTILINE_COMMENT", TokenKind::ExprMultilineComment),
    Rule::whitespace("EXPR_WS", TokenKind::ExprWs),
];

// ============================================================================
// SOURCE COMMANDS
// ============================================================================

pub static FROM_RULES: &[Rule] = &[
    Rule::new("FROM_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("FROM_OPENING_BRACKET", Literal("["), TokenKind::OpeningBracket),
    Rule::new("FROM_CLOSING_BRACKET", Literal("]"), TokenKind::ClosingBracket),
    Rule::new("FROM_COLON", Literal(":"), TokenKind::Colon),
    Rule::new("FROM_COMMA", Literal(","), TokenKind::Comma),
    Rule::new("FROM_ASSIGN", Literal("="), TokenKind::Assign),
    Rule::new("METADATA", Keyword("metadata"), TokenKind::Metadata),
    Rule::new("FROM_UNQUOTED_SOURCE", UnquotedSource, TokenKind::UnquotedSource),
    Rule::new("FROM_QUOTED_SOURCE", QuotedString, TokenKind::QuotedString),
    Rule::line_comment("FROM_LINE_COMMENT", TokenKind::FromLineComment),
    Rule::multiline_comment("FROM_MULTILINE_COMMENT", TokenKind::FromMultilineComment),
    Rule::whitespace("FROM_WS", TokenKind::FromWs),
];

pub static METRICS_RULES: &[Rule] = &[
    Rule::new("METRICS_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("METRICS_UNQUOTED_SOURCE", UnquotedSource, TokenKind::UnquotedSource)
        .then(TO_CLOSING_METRICS),
    Rule::new("METRICS_QUOTED_SOURCE", QuotedString, TokenKind::QuotedString)
        .then(TO_CLOSING_METRICS),
    Rule::line_comment("METRICS_LINE_COMMENT", TokenKind::MetricsLineComment),
    Rule::multiline_comment("METRICS_MULTILINE_COMMENT", TokenKind::MetricsMultilineComment),
    Rule::whitespace("METRICS_WS", TokenKind::MetricsWs),
];

pub static CLOSING_METRICS_RULES: &[Rule] = &[
    Rule::new("CLOSING_METRICS_COLON", Literal(":"), TokenKind::Colon)
        .then(BACK_TO_METRICS),
    Rule::new("CLOSING_METRICS_COMMA", Literal(","), TokenKind::Comma)
        .then(BACK_TO_METRICS),
    Rule::line_comment("CLOSING_METRICS_LINE_COMMENT", TokenKind::ClosingMetricsLineComment),
    Rule::multiline_comment("CLOSING_METRICS_MULTILINE_COMMENT", TokenKind::ClosingMetricsMultilineComment),
    Rule::whitespace("CLOSING_METRICS_WS", TokenKind::ClosingMetricsWs),
    Rule::new(
        "CLOSING_METRICS_QUOTED_IDENTIFIER",
        QuotedIdentifier,
        TokenKind::QuotedIdentifier,
    )
    .then(METRICS_TO_EXPRESSION),
    Rule::new(
        "CLOSING_METRICS_UNQUOTED_IDENTIFIER",
        UnquotedIdentifier,
        TokenKind::UnquotedIdentifier,
    )
    .then(METRICS_TO_EXPRESSION),
    Rule::new("CLOSING_METRICS_BY", Keyword("by"), TokenKind::By).then(METRICS_TO_EXPRESSION),
    Rule::new("CLOSING_METRICS_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
];

pub static SHOW_RULES: &[Rule] = &[
    Rule::new("SHOW_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("INFO", Keyword("info"), TokenKind::Info),
    Rule::line_comment("SHOW_LINE_COMMENT", TokenKind::ShowLineComment),
    Rule::multiline_comment("SHOW_MULTILINE_COMMENT", TokenKind::ShowMultilineComment),
    Rule::whitespace("SHOW_WS", TokenKind::ShowWs),
];

pub static META_RULES: &[Rule] = &[
    Rule::new("META_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("FUNCTIONS", Keyword("functions"), TokenKind::Functions),
    Rule::line_comment("META_LINE_COMMENT", TokenKind::MetaLineComment),
    Rule::multiline_comment("META_MULTILINE_COMMENT", TokenKind::MetaMultilineComment),
    Rule::whitespace("META_WS", TokenKind::MetaWs),
];

// ============================================================================
// FIELD LISTS
// ============================================================================

pub static PROJECT_RULES: &[Rule] = &[
    Rule::new("PROJECT_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("PROJECT_DOT", Literal("."), TokenKind::Dot),
    Rule::new("PROJECT_COMMA", Literal(","), TokenKind::Comma),
    Rule::new("ID_PATTERN", IdPattern, TokenKind::IdPattern),
    Rule::line_comment("PROJECT_LINE_COMMENT", TokenKind::ProjectLineComment),
    Rule::multiline_comment("PROJECT_MULTILINE_COMMENT", TokenKind::ProjectMultilineComment),
    Rule::whitespace("PROJECT_WS", TokenKind::ProjectWs),
];

pub static RENAME_RULES: &[Rule] = &[
    Rule::new("RENAME_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("RENAME_ASSIGN", Literal("="), TokenKind::Assign),
    Rule::new("RENAME_COMMA", Literal(","), TokenKind::Comma),
    Rule::new("RENAME_DOT", Literal("."), TokenKind::Dot),
    Rule::new("AS", Keyword("as"), TokenKind::As),
    Rule::new("RENAME_ID_PATTERN", IdPattern, TokenKind::IdPattern),
    Rule::line_comment("RENAME_LINE_COMMENT", TokenKind::RenameLineComment),
    Rule::multiline_comment("RENAME_MULTILINE_COMMENT", TokenKind::RenameMultilineComment),
    Rule::whitespace("RENAME_WS", TokenKind::RenameWs),
];

pub static MVEXPAND_RULES: &[Rule] = &[
    Rule::new("MVEXPAND_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("MVEXPAND_DOT", Literal("."), TokenKind::Dot),
    Rule::new("MVEXPAND_QUOTED_IDENTIFIER", QuotedIdentifier, TokenKind::QuotedIdentifier),
    Rule::new(
        "MVEXPAND_UNQUOTED_IDENTIFIER",
        UnquotedIdentifier,
        TokenKind::UnquotedIdentifier,
    ),
    Rule::line_comment("MVEXPAND_LINE_COMMENT", TokenKind::MvExpandLineComment),
    Rule::multiline_comment("MVEXPAND_MULTILINE_COMMENT", TokenKind::MvExpandMultilineComment),
    Rule::whitespace("MVEXPAND_WS", TokenKind::MvExpandWs),
];

// ============================================================================
// ENRICH AND LOOKUP
// ============================================================================

pub static ENRICH_RULES: &[Rule] = &[
    Rule::new("ENRICH_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("ENRICH_OPENING_BRACKET", Literal("["), TokenKind::OpeningBracket)
        .then(&[ModeAction::Push(Mode::Setting)]),
    Rule::new("ON", Keyword("on"), TokenKind::On)
        .then(&[ModeAction::Push(Mode::EnrichField)]),
    Rule::new("WITH", Keyword("with"), TokenKind::With)
        .then(&[ModeAction::Push(Mode::EnrichField)]),
    Rule::new("ENRICH_POLICY_NAME", EnrichPolicyName, TokenKind::EnrichPolicyName),
    // Always shadowed by ENRICH_POLICY_NAME
    Rule::new(
        "ENRICH_MODE_UNQUOTED_VALUE",
        EnrichPolicyName,
        TokenKind::EnrichPolicyName,
    ),
    Rule::line_comment("ENRICH_LINE_COMMENT", TokenKind::EnrichLineComment),
    Rule::multiline_comment("ENRICH_MULTILINE_COMMENT", TokenKind::EnrichMultilineComment),
    Rule::whitespace("ENRICH_WS", TokenKind::EnrichWs),
];

pub static ENRICH_FIELD_RULES: &[Rule] = &[
    Rule::new("ENRICH_FIELD_PIPE", Literal("|"), TokenKind::Pipe).then(POP_TWICE),
    Rule::new("ENRICH_FIELD_ASSIGN", Literal("="), TokenKind::Assign),
    Rule::new("ENRICH_FIELD_COMMA", Literal(","), TokenKind::Comma),
    Rule::new("ENRICH_FIELD_DOT", Literal("."), TokenKind::Dot),
    Rule::new("ENRICH_FIELD_WITH", Keyword("with"), TokenKind::With),
    Rule::new("ENRICH_FIELD_ID_PATTERN", IdPattern, TokenKind::IdPattern),
    Rule::new(
        "ENRICH_FIELD_QUOTED_IDENTIFIER",
        QuotedIdentifier,
        TokenKind::QuotedIdentifier,
    ),
    Rule::line_comment("ENRICH_FIELD_LINE_COMMENT", TokenKind::EnrichFieldLineComment),
    Rule::multiline_comment("ENRICH_FIELD_MULTILINE_COMMENT", TokenKind::EnrichFieldMultilineComment),
    Rule::whitespace("ENRICH_FIELD_WS", TokenKind::EnrichFieldWs),
];

pub static SETTING_RULES: &[Rule] = &[
    Rule::new("SETTING_CLOSING_BRACKET", Literal("]"), TokenKind::ClosingBracket).then(POP),
    Rule::new("COLON", Literal(":"), TokenKind::Colon),
    Rule::new("SETTING", Setting, TokenKind::Setting),
    Rule::line_comment("SETTING_LINE_COMMENT", TokenKind::SettingLineComment),
    Rule::multiline_comment("SETTTING_MULTILINE_COMMENT", TokenKind::SettingMultilineComment),
    Rule::whitespace("SETTING_WS", TokenKind::SettingWs),
];

pub static LOOKUP_RULES: &[Rule] = &[
    Rule::new("LOOKUP_PIPE", Literal("|"), TokenKind::Pipe).then(POP),
    Rule::new("LOOKUP_COLON", Literal(":"), TokenKind::Colon),
    Rule::new("LOOKUP_COMMA", Literal(","), TokenKind::Comma),
    Rule::new("LOOKUP_DOT", Literal("."), TokenKind::Dot),
    Rule::new("LOOKUP_ON", Keyword("on"), TokenKind::On)
        .then(&[ModeAction::Push(Mode::LookupField)]),
    Rule::new("LOOKUP_UNQUOTED_SOURCE", UnquotedSource, TokenKind::UnquotedSource),
    Rule::new("LOOKUP_QUOTED_SOURCE", QuotedString, TokenKind::QuotedString),
    Rule::line_comment("LOOKUP_LINE_COMMENT", TokenKind::LookupLineComment),
    Rule::multiline_comment("LOOKUP_MULTILINE_COMMENT", TokenKind::LookupMultilineComment),
    Rule::whitespace("LOOKUP_WS", TokenKind::LookupWs),
];

pub static LOOKUP_FIELD_RULES: &[Rule] = &[
    Rule::new("LOOKUP_FIELD_PIPE", Literal("|"), TokenKind::Pipe).then(POP_TWICE),
    Rule::new("LOOKUP_FIELD_COMMA", Literal(","), TokenKind::Comma),
    Rule::new("LOOKUP_FIELD_DOT", Literal("."), TokenKind::Dot),
    Rule::new("LOOKUP_FIELD_ID_PATTERN", IdPattern, TokenKind::IdPattern),
    Rule::line_comment("LOOKUP_FIELD_LINE_COMMENT", TokenKind::LookupFieldLineComment),
    Rule::multiline_comment("LOOKUP_FIELD_MULTILINE_COMMENT", TokenKind::LookupFieldMultilineComment),
    Rule::whitespace("LOOKUP_FIELD_WS", TokenKind::LookupFieldWs),
];

/// Rule table of a mode
pub fn rules_for(mode: Mode) -> &'static [Rule] {
    match mode {
        Mode::Default => DEFAULT_RULES,
        Mode::Explain => EXPLAIN_RULES,
        Mode::Expression => EXPRESSION_RULES,
        Mode::From => FROM_RULES,
        Mode::Project => PROJECT_RULES,
        Mode::Rename => RENAME_RULES,
        Mode::Enrich => ENRICH_RULES,
        Mode::EnrichField => ENRICH_FIELD_RULES,
        Mode::Lookup => LOOKUP_RULES,
        Mode::LookupField => LOOKUP_FIELD_RULES,
        Mode::MvExpand => MVEXPAND_RULES,
        Mode::Show => SHOW_RULES,
        Mode::Meta => META_RULES,
        Mode::Setting => SETTING_RULES,
        Mode::Metrics => METRICS_RULES,
        Mode::ClosingMetrics => CLOSING_METRICS_RULES,
    }
}

/// Longest-matching rule of a mode; ties go to the rule declared first
pub fn longest_match(mode: Mode, input: &str) -> Option<(&'static Rule, usize)> {
    let mut best: Option<(&'static Rule, usize)> = None;
    for rule in rules_for(mode) {
        let len = rule.recognizer.match_len(input);
        if len > 0 && best.map_or(true, |(_, best_len)| len > best_len) {
            best = Some((rule, len));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_mode_has_hidden_trivia() {
        for mode in Mode::ALL {
            let hidden: Vec<_> = rules_for(mode)
                .iter()
                .filter(|r| r.channel == Channel::Hidden)
                .collect();
            assert_eq!(hidden.len(), 3, "{}", mode);
            assert!(hidden.iter().all(|r| r.kind.is_hidden_by_default()));
        }
    }

    #[test]
    fn test_rule_names_are_unique() {
        let mut names = HashSet::new();
        for mode in Mode::ALL {
            for rule in rules_for(mode) {
                assert!(names.insert(rule.name), "duplicate rule {}", rule.name);
            }
        }
    }

    #[test]
    fn test_tables_emit_every_grammar_kind() {
        let emitted: HashSet<TokenKind> = Mode::ALL
            .iter()
            .flat_map(|&m| rules_for(m).iter().map(|r| r.kind))
            .collect();
        for &kind in TokenKind::ALL {
            if kind.type_id() > 0 {
                assert!(emitted.contains(&kind), "no rule emits {}", kind);
            }
        }
    }

    #[test]
    fn test_explain_declares_whitespace_first() {
        let names: Vec<_> = EXPLAIN_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "EXPLAIN_OPENING_BRACKET",
                "EXPLAIN_PIPE",
                "EXPLAIN_WS",
                "EXPLAIN_LINE_COMMENT",
                "EXPLAIN_MULTILINE_COMMENT",
            ]
        );
    }

    #[test]
    fn test_longest_match_tie_breaking() {
        let (rule, len) = longest_match(Mode::Default, "from logs").unwrap();
        assert_eq!((rule.kind, len), (TokenKind::From, 4));

        let (rule, _) = longest_match(Mode::Default, "fromage x").unwrap();
        assert_eq!(rule.kind, TokenKind::UnknownCmd);

        let (rule, len) = longest_match(Mode::Expression, "<= 3").unwrap();
        assert_eq!((rule.kind, len), (TokenKind::Lte, 2));

        let (rule, _) = longest_match(Mode::From, "metadata _id").unwrap();
        assert_eq!(rule.kind, TokenKind::Metadata);

        let (rule, _) = longest_match(Mode::ClosingMetrics, "by").unwrap();
        assert_eq!(rule.kind, TokenKind::UnquotedIdentifier);

        assert!(longest_match(Mode::Show, "!").is_none());
    }
}
