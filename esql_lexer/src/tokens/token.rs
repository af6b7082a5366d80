//! Token vocabulary for ES|QL queries
//!
//! Token kinds carry the same numeric type ids, symbolic names, and literal
//! names as the query grammar's vocabulary, so a parser built against that
//! vocabulary can consume these tokens directly.
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares the closed `TokenKind` enum together with its vocabulary tables.
macro_rules! token_kinds {
    ($( $(#[$meta:meta])* $variant:ident = $id:literal, $symbolic:literal, $literal:expr; )+) => {
        /// Every token type the lexer can emit
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum TokenKind {
            $(
                $(#[$meta])*
                #[serde(rename = $symbolic)]
                $variant,
            )+
        }

        impl TokenKind {
            /// All token kinds in type id order
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$variant),+];

            /// Stable numeric token type
            pub const fn type_id(self) -> i32 {
                match self {
                    $(TokenKind::$variant => $id,)+
                }
            }

            /// Symbolic name, e.g. `UNQUOTED_SOURCE`
            pub const fn symbolic_name(self) -> &'static str {
                match self {
                    $(TokenKind::$variant => $symbolic,)+
                }
            }

            /// Quoted fixed spelling, e.g. `'::'`, for kinds that have one
            pub const fn literal_name(self) -> Option<&'static str> {
                match self {
                    $(TokenKind::$variant => $literal,)+
                }
            }

            /// Look up a kind by numeric token type
            pub fn from_type_id(id: i32) -> Option<Self> {
                match id {
                    $($id => Some(TokenKind::$variant),)+
                    _ => None,
                }
            }

            /// Look up a kind by symbolic name
            pub fn from_symbolic_name(name: &str) -> Option<Self> {
                match name {
                    $($symbolic => Some(TokenKind::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

token_kinds! {
    /// End of input marker
    Eof = -1, "EOF", None;
    /// Input no rule of the active mode accepts
    Unknown = 0, "UNKNOWN", None;

    // === SOURCE COMMANDS AND PROCESSING COMMANDS ===
    Dissect = 1, "DISSECT", Some("'dissect'");
    Drop = 2, "DROP", Some("'drop'");
    Enrich = 3, "ENRICH", Some("'enrich'");
    Eval = 4, "EVAL", Some("'eval'");
    Explain = 5, "EXPLAIN", Some("'explain'");
    From = 6, "FROM", Some("'from'");
    Grok = 7, "GROK", Some("'grok'");
    InlineStats = 8, "INLINESTATS", Some("'inlinestats'");
    Keep = 9, "KEEP", Some("'keep'");
    Limit = 10, "LIMIT", Some("'limit'");
    Lookup = 11, "LOOKUP", Some("'lookup'");
    Meta = 12, "META", Some("'meta'");
    Metrics = 13, "METRICS", Some("'metrics'");
    MvExpand = 14, "MV_EXPAND", Some("'mv_expand'");
    Rename = 15, "RENAME", Some("'rename'");
    Row = 16, "ROW", Some("'row'");
    Show = 17, "SHOW", Some("'show'");
    Sort = 18, "SORT", Some("'sort'");
    Stats = 19, "STATS", Some("'stats'");
    Where = 20, "WHERE", Some("'where'");
    Match = 21, "MATCH", None;
    /// Any other bare word in command position
    UnknownCmd = 22, "UNKNOWN_CMD", None;

    // === DEFAULT MODE TRIVIA AND SOURCES ===
    LineComment = 23, "LINE_COMMENT", None;
    MultilineComment = 24, "MULTILINE_COMMENT", None;
    Ws = 25, "WS", None;
    UnquotedSource = 26, "UNQUOTED_SOURCE", None;
    ExplainWs = 27, "EXPLAIN_WS", None;
    ExplainLineComment = 28, "EXPLAIN_LINE_COMMENT", None;
    ExplainMultilineComment = 29, "EXPLAIN_MULTILINE_COMMENT", None;

    // === EXPRESSIONS ===
    Pipe = 30, "PIPE", Some("'|'");
    QuotedString = 31, "QUOTED_STRING", None;
    IntegerLiteral = 32, "INTEGER_LITERAL", None;
    DecimalLiteral = 33, "DECIMAL_LITERAL", None;
    By = 34, "BY", Some("'by'");
    And = 35, "AND", Some("'and'");
    Asc = 36, "ASC", Some("'asc'");
    Assign = 37, "ASSIGN", Some("'='");
    CastOp = 38, "CAST_OP", Some("'::'");
    Comma = 39, "COMMA", Some("','");
    Desc = 40, "DESC", Some("'desc'");
    Dot = 41, "DOT", Some("'.'");
    False = 42, "FALSE", Some("'false'");
    First = 43, "FIRST", Some("'first'");
    In = 44, "IN", Some("'in'");
    Is = 45, "IS", Some("'is'");
    Last = 46, "LAST", Some("'last'");
    Like = 47, "LIKE", Some("'like'");
    Lp = 48, "LP", Some("'('");
    MatchOperator = 49, "MATCH_OPERATOR", None;
    Not = 50, "NOT", Some("'not'");
    Null = 51, "NULL", Some("'null'");
    Nulls = 52, "NULLS", Some("'nulls'");
    Or = 53, "OR", Some("'or'");
    Param = 54, "PARAM", Some("'?'");
    Rlike = 55, "RLIKE", Some("'rlike'");
    Rp = 56, "RP", Some("')'");
    True = 57, "TRUE", Some("'true'");
    Eq = 58, "EQ", Some("'=='");
    Cieq = 59, "CIEQ", Some("'=~'");
    Neq = 60, "NEQ", Some("'!='");
    Lt = 61, "LT", Some("'<'");
    Lte = 62, "LTE", Some("'<='");
    Gt = 63, "GT", Some("'>'");
    Gte = 64, "GTE", Some("'>='");
    Plus = 65, "PLUS", Some("'+'");
    Minus = 66, "MINUS", Some("'-'");
    Asterisk = 67, "ASTERISK", Some("'*'");
    Slash = 68, "SLASH", Some("'/'");
    Percent = 69, "PERCENT", Some("'%'");
    NamedOrPositionalParam = 70, "NAMED_OR_POSITIONAL_PARAM", None;
    OpeningBracket = 71, "OPENING_BRACKET", None;
    ClosingBracket = 72, "CLOSING_BRACKET", Some("']'");
    UnquotedIdentifier = 73, "UNQUOTED_IDENTIFIER", None;
    QuotedIdentifier = 74, "QUOTED_IDENTIFIER", None;
    ExprLineComment = 75, "EXPR_LINE_COMMENT", None;
    ExprMultilineComment = 76, "EXPR_MULTILINE_COMMENT", None;
    ExprWs = 77, "EXPR_WS", None;

    // === FROM ===
    Metadata = 78, "METADATA", Some("'metadata'");
    FromLineComment = 79, "FROM_LINE_COMMENT", None;
    FromMultilineComment = 80, "FROM_MULTILINE_COMMENT", None;
    FromWs = 81, "FROM_WS", None;

    // === KEEP / DROP ===
    IdPattern = 82, "ID_PATTERN", None;
    ProjectLineComment = 83, "PROJECT_LINE_COMMENT", None;
    ProjectMultilineComment = 84, "PROJECT_MULTILINE_COMMENT", None;
    ProjectWs = 85, "PROJECT_WS", None;

    // === RENAME ===
    As = 86, "AS", Some("'as'");
    RenameLineComment = 87, "RENAME_LINE_COMMENT", None;
    RenameMultilineComment = 88, "RENAME_MULTILINE_COMMENT", None;
    RenameWs = 89, "RENAME_WS", None;

    // === ENRICH ===
    On = 90, "ON", Some("'on'");
    With = 91, "WITH", Some("'with'");
    EnrichPolicyName = 92, "ENRICH_POLICY_NAME", None;
    EnrichLineComment = 93, "ENRICH_LINE_COMMENT", None;
    EnrichMultilineComment = 94, "ENRICH_MULTILINE_COMMENT", None;
    EnrichWs = 95, "ENRICH_WS", None;
    EnrichFieldLineComment = 96, "ENRICH_FIELD_LINE_COMMENT", None;
    EnrichFieldMultilineComment = 97, "ENRICH_FIELD_MULTILINE_COMMENT", None;
    EnrichFieldWs = 98, "ENRICH_FIELD_WS", None;

    // === LOOKUP ===
    LookupLineComment = 99, "LOOKUP_LINE_COMMENT", None;
    LookupMultilineComment = 100, "LOOKUP_MULTILINE_COMMENT", None;
    LookupWs = 101, "LOOKUP_WS", None;
    LookupFieldLineComment = 102, "LOOKUP_FIELD_LINE_COMMENT", None;
    LookupFieldMultilineComment = 103, "LOOKUP_FIELD_MULTILINE_COMMENT", None;
    LookupFieldWs = 104, "LOOKUP_FIELD_WS", None;

    // === MV_EXPAND ===
    MvExpandLineComment = 105, "MVEXPAND_LINE_COMMENT", None;
    MvExpandMultilineComment = 106, "MVEXPAND_MULTILINE_COMMENT", None;
    MvExpandWs = 107, "MVEXPAND_WS", None;

    // === SHOW / META ===
    Info = 108, "INFO", Some("'info'");
    ShowLineComment = 109, "SHOW_LINE_COMMENT", None;
    ShowMultilineComment = 110, "SHOW_MULTILINE_COMMENT", None;
    ShowWs = 111, "SHOW_WS", None;
    Functions = 112, "FUNCTIONS", Some("'functions'");
    MetaLineComment = 113, "META_LINE_COMMENT", None;
    MetaMultilineComment = 114, "META_MULTILINE_COMMENT", None;
    MetaWs = 115, "META_WS", None;

    // === SETTINGS ===
    Colon = 116, "COLON", Some("':'");
    Setting = 117, "SETTING", None;
    SettingLineComment = 118, "SETTING_LINE_COMMENT", None;
    /// Symbolic name keeps the vocabulary's historical spelling
    SettingMultilineComment = 119, "SETTTING_MULTILINE_COMMENT", None;
    SettingWs = 120, "SETTING_WS", None;

    // === METRICS ===
    MetricsLineComment = 121, "METRICS_LINE_COMMENT", None;
    MetricsMultilineComment = 122, "METRICS_MULTILINE_COMMENT", None;
    MetricsWs = 123, "METRICS_WS", None;
    ClosingMetricsLineComment = 124, "CLOSING_METRICS_LINE_COMMENT", None;
    ClosingMetricsMultilineComment = 125, "CLOSING_METRICS_MULTILINE_COMMENT", None;
    ClosingMetricsWs = 126, "CLOSING_METRICS_WS", None;
}

impl TokenKind {
    /// Literal name when the kind has a fixed spelling, symbolic name otherwise
    pub fn display_name(self) -> &'static str {
        self.literal_name().unwrap_or(self.symbolic_name())
    }

    /// Check if this kind is a command keyword recognized in command position
    pub fn is_command_keyword(self) -> bool {
        (1..=21).contains(&self.type_id())
    }

    /// Check if this kind is any keyword (command or clause keyword)
    pub fn is_keyword(self) -> bool {
        self.is_command_keyword()
            || matches!(
                self,
                Self::By
                    | Self::And
                    | Self::Asc
                    | Self::Desc
                    | Self::False
                    | Self::First
                    | Self::In
                    | Self::Is
                    | Self::Last
                    | Self::Like
                    | Self::MatchOperator
                    | Self::Not
                    | Self::Null
                    | Self::Nulls
                    | Self::Or
                    | Self::Rlike
                    | Self::True
                    | Self::Metadata
                    | Self::As
                    | Self::On
                    | Self::With
                    | Self::Info
                    | Self::Functions
            )
    }

    /// Check if this kind is a comparison operator
    pub fn is_comparison_operator(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Cieq | Self::Neq | Self::Lt | Self::Lte | Self::Gt | Self::Gte
        )
    }

    /// Check if this kind is an arithmetic operator
    pub fn is_arithmetic_operator(self) -> bool {
        matches!(
            self,
            Self::Plus | Self::Minus | Self::Asterisk | Self::Slash | Self::Percent
        )
    }

    /// Check if this kind is any symbolic operator
    pub fn is_operator(self) -> bool {
        self.is_comparison_operator()
            || self.is_arithmetic_operator()
            || matches!(self, Self::Assign | Self::CastOp)
    }

    /// Check if this kind is punctuation
    pub fn is_punctuation(self) -> bool {
        matches!(
            self,
            Self::Pipe
                | Self::Comma
                | Self::Dot
                | Self::Lp
                | Self::Rp
                | Self::OpeningBracket
                | Self::ClosingBracket
                | Self::Colon
        )
    }

    /// Check if this kind is a string or numeric literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::QuotedString | Self::IntegerLiteral | Self::DecimalLiteral
        )
    }

    /// Check if this kind names a field, source, policy, or setting
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            Self::UnquotedIdentifier
                | Self::QuotedIdentifier
                | Self::IdPattern
                | Self::UnquotedSource
                | Self::EnrichPolicyName
                | Self::Setting
        )
    }

    /// Check if this kind is a query parameter placeholder
    pub fn is_parameter(self) -> bool {
        matches!(self, Self::Param | Self::NamedOrPositionalParam)
    }

    /// Check if this kind is a `//` comment in any mode
    pub fn is_line_comment(self) -> bool {
        matches!(
            self,
            Self::LineComment
                | Self::ExplainLineComment
                | Self::ExprLineComment
                | Self::FromLineComment
                | Self::ProjectLineComment
                | Self::RenameLineComment
                | Self::EnrichLineComment
                | Self::EnrichFieldLineComment
                | Self::LookupLineComment
                | Self::LookupFieldLineComment
                | Self::MvExpandLineComment
                | Self::ShowLineComment
                | Self::MetaLineComment
                | Self::SettingLineComment
                | Self::MetricsLineComment
                | Self::ClosingMetricsLineComment
        )
    }

    /// Check if this kind is a `/* */` comment in any mode
    pub fn is_multiline_comment(self) -> bool {
        matches!(
            self,
            Self::MultilineComment
                | Self::ExplainMultilineComment
                | Self::ExprMultilineComment
                | Self::FromMultilineComment
                | Self::ProjectMultilineComment
                | Self::RenameMultilineComment
                | Self::EnrichMultilineComment
                | Self::EnrichFieldMultilineComment
                | Self::LookupMultilineComment
                | Self::LookupFieldMultilineComment
                | Self::MvExpandMultilineComment
                | Self::ShowMultilineComment
                | Self::MetaMultilineComment
                | Self::SettingMultilineComment
                | Self::MetricsMultilineComment
                | Self::ClosingMetricsMultilineComment
        )
    }

    /// Check if this kind is a comment of either style
    pub fn is_comment(self) -> bool {
        self.is_line_comment() || self.is_multiline_comment()
    }

    /// Check if this kind is whitespace in any mode
    pub fn is_whitespace(self) -> bool {
        matches!(
            self,
            Self::Ws
                | Self::ExplainWs
                | Self::ExprWs
                | Self::FromWs
                | Self::ProjectWs
                | Self::RenameWs
                | Self::EnrichWs
                | Self::EnrichFieldWs
                | Self::LookupWs
                | Self::LookupFieldWs
                | Self::MvExpandWs
                | Self::ShowWs
                | Self::MetaWs
                | Self::SettingWs
                | Self::MetricsWs
                | Self::ClosingMetricsWs
        )
    }

    /// Check if the lexer routes this kind to the hidden channel
    pub fn is_hidden_by_default(self) -> bool {
        self.is_comment() || self.is_whitespace()
    }

    /// Get the classification of this kind
    pub fn token_class(self) -> TokenClass {
        if self.is_keyword() {
            TokenClass::Keyword
        } else if self.is_operator() {
            TokenClass::Operator
        } else if self.is_punctuation() {
            TokenClass::Punctuation
        } else if self.is_literal() {
            TokenClass::Literal
        } else if self.is_identifier() {
            TokenClass::Identifier
        } else if self.is_parameter() {
            TokenClass::Parameter
        } else if self.is_comment() {
            TokenClass::Comment
        } else if self.is_whitespace() {
            TokenClass::Whitespace
        } else {
            TokenClass::Special
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbolic_name())
    }
}

/// Token classification for metrics and tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Operator,
    Punctuation,
    Literal,
    Identifier,
    Parameter,
    Comment,
    Whitespace,
    /// EOF, unrecognized input, and unknown commands
    Special,
}

/// Output channel of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Syntactically significant tokens
    Default,
    /// Whitespace and comments
    Hidden,
}

impl Channel {
    /// Numeric channel id (0 = default, 1 = hidden)
    pub const fn id(self) -> u32 {
        match self {
            Self::Default => 0,
            Self::Hidden => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT_TOKEN_CHANNEL",
            Self::Hidden => "HIDDEN",
        }
    }
}

/// One recognized lexeme with its exact source text and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source lexeme (empty for EOF)
    pub text: String,
    pub span: Span,
    pub channel: Channel,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, channel: Channel) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            channel,
        }
    }

    /// Create the end-of-input marker at a position
    pub fn eof(at: Position) -> Self {
        Self::new(TokenKind::Eof, String::new(), Span::empty(at), Channel::Default)
    }

    /// Byte offset of the first character
    pub fn start_offset(&self) -> usize {
        self.span.start.offset
    }

    /// Byte offset one past the last character
    pub fn end_offset(&self) -> usize {
        self.span.end.offset
    }

    /// 1-based line of the first character
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    /// 1-based column of the first character
    pub fn column(&self) -> u32 {
        self.span.start.column
    }

    pub fn is_hidden(&self) -> bool {
        self.channel == Channel::Hidden
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_unknown(&self) -> bool {
        self.kind == TokenKind::Unknown
    }

    /// Check if a parser should see this token
    pub fn is_significant(&self) -> bool {
        self.channel == Channel::Default
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} @{}",
            self.kind.symbolic_name(),
            self.text,
            self.span.start
        )
    }
}
