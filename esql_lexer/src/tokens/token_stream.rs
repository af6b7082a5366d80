//! Channel-aware token stream for ES|QL parsers and tooling
//!
//! Keeps every token the lexer produced (hidden trivia included) so the
//! original query can be rebuilt byte-for-byte, while navigation methods
//! only visit default-channel tokens.

use crate::{
    tokens::token::{Token, TokenKind},
    utils::{SourceMap, Span},
};
use thiserror::Error;

/// Buffered token list with a cursor over significant tokens
#[derive(Debug, Clone)]
pub struct TokenStream {
    /// All tokens (including whitespace and comments) in source order
    all_tokens: Vec<Token>,
    /// Indices into all_tokens for default-channel tokens
    significant_indices: Vec<usize>,
    /// Current position in significant_indices
    position: usize,
    /// Source map for error reporting
    source_map: Option<SourceMap>,
}

impl TokenStream {
    /// Create a new token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut stream = Self {
            all_tokens: tokens,
            significant_indices: Vec::new(),
            position: 0,
            source_map: None,
        };
        stream.rebuild_significant_indices();
        stream
    }

    /// Create a stream that can quote source lines in error messages
    pub fn with_source_map(tokens: Vec<Token>, source_map: SourceMap) -> Self {
        let mut stream = Self::new(tokens);
        stream.source_map = Some(source_map);
        stream
    }

    fn rebuild_significant_indices(&mut self) {
        self.significant_indices = self
            .all_tokens
            .iter()
            .enumerate()
            .filter(|(_, token)| token.is_significant())
            .map(|(i, _)| i)
            .collect();

        crate::log_debug!("Token stream indexed",
            "total_tokens" => self.all_tokens.len(),
            "significant_tokens" => self.significant_indices.len()
        );

        self.position = 0;
    }

    // === NAVIGATION ===

    /// Get the current significant token
    pub fn current(&self) -> Option<&Token> {
        self.peek_ahead(0)
    }

    /// Kind of the current significant token
    pub fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|token| token.kind)
    }

    /// Peek at the next significant token without advancing
    pub fn peek(&self) -> Option<&Token> {
        self.peek_ahead(1)
    }

    /// Peek ahead by n significant tokens
    pub fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.significant_indices
            .get(self.position + n)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    /// Advance to the next significant token
    pub fn advance(&mut self) -> Option<&Token> {
        if self.position < self.significant_indices.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Check if the cursor has moved past every significant token
    pub fn is_at_end(&self) -> bool {
        self.position >= self.significant_indices.len()
    }

    /// Number of significant tokens (EOF included)
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    /// Consume the current token if it has the expected kind
    pub fn expect_kind(&mut self, expected: TokenKind) -> Result<Token, TokenStreamError> {
        match self.current() {
            Some(current) if current.kind == expected => {
                let token = current.clone();
                self.advance();
                Ok(token)
            }
            Some(current) => Err(TokenStreamError::UnexpectedToken {
                expected: expected.display_name().to_string(),
                found: current.kind.display_name().to_string(),
                span: current.span,
            }),
            None => Err(TokenStreamError::UnexpectedEndOfStream {
                expected: expected.display_name().to_string(),
            }),
        }
    }

    /// Advance if the current token has the given kind
    pub fn advance_if(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == Some(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Save current position as a checkpoint for backtracking
    pub fn save_position(&self) -> usize {
        self.position
    }

    /// Restore position from a checkpoint
    pub fn restore_position(&mut self, saved_position: usize) {
        self.position = saved_position.min(self.significant_indices.len());
    }

    pub fn position(&self) -> usize {
        self.position
    }

    // === TRIVIA ===

    /// Iterate over default-channel tokens
    pub fn iter_significant(&self) -> impl Iterator<Item = &Token> {
        self.significant_indices
            .iter()
            .map(|&i| &self.all_tokens[i])
    }

    /// Iterate over hidden-channel tokens (comments and whitespace)
    pub fn iter_hidden(&self) -> impl Iterator<Item = &Token> {
        self.all_tokens.iter().filter(|token| token.is_hidden())
    }

    /// Hidden tokens directly preceding the significant token at `index`
    ///
    /// Formatters use this to keep comments attached to the token they
    /// annotate.
    pub fn hidden_before(&self, index: usize) -> &[Token] {
        let Some(&original) = self.significant_indices.get(index) else {
            return &[];
        };
        let start = match index {
            0 => 0,
            _ => self.significant_indices[index - 1] + 1,
        };
        &self.all_tokens[start..original]
    }

    /// All tokens (including hidden) in source order
    pub fn all_tokens(&self) -> &[Token] {
        &self.all_tokens
    }

    /// Concatenate every token's text, rebuilding the source
    pub fn reconstruct(&self) -> String {
        self.all_tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect()
    }

    /// Unrecognized tokens in source order
    pub fn unknown_tokens(&self) -> impl Iterator<Item = &Token> {
        self.all_tokens.iter().filter(|token| token.is_unknown())
    }

    pub fn has_eof(&self) -> bool {
        self.significant_indices
            .last()
            .and_then(|&i| self.all_tokens.get(i))
            .map(|token| token.is_eof())
            .unwrap_or(false)
    }

    // === ERROR REPORTING ===

    /// Format an error with source context when a source map is present
    pub fn format_error(&self, span: Span, message: &str) -> String {
        if let Some(ref source_map) = self.source_map {
            source_map.format_error(&span, message)
        } else {
            format!("Error at {}: {}", span, message)
        }
    }

    pub fn source_map(&self) -> Option<&SourceMap> {
        self.source_map.as_ref()
    }

    /// Diagnostic summary of the cursor state
    pub fn diagnostic(&self) -> String {
        let current_info = match self.current() {
            Some(current) => format!("{} at {}", current.kind, current.span),
            None => "<end>".to_string(),
        };

        format!(
            "TokenStream(pos: {}/{}, current: {})",
            self.position,
            self.significant_indices.len(),
            current_info
        )
    }
}

/// Token stream navigation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenStreamError {
    #[error("Expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Expected {expected}, but reached end of input")]
    UnexpectedEndOfStream { expected: String },
}

impl TokenStreamError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            Self::UnexpectedToken { .. } => crate::logging::codes::lexical::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfStream { .. } => {
                crate::logging::codes::lexical::UNEXPECTED_END_OF_STREAM
            }
        }
    }
}

/// Structural checks over lexer output
pub mod validation {
    use super::*;

    /// Validate that token spans never go backwards
    pub fn validate_span_order(tokens: &[Token]) -> Result<(), String> {
        for window in tokens.windows(2) {
            let current = window[0].span;
            let next = window[1].span;

            if current.end.offset > next.start.offset {
                return Err(format!(
                    "Span order violation: token ending at {} overlaps next token at {}",
                    current.end.offset, next.start.offset
                ));
            }
        }
        Ok(())
    }

    /// Validate that tokens tile the source exactly and end with EOF
    pub fn validate_coverage(stream: &TokenStream, source: &str) -> Result<(), String> {
        let tokens = stream.all_tokens();
        validate_span_order(tokens)?;

        let mut expected_offset = 0;
        for token in tokens {
            if token.start_offset() != expected_offset {
                return Err(format!(
                    "Coverage gap: expected token at offset {}, found {} at {}",
                    expected_offset,
                    token.kind,
                    token.start_offset()
                ));
            }
            if source.get(token.start_offset()..token.end_offset()) != Some(token.text.as_str()) {
                return Err(format!(
                    "Token text mismatch for {} at {}",
                    token.kind, token.span
                ));
            }
            expected_offset = token.end_offset();
        }

        if expected_offset != source.len() {
            return Err(format!(
                "Tokens end at offset {} but source has {} bytes",
                expected_offset,
                source.len()
            ));
        }

        match tokens.last() {
            Some(last) if last.is_eof() => Ok(()),
            _ => Err("Token stream does not end with EOF".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Channel;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    fn build(parts: &[(TokenKind, &str)]) -> (TokenStream, String) {
        let mut tokens = Vec::new();
        let mut at = Position::start();
        let mut source = String::new();
        for &(kind, text) in parts {
            let end = at.advance_str(text);
            let channel = if kind.is_hidden_by_default() {
                Channel::Hidden
            } else {
                Channel::Default
            };
            tokens.push(Token::new(kind, text, Span::new(at, end), channel));
            source.push_str(text);
            at = end;
        }
        tokens.push(Token::eof(at));
        (TokenStream::new(tokens), source)
    }

    #[test]
    fn test_navigation_skips_hidden() {
        let (mut stream, _) = build(&[
            (TokenKind::From, "FROM"),
            (TokenKind::FromWs, " "),
            (TokenKind::UnquotedSource, "logs"),
        ]);

        assert_eq!(stream.len(), 3);
        assert_eq!(stream.current_kind(), Some(TokenKind::From));
        assert_eq!(stream.peek().map(|t| t.kind), Some(TokenKind::UnquotedSource));
        stream.advance();
        assert_eq!(stream.current().map(|t| t.text.as_str()), Some("logs"));
        stream.advance();
        assert!(stream.current().is_some_and(Token::is_eof));
        stream.advance();
        assert!(stream.is_at_end());
        assert!(stream.has_eof());
    }

    #[test]
    fn test_expect_kind() {
        let (mut stream, _) = build(&[(TokenKind::Row, "ROW")]);
        assert_matches!(
            stream.expect_kind(TokenKind::From),
            Err(TokenStreamError::UnexpectedToken { .. })
        );
        assert!(stream.expect_kind(TokenKind::Row).is_ok());
        assert!(stream.expect_kind(TokenKind::Eof).is_ok());
        assert_matches!(
            stream.expect_kind(TokenKind::Eof),
            Err(TokenStreamError::UnexpectedEndOfStream { .. })
        );
    }

    #[test]
    fn test_hidden_before_and_reconstruct() {
        let (stream, source) = build(&[
            (TokenKind::LineComment, "// head"),
            (TokenKind::Ws, "\n"),
            (TokenKind::Row, "ROW"),
            (TokenKind::ExprWs, " "),
            (TokenKind::UnquotedIdentifier, "a"),
        ]);

        let before_row: Vec<_> = stream.hidden_before(0).iter().map(|t| t.kind).collect();
        assert_eq!(before_row, vec![TokenKind::LineComment, TokenKind::Ws]);
        assert_eq!(stream.hidden_before(1).len(), 1);
        assert!(stream.hidden_before(2).is_empty());
        assert!(stream.hidden_before(9).is_empty());
        assert_eq!(stream.iter_hidden().count(), 3);
        assert_eq!(stream.reconstruct(), source);
    }

    #[test]
    fn test_checkpoint_restore() {
        let (mut stream, _) = build(&[(TokenKind::Keep, "KEEP"), (TokenKind::IdPattern, "a*")]);
        let saved = stream.save_position();
        stream.advance();
        stream.advance();
        stream.restore_position(saved);
        assert_eq!(stream.current_kind(), Some(TokenKind::Keep));
        stream.restore_position(100);
        assert!(stream.is_at_end());
    }

    #[test]
    fn test_validate_coverage() {
        let (stream, source) = build(&[
            (TokenKind::Show, "SHOW"),
            (TokenKind::ShowWs, " "),
            (TokenKind::Info, "info"),
        ]);
        assert!(validation::validate_coverage(&stream, &source).is_ok());
        assert!(validation::validate_coverage(&stream, "SHOW info extra").is_err());

        let gap = TokenStream::new(vec![Token::eof(Position::new(3, 1, 4))]);
        assert!(validation::validate_coverage(&gap, "abc").is_err());
    }
}
