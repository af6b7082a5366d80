//! Lexical analyzer with metrics, diagnostics, and logging
//!
//! Wraps the tokenizer for callers that want a `TokenStream` plus
//! bookkeeping. The compile-time input and token limits are enforced here;
//! the plain tokenizer stays total.

use super::modes::Mode;
use super::tokenizer::Tokenizer;
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::{codes, LogEvent, LoggingService};
use crate::tokens::{Token, TokenClass, TokenKind, TokenStream};
use crate::utils::SourceMap;
use crate::log_debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Lexical analysis errors with compile-time security boundaries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Unrecognized input '{text}' at line {line}, column {column} in {mode}")]
    UnrecognizedInput {
        text: String,
        line: u32,
        column: u32,
        mode: String,
    },

    #[error("Input too large: {size} bytes (max {MAX_INPUT_SIZE})")]
    InputTooLarge { size: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::UnrecognizedInput { .. } => codes::lexical::UNRECOGNIZED_INPUT,
            LexerError::InputTooLarge { .. } => codes::lexical::INPUT_TOO_LARGE,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    fn unrecognized(token: &Token, mode: Mode) -> Self {
        LexerError::UnrecognizedInput {
            text: token.text.clone(),
            line: token.line(),
            column: token.column(),
            mode: mode.name().to_string(),
        }
    }
}

/// Token counts collected during one analysis run
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    /// Every token except `EOF`; hidden tokens only when counted
    pub total_tokens: usize,
    pub significant_tokens: usize,
    pub hidden_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub punctuation_tokens: usize,
    pub parameter_tokens: usize,
    pub comment_tokens: usize,
    pub whitespace_tokens: usize,
    pub unknown_tokens: usize,
    pub max_mode_depth: usize,
    pub dropped_mode_pushes: usize,

    // Runtime preference-controlled metrics
    pub tokens_per_mode: HashMap<Mode, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(
        &mut self,
        token: &Token,
        mode: Mode,
        preferences: &LexicalPreferences,
    ) {
        if token.is_eof() {
            return;
        }

        if token.is_hidden() {
            self.hidden_tokens += 1;
            if !preferences.include_hidden_in_counts {
                return;
            }
        } else {
            self.significant_tokens += 1;
        }
        self.total_tokens += 1;

        match token.kind.token_class() {
            TokenClass::Keyword => self.keyword_tokens += 1,
            TokenClass::Identifier => self.identifier_tokens += 1,
            TokenClass::Literal => self.literal_tokens += 1,
            TokenClass::Operator => self.operator_tokens += 1,
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Parameter => self.parameter_tokens += 1,
            TokenClass::Comment => self.comment_tokens += 1,
            TokenClass::Whitespace => self.whitespace_tokens += 1,
            TokenClass::Special => {}
        }
        if token.kind == TokenKind::Unknown {
            self.unknown_tokens += 1;
        }

        if preferences.collect_detailed_metrics {
            *self.tokens_per_mode.entry(mode).or_insert(0) += 1;
        }
    }

    /// Tokens lexed while `mode` was active
    pub fn tokens_in_mode(&self, mode: Mode) -> usize {
        self.tokens_per_mode.get(&mode).copied().unwrap_or(0)
    }
}

/// Lexical analyzer producing token streams with metrics and diagnostics
pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
    diagnostics: Vec<LexerError>,
    logger: Option<Arc<LoggingService>>,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
            diagnostics: Vec::new(),
            logger: None,
        }
    }

    /// Send events to `logger` instead of the global logger
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Tokenize a query into a stream, hidden tokens included
    ///
    /// Unrecognized input never fails the run; it is recorded in
    /// `diagnostics()` and logged. Only the size limits return an error.
    pub fn analyze(&mut self, source: &str) -> Result<TokenStream, LexerError> {
        // Reset state for this run
        self.metrics = LexicalMetrics::default();
        self.diagnostics.clear();

        if source.len() > MAX_INPUT_SIZE {
            let error = LexerError::InputTooLarge { size: source.len() };
            self.report(
                LogEvent::error(error.error_code(), "Query exceeds input size limit")
                    .with_context("size", &source.len().to_string())
                    .with_context("limit", &MAX_INPUT_SIZE.to_string()),
            );
            return Err(error);
        }

        log_debug!("Starting lexical analysis",
            "bytes" => source.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let started = Instant::now();
        let mut tokenizer = Tokenizer::new(source);
        let mut tokens = Vec::new();

        loop {
            let mode = tokenizer.mode();
            let token = tokenizer.next_token();

            // SECURITY: cap the stream size, EOF included
            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexerError::TooManyTokens {
                    count: tokens.len() + 1,
                };
                self.report(
                    LogEvent::error(error.error_code(), "Token limit exceeded")
                        .with_span(token.span)
                        .with_context("limit", &MAX_TOKEN_COUNT.to_string()),
                );
                return Err(error);
            }

            if self.preferences.trace_mode_transitions && tokenizer.mode() != mode {
                self.report(
                    LogEvent::debug("Mode transition")
                        .with_span(token.span)
                        .with_context("from", mode.name())
                        .with_context("to", tokenizer.mode().name())
                        .with_context("token", token.kind.symbolic_name()),
                );
            }

            if token.is_unknown() {
                self.record_unrecognized(&token, mode);
            }

            self.metrics.record_token(&token, mode, &self.preferences);
            let finished = token.is_eof();
            tokens.push(token);
            if finished {
                break;
            }
        }

        let stack = tokenizer.mode_stack();
        self.metrics.max_mode_depth = stack.max_depth_reached();
        self.metrics.dropped_mode_pushes = stack.dropped_pushes();
        if stack.dropped_pushes() > 0 {
            self.report(
                LogEvent::warning_with_code(
                    codes::lexical::MODE_STACK_OVERFLOW,
                    "Mode stack limit reached; pushes were dropped",
                )
                .with_context("dropped", &stack.dropped_pushes().to_string())
                .with_context("limit", &MAX_MODE_DEPTH.to_string()),
            );
        }

        self.report(
            LogEvent::success(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed")
                .with_context("tokens", &tokens.len().to_string())
                .with_context("significant", &self.metrics.significant_tokens.to_string())
                .with_context("unknown", &self.metrics.unknown_tokens.to_string()),
        );

        if crate::logging::config::log_performance_events() {
            let elapsed = started.elapsed();
            self.report(
                LogEvent::success(codes::success::LEXICAL_THROUGHPUT, "Lexer throughput")
                    .with_context("bytes", &source.len().to_string())
                    .with_context("tokens", &tokens.len().to_string())
                    .with_context("elapsed_us", &elapsed.as_micros().to_string()),
            );
        }

        Ok(TokenStream::with_source_map(
            tokens,
            SourceMap::new(source.to_string()),
        ))
    }

    fn record_unrecognized(&mut self, token: &Token, mode: Mode) {
        if self.diagnostics.len() >= MAX_REPORTED_DIAGNOSTICS {
            return;
        }
        let error = LexerError::unrecognized(token, mode);

        if self.preferences.log_unrecognized_input {
            let message = if self.preferences.include_position_in_errors {
                error.to_string()
            } else {
                "Unrecognized input".to_string()
            };
            self.report(
                LogEvent::warning_with_code(error.error_code(), &message)
                    .with_span(token.span)
                    .with_context("text", &token.text)
                    .with_context("mode", mode.name()),
            );
        }
        self.diagnostics.push(error);
    }

    fn report(&self, event: LogEvent) {
        match &self.logger {
            Some(logger) => logger.log_event(event),
            None => crate::logging::dispatch(event),
        }
    }

    /// Unrecognized input found by the last run, in source order
    pub fn diagnostics(&self) -> &[LexerError] {
        &self.diagnostics
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
