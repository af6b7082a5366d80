//! Multi-mode lexical analysis for ES|QL queries
//!
//! Each command keyword moves the tokenizer into a mode with its own rule
//! table. `tokenize` is the total, lazy entry point; `LexicalAnalyzer` adds
//! size limits, metrics, and logging on top of it.

pub mod analyzer;
pub mod modes;
pub mod recognizers;
pub mod rules;
pub mod tokenizer;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::{validation, TokenClass, TokenStream};

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics};
pub use modes::{Mode, ModeAction, ModeStack};
pub use recognizers::Recognizer;
pub use rules::{rules_for, Rule};
pub use tokenizer::{tokenize, tokenize_all, Tokenizer};

// ============================================================================
// MODULE API
// ============================================================================

/// Create a new lexical analyzer with default preferences
pub fn create_analyzer() -> LexicalAnalyzer {
    LexicalAnalyzer::new()
}

/// Create analyzer with custom runtime preferences
pub fn create_analyzer_with_preferences(preferences: LexicalPreferences) -> LexicalAnalyzer {
    LexicalAnalyzer::with_preferences(preferences)
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Check that every lexical code is registered and the limits are usable
pub fn init_lexical_analysis_logging() -> Result<(), String> {
    let lexical_codes = [
        codes::lexical::UNRECOGNIZED_INPUT,
        codes::lexical::INPUT_TOO_LARGE,
        codes::lexical::MODE_STACK_OVERFLOW,
        codes::lexical::UNEXPECTED_TOKEN,
        codes::lexical::UNEXPECTED_END_OF_STREAM,
        codes::lexical::COVERAGE_VIOLATION,
        codes::lexical::TOO_MANY_TOKENS,
    ];

    for code in &lexical_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "Lexical error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    if MAX_INPUT_SIZE == 0 || MAX_TOKEN_COUNT == 0 || MAX_MODE_DEPTH == 0 {
        return Err("Lexical limits cannot be zero".to_string());
    }

    crate::log_debug!("Lexical security limits initialized",
        "max_input_size" => MAX_INPUT_SIZE,
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_mode_depth" => MAX_MODE_DEPTH,
        "max_reported_diagnostics" => MAX_REPORTED_DIAGNOSTICS
    );

    Ok(())
}

/// Verify that a stream tiles `source` exactly and ends with EOF
pub fn validate_tokenization(stream: &TokenStream, source: &str) -> Result<(), String> {
    match validation::validate_coverage(stream, source) {
        Ok(()) => {
            crate::log_success!(
                codes::success::LEXICAL_VALIDATION_PASSED,
                "Token stream covers source",
                "tokens" => stream.all_tokens().len()
            );
            Ok(())
        }
        Err(message) => {
            crate::log_error!(codes::lexical::COVERAGE_VIOLATION, &message,
                "bytes" => source.len()
            );
            Err(message)
        }
    }
}

/// Get the current compile-time security limits (for reporting/debugging)
pub fn get_security_limits() -> SecurityLimits {
    SecurityLimits {
        max_input_size: MAX_INPUT_SIZE,
        max_token_count: MAX_TOKEN_COUNT,
        max_mode_depth: MAX_MODE_DEPTH,
        max_reported_diagnostics: MAX_REPORTED_DIAGNOSTICS,
    }
}

/// Information about compile-time security limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityLimits {
    pub max_input_size: usize,
    pub max_token_count: usize,
    pub max_mode_depth: usize,
    pub max_reported_diagnostics: usize,
}

impl SecurityLimits {
    /// Whether an input of `bytes` would be accepted by the analyzer
    pub fn accepts_input(&self, bytes: usize) -> bool {
        bytes <= self.max_input_size
    }
}

// ============================================================================
// TOKEN DISTRIBUTION
// ============================================================================

/// Count tokens of a stream by class
pub fn get_token_counts(token_stream: &TokenStream) -> TokenCounts {
    let mut counts = TokenCounts::default();

    for token in token_stream.all_tokens().iter().filter(|t| !t.is_eof()) {
        counts.total += 1;
        if token.is_unknown() {
            counts.unknown += 1;
            continue;
        }
        match token.kind.token_class() {
            TokenClass::Keyword => counts.keywords += 1,
            TokenClass::Identifier => counts.identifiers += 1,
            TokenClass::Literal => counts.literals += 1,
            TokenClass::Operator => counts.operators += 1,
            TokenClass::Punctuation => counts.punctuation += 1,
            TokenClass::Parameter => counts.parameters += 1,
            TokenClass::Comment => counts.comments += 1,
            TokenClass::Whitespace => counts.whitespace += 1,
            TokenClass::Special => {}
        }
    }

    counts
}

/// Token distribution of one stream, `EOF` excluded
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenCounts {
    pub total: usize,
    pub keywords: usize,
    pub identifiers: usize,
    pub literals: usize,
    pub operators: usize,
    pub punctuation: usize,
    pub parameters: usize,
    pub comments: usize,
    pub whitespace: usize,
    pub unknown: usize,
}

impl TokenCounts {
    /// Get count of significant tokens (excluding whitespace and comments)
    pub fn significant_tokens(&self) -> usize {
        self.total - self.whitespace - self.comments
    }

    /// Whether the stream holds anything besides trivia
    pub fn has_content(&self) -> bool {
        self.significant_tokens() > 0
    }

    pub fn is_within_security_limits(&self) -> bool {
        self.total < MAX_TOKEN_COUNT
    }
}
