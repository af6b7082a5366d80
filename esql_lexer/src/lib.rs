//! Multi-mode lexer for ES|QL pipeline queries
//!
//! Turns a query such as `FROM logs | WHERE status >= 500` into typed tokens
//! with byte spans and line/column positions. Whitespace and comments are
//! kept on a hidden channel, so concatenating token texts reproduces the
//! input exactly.
//!
//! ```
//! use esql_lexer::{tokenize, TokenKind};
//!
//! let kinds: Vec<_> = tokenize("ROW a = 1").map(|t| t.kind).collect();
//! assert_eq!(kinds.first(), Some(&TokenKind::Row));
//! ```

// Internal modules
pub mod config;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use lexical::{
    tokenize, tokenize_all, LexerError, LexicalAnalyzer, LexicalMetrics, Mode, Tokenizer,
};
pub use tokens::{Channel, Token, TokenKind, TokenStream};
pub use utils::{Position, Span};
