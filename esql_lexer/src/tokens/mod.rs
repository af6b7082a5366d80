//! Token vocabulary and token stream for ES|QL lexical analysis
//!
//! Every token records its kind, exact source text, span, and channel.
//! Whitespace and comments travel on the hidden channel so the stream can
//! be fed to a parser while still reproducing the original query text.

pub mod token;
pub mod token_stream;

pub use token::{Channel, Token, TokenClass, TokenKind};
pub use token_stream::{validation, TokenStream, TokenStreamError};

pub use crate::utils::{Position, SourceMap, Span};
