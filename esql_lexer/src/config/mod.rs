//! Configuration module for the ES|QL lexer
//! Compile-time limits come from the TOML profile processed by build.rs

// Include generated constants from build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, LexicalPreferences, LoggingPreferences, RuntimeConfig};
