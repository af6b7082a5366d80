//! Structured logging for the ES|QL lexer
//!
//! Events carry a stable [`Code`], an optional source span, and key/value
//! context. A process-wide [`LoggingService`] receives them once
//! [`init_global_logging`] has run; before that every macro is a no-op.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, Logger, LoggingService, MemoryLogger, MultiLogger,
    StructuredLogger,
};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let logging_service = Arc::new(LoggingService::with_config());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    for code in [
        codes::lexical::UNRECOGNIZED_INPUT,
        codes::lexical::TOO_MANY_TOKENS,
        codes::success::TOKENIZATION_COMPLETE,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for code: {}", code));
        }
    }

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Installed global logger, if any
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Send an event to the global logger if one is installed
pub fn dispatch(event: LogEvent) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_without_logger_is_noop() {
        if try_get_global_logger().is_none() {
            dispatch(LogEvent::error(codes::system::INTERNAL_ERROR, "nobody listening"));
        }
    }

    #[test]
    fn test_global_logger_installs_once() {
        let first = init_global_logging();
        assert!(try_get_global_logger().is_some());
        if first.is_ok() {
            assert!(init_global_logging().is_err());
        }
        dispatch(LogEvent::debug("delivered to the configured loggers"));
    }
}
