//! Logging macros taking `"key" => value` context pairs
//!
//! Values only need `Display`. Every macro builds one [`LogEvent`] and hands
//! it to [`dispatch`], so nothing is printed until a global logger exists.
//!
//! [`LogEvent`]: crate::logging::LogEvent
//! [`dispatch`]: crate::logging::dispatch

/// Attach context pairs to an event and dispatch it
#[doc(hidden)]
#[macro_export]
macro_rules! __dispatch_with_context {
    ($event:expr $(, $key:expr => $value:expr)*) => {{
        #[allow(unused_mut)]
        let mut event = $event;
        $(
            event = event.with_context($key, &::std::string::ToString::to_string(&$value));
        )*
        $crate::logging::dispatch(event)
    }};
}

/// Log an error under a lexical or system code
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)*) => {
        $crate::__dispatch_with_context!(
            $crate::logging::LogEvent::error($code, $message).with_span($span)
            $(, $key => $value)*
        )
    };

    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__dispatch_with_context!(
            $crate::logging::LogEvent::error($code, $message) $(, $key => $value)*
        )
    };
}

/// Log a completed step under a success code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__dispatch_with_context!(
            $crate::logging::LogEvent::success($code, $message) $(, $key => $value)*
        )
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__dispatch_with_context!(
            $crate::logging::LogEvent::info($message) $(, $key => $value)*
        )
    };
}

/// Log a warning, with `code = ...` when one applies
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__dispatch_with_context!(
            $crate::logging::LogEvent::warning_with_code($code, $message) $(, $key => $value)*
        )
    };

    ($message:expr $(, $key:expr => $value:expr)*) => {
        $crate::__dispatch_with_context!(
            $crate::logging::LogEvent::warning($message) $(, $key => $value)*
        )
    };
}

/// Log a debug message; context is only rendered when debug output is on
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)*) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::__dispatch_with_context!(
                $crate::logging::LogEvent::debug($message) $(, $key => $value)*
            );
        }
    };
}
