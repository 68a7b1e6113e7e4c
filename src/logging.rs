//! Logging shim.
//!
//! The router logs through crate-local macros so embedders pick the backend
//! with a feature flag: [`log`](https://docs.rs/log) (default) or
//! [`tracing`](https://docs.rs/tracing). Enable at most one of them; with
//! neither enabled the macros compile to nothing.
//!
//! | Level   | Used for                                              |
//! |---------|-------------------------------------------------------|
//! | `trace` | gesture phases, per-element binding decisions         |
//! | `debug` | load dispatch, stale completions, bound widget counts |
//! | `info`  | page transitions and completed renders                |
//! | `warn`  | fragments without a content region                    |
//! | `error` | failed fetches                                        |
//!
//! ```ignore
//! use hashnav::{debug_log, error_log, info_log};
//!
//! info_log!("Navigation '{}' -> '{}'", from, to);
//! debug_log!("Dispatching load #{} for '{}'", id, url);
//! error_log!("Failed to load page '{}': {}", page, err);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __hashnav_log {
    ($level:ident, $($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
    }};
}

/// Finest-grained diagnostics (gesture phases, binding decisions).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__hashnav_log!(trace, $($arg)*) };
}

/// Load dispatch and discard decisions.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__hashnav_log!(debug, $($arg)*) };
}

/// Page transitions.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__hashnav_log!(info, $($arg)*) };
}

/// Recoverable oddities, such as a fragment with no content region.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__hashnav_log!(warn, $($arg)*) };
}

/// Failed loads. The router keeps running after logging one.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__hashnav_log!(error, $($arg)*) };
}
