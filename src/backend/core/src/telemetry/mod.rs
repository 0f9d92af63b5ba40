//! Telemetry: structured logging for the authorization core and its tools.
//!
//! # Example
//!
//! ```rust,no_run
//! use orgguard_core::telemetry::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::default()).expect("Failed to initialize logging");
//! ```

pub mod logging;

pub use logging::{build_filter, init_logging, LogFormat, LoggingConfig};
