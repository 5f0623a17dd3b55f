//! Utility modules for common functionality.
//!
//! - http: HTTP client utilities (i.e. creation of retryable HTTP clients)
//! - logging: Logging setup and the error context shared by every error type
//! - metrics: Prometheus counters for provider attempts and rate refreshes
//! - tests: Test utilities

pub mod http;
pub mod logging;
pub mod metrics;
pub mod tests;

pub use http::*;
