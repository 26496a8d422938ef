//! Automation Engine: a small JSON HTTP service used to demonstrate a CI/CD
//! pipeline.
//!
//! Every response is wrapped in the same envelope:
//!
//! ```text
//! {
//!   "success": true,            // false iff data has an "error" key
//!   "data": { ... },
//!   "timestamp": "2024-01-01T00:00:00.000000Z"
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: HTTP routes, handlers and the response envelope
//! - [`metrics`]: Request counters and latency histograms
//! - [`utils`]: Validation, sanitization and uptime helpers

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, AppError, Result};
