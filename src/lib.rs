//! Configuration for HTTP request metrics middleware, shared between the binary and tests.

pub mod config;
pub mod error;
pub mod metrics;
pub mod utils;

pub use error::{Error, Result};
pub use metrics::{MetricsOptions, MetricsSettings};
