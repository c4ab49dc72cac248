//! Utility modules

mod logger;

pub use logger::{init_logging, parse_level};
