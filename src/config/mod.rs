//! JSON configuration for the command-line tool.
pub mod analyze;

pub use analyze::{load_config, OutputConfig, OutputFormat, RuntimeConfig};
