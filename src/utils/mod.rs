pub mod config;
pub mod logger;
pub mod pipegrep_toml;

pub use config::*;
pub use logger::setup_logging;
pub use pipegrep_toml::{PipegrepToml, apply_file_to_config, load_pipegrep_toml};
