//! Engine module: command-line surface and path helpers around the pipeline.

pub mod arg_parser;
pub mod cli;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{config_from_cli, constraint_from_arg, handle_parse_error, handle_run};
pub use tools::{display_path, path_relative_to, path_to_display_string};
