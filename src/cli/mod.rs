//! CLI command handling module
//!
//! Handles all CLI subcommands and argument parsing.

mod commands;
mod graph;
mod logging;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use graph::{GraphArgs, run_graph};
pub use logging::init_logging;
pub use version::display_version;
