//! kubectl-graph - print the Kubernetes objects related to one object
//!
//! Installed on the PATH it works as a kubectl plugin:
//!
//! ```text
//! kubectl graph svc my-service
//! kubectl graph deploy my-app --dot | dot -Tsvg > my-app.svg
//! ```

mod cli;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use cli::{ConfigSubcommand, GraphArgs};

/// Print a tree or DOT graph of the Kubernetes objects related to an object
#[derive(Parser, Debug)]
#[command(name = "kubectl-graph", version)]
#[command(about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(flatten)]
    graph: GraphArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    cli::init_logging(args.verbose);

    match args.command {
        Some(Command::Config { subcommand }) => cli::handle_config_command(subcommand),
        Some(Command::Version) => {
            cli::display_version();
            Ok(())
        }
        None => cli::run_graph(args.graph).await,
    }
}
