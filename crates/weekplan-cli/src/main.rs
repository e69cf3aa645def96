use std::io::{self, IsTerminal};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "weekplan", version, about = "Weekly activity planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User profiles
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Activity catalog
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Recurring fixed blocks
    Fixed {
        #[command(subcommand)]
        action: commands::fixed::FixedAction,
    },
    /// Generate a week of activity blocks for a user
    Generate(commands::generate::GenerateArgs),
    /// Generated blocks
    Blocks {
        #[command(subcommand)]
        action: commands::blocks::BlocksAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

/// Log to stderr; WEEKPLAN_LOG overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_env("WEEKPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Activity { action } => commands::activity::run(action),
        Commands::Fixed { action } => commands::fixed::run(action),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Blocks { action } => commands::blocks::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "weekplan", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
