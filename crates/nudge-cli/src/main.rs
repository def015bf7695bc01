use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nudge", version, about = "Nudge notification engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a notification candidate
    Score {
        #[command(subcommand)]
        action: commands::score::ScoreAction,
    },
    /// Evaluate a user context against the gate and rules
    Context {
        #[command(subcommand)]
        action: commands::context::ContextAction,
    },
    /// Inspect and maintain learned timing models
    Timing {
        #[command(subcommand)]
        action: commands::timing::TimingAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NUDGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Score { action } => commands::score::run(action),
        Commands::Context { action } => commands::context::run(action),
        Commands::Timing { action } => commands::timing::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
