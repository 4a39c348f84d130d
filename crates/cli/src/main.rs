//! Lengthwise CLI: the main entry point.
//!
//! Commands:
//! - `onboard`  Write a starter config file
//! - `gateway`  Start the HTTP API server
//! - `rewrite`  Rewrite a draft to a target length
//! - `drag`     Replay panel heights and rewrite on each settled size
//! - `count`    Count words the way the gateway does
//! - `status`   Show configuration and backend reachability
//! - `doctor`   Diagnose setup problems

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lengthwise",
    about = "Lengthwise — rewrite text to an exact length with an LLM",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file
    Onboard,

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Rewrite a draft via the gateway
    Rewrite(commands::rewrite::RewriteArgs),

    /// Read panel heights from stdin and rewrite once each resize settles
    Drag(commands::drag::DragArgs),

    /// Count words and estimate tokens
    Count {
        /// Read from a file instead of stdin
        #[arg(short, long)]
        file: Option<std::path::PathBuf>,

        /// Print the word target for a panel height instead
        #[arg(long)]
        height: Option<u32>,
    },

    /// Show configuration and backend reachability
    Status,

    /// Diagnose setup problems
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so rewritten text on stdout stays clean.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Rewrite(args) => commands::rewrite::run(args).await?,
        Commands::Drag(args) => commands::drag::run(args).await?,
        Commands::Count { file, height } => commands::count::run(file, height).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
