//! Ruchulu CLI: the main entry point.
//!
//! Commands:
//! - `serve`   Start the HTTP gateway
//! - `ask`     Ask the Genie once, in-process
//! - `status`  Show configuration and the selected provider path
//! - `init`    Write a default config file

use clap::{Parser, Subcommand};
use ruchulu_config::DeploymentMode;

mod commands;

#[derive(Parser)]
#[command(
    name = "ruchulu",
    about = "Ruchulu, the Food Genie for an Andhra kitchen",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "RUCHULU_LOG_JSON")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the Genie a single question
    Ask {
        /// The diner's message
        #[arg(short, long)]
        message: String,

        /// Today's dishes as a JSON array, or a path to a JSON file
        #[arg(long)]
        menu: Option<String>,

        /// Override the deployment mode (server or client)
        #[arg(long)]
        mode: Option<DeploymentMode>,

        /// Print the reply as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask {
            message,
            menu,
            mode,
            json,
        } => commands::ask::run(message, menu, mode, json).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Init => commands::init::run().await?,
    }

    Ok(())
}
