//! cdd - terminal dashboard for Docker containers

use cdd_cli::commands;
use cdd_cli::logging::{self, LogTarget};
use cdd_config::GlobalConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cdd")]
#[command(author, version, about = "Terminal dashboard for Docker containers", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Docker socket path or URL, overriding docker.socket in the config
    #[arg(long, global = true, env = "CDD_DOCKER_SOCKET")]
    socket: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "CDD_CONFIG")]
    config: Option<PathBuf>,

    /// Log file (the dashboard logs to cdd.log in the data directory by default)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List containers once and exit
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // An explicit config must load; the default one falls back to defaults
    let config = match &cli.config {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: {}, using default configuration", e);
            GlobalConfig::default()
        }),
    };
    let level = logging::effective_level(&config, cli.verbose);

    match cli.command {
        None => {
            let path = match cli.log_file {
                Some(path) => path,
                None => logging::default_log_file()?,
            };
            logging::init(level, &LogTarget::File(path))?;
            tracing::info!("Starting dashboard");
            commands::dashboard(&config, cli.socket.as_deref()).await?;
        }
        Some(Commands::List { json }) => {
            let target = cli.log_file.map(LogTarget::File).unwrap_or(LogTarget::Stderr);
            logging::init(level, &target)?;
            let runtime = cdd_provider::connect(&config, cli.socket.as_deref()).await?;
            commands::list(&*runtime, json, &mut std::io::stdout()).await?;
        }
    }

    Ok(())
}
