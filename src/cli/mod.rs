pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER: &str = "http://localhost:5000";

#[derive(Parser)]
#[command(name = "finrecon")]
#[command(about = "FinRecon360 CLI - Command-line client for the FinRecon360 API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "FINRECON_SERVER",
        default_value = DEFAULT_SERVER,
        help = "Base URL of the FinRecon360 API"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout, registration and password recovery")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Show the dashboard summary for the logged-in user")]
    Dashboard,

    #[command(about = "View and manage your own profile")]
    Profile {
        #[command(subcommand)]
        cmd: commands::profile::ProfileCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = normalize_server(&cli.server)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &server, output_format).await,
        Commands::Dashboard => commands::dashboard::handle(&server, output_format).await,
        Commands::Profile { cmd } => commands::profile::handle(cmd, &server, output_format).await,
    }
}

/// Validate `--server` and strip any trailing slash so session lookups match.
pub fn normalize_server(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", raw, e))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Server URL must use http or https: {}", raw);
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
