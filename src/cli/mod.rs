pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "javelin")]
#[command(about = "Javelin CLI - operator tooling for the Javelin Security API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API root, e.g. http://localhost:5000/api")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Request a consultation meeting")]
    Book(commands::book::BookArgs),

    #[command(about = "Administrator accounts and inbox")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Load sample content into an empty database")]
    Seed,

    #[command(about = "Check API health")]
    Health,
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
    let url = cli.url.as_deref();

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, url, output_format).await,
        Commands::Book(args) => commands::book::handle(args, url, output_format).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, url, output_format).await,
        Commands::Seed => commands::seed::handle(output_format).await,
        Commands::Health => commands::health::handle(url, output_format).await,
    }
}
