pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "scoring")]
#[command(about = "Scoring API - method gateway server and tools")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP method gateway")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Print the token expected for a login at the current hour")]
    Token(commands::token::TokenArgs),

    #[command(about = "Call a method on a running server with a computed token")]
    Call(commands::call::CallArgs),

    #[command(about = "Build an HTML report from the latest nginx access log")]
    Analyze(commands::analyze::AnalyzeArgs),
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
    let mut config = AppConfig::from_env();

    if let Commands::Serve(args) = &cli.command {
        args.apply(&mut config);
    }
    crate::logging::init(&config.server)?;

    match cli.command {
        Commands::Serve(_) => commands::serve::handle(config).await,
        Commands::Token(args) => commands::token::handle(args, &config, output_format),
        Commands::Call(args) => commands::call::handle(args, &config, output_format).await,
        Commands::Analyze(args) => commands::analyze::handle(args, output_format),
    }
}
