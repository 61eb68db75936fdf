//! CLI module for Pixboard
//!
//! Provides commands:
//! - `init`: Create the data directory, database and `.env`
//! - `add`: Create a canvas
//! - `list`: Print every canvas
//! - `serve`: Start the HTTP server

use clap::{ArgAction, Parser, Subcommand};

pub mod canvas;
pub mod init;

/// Pixboard CLI
#[derive(Parser, Debug)]
#[command(name = "pixboard")]
#[command(about = "Shared pixel canvases with replayable history")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory, database and .env file
    Init,
    /// Create a canvas
    Add {
        /// Unique canvas name
        name: String,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Record an edit log for the history animation
        #[arg(value_parser = clap::builder::BoolishValueParser::new(), action = ArgAction::Set)]
        history: bool,
        /// Initial color of every pixel
        #[arg(long, value_name = "HEX")]
        fill: Option<String>,
    },
    /// List canvases
    List,
    /// Start the server
    Serve,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run().await,
        Some(Commands::Add {
            name,
            width,
            height,
            history,
            fill,
        }) => canvas::add(name, width, height, history, fill).await,
        Some(Commands::List) => canvas::list().await,
        Some(Commands::Serve) => crate::server::run().await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
