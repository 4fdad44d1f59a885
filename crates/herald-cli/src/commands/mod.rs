//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod list;
pub mod send;
pub mod serve;

/// Herald - notification broadcasting over HTTP and WebSocket
#[derive(Parser)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the notification server
    Serve(serve::ServeArgs),

    /// Create a notification on a running server
    Send(send::SendArgs),

    /// List notifications on a running server
    List(list::ListArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args).await,
            Commands::Send(args) => send::execute(args).await,
            Commands::List(args) => list::execute(args).await,
        }
    }
}
