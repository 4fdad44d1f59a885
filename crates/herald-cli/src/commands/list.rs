//! Inspect notifications on a running server.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::client::{HeraldClient, DEFAULT_SERVER_URL};
use crate::output;

#[derive(Args)]
pub struct ListArgs {
    /// Show a single notification by ID
    #[arg(long)]
    pub id: Option<String>,

    /// Server URL
    #[arg(long, env = "HERALD_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,
}

pub async fn execute(args: ListArgs) -> Result<()> {
    let client = HeraldClient::new(&args.url)?;

    match args.id {
        Some(id) => match client.get(&id).await? {
            Some(notification) => output::print_notification(&notification),
            None => println!("{} Notification not found: {}", "✗".red().bold(), id.dimmed()),
        },
        None => {
            let notifications = client.list().await?;
            output::print_notifications_table(&notifications);
        }
    }

    Ok(())
}
