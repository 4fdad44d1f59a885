//! Send a notification to a running server.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::client::{HeraldClient, DEFAULT_SERVER_URL};

#[derive(Args)]
pub struct SendArgs {
    /// Notification title
    pub title: String,

    /// Notification body
    #[arg(default_value = "")]
    pub body: String,

    /// Server URL
    #[arg(long, env = "HERALD_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,
}

pub async fn execute(args: SendArgs) -> Result<()> {
    let client = HeraldClient::new(&args.url)?;
    let notification = client.create(&args.title, &args.body).await?;

    println!(
        "{} Sent notification: {} ({})",
        "✓".green().bold(),
        notification.title.cyan(),
        notification.id.dimmed()
    );

    Ok(())
}
