//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use herald_core::HeraldConfig;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Config file (TOML)
    #[arg(short, long, env = "HERALD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "HERALD_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "HERALD_PORT")]
    pub port: Option<u16>,

    /// Live notifications buffered per push connection before it is dropped
    #[arg(long, env = "HERALD_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Socket write timeout in milliseconds
    #[arg(long, env = "HERALD_WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: Option<u64>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (implies --log, defaults to ./herald.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl ServeArgs {
    /// Load the config file and apply flag overrides on top.
    pub fn resolve_config(&self) -> Result<HeraldConfig> {
        let mut config = HeraldConfig::load(self.config.as_deref())?;

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(capacity) = self.queue_capacity {
            config.hub.queue_capacity = capacity;
        }
        if let Some(timeout) = self.write_timeout_ms {
            config.hub.write_timeout_ms = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    /// Where to write the log file, if file logging was requested.
    pub fn log_path(&self) -> Option<PathBuf> {
        match (&self.log_file, self.log) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(PathBuf::from("herald.log")),
            (None, false) => None,
        }
    }
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let addr = config.server.bind_addr();

    println!();
    println!("  {} {}", "Herald".cyan().bold(), "Notification Server".bold());
    println!();
    println!("  {}       http://{}/notifications", "API".green(), addr);
    println!("  {}  ws://{}/live", "WebSocket".green(), addr);
    println!("  {}    http://{}/health", "Health".green(), addr);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    herald_web::run_server(config).await?;

    Ok(())
}
