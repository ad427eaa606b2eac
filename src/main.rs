//! Workboard MCP Server - Main Entry Point
//!
//! The actual implementation is in the `workboard` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use workboard::{Config, WorkboardServerHandler};

/// Workboard MCP Server - projects, tasks, attendance and time tracking via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database (created if missing)
    database: PathBuf,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML snapshot written after every change
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Commit the snapshot with git on save and push on shutdown
    #[arg(long)]
    sync_git: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.database = self.database;
        if self.snapshot.is_some() {
            config.snapshot = self.snapshot;
        }
        config.sync_git |= self.sync_git;
        Ok(config)
    }
}

/// Log to stderr; stdout carries the MCP stream
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let config = Args::parse().into_config()?;
    init_tracing(&config.log_level);
    tracing::info!(database = %config.database.display(), "starting workboard MCP server");

    let handler = WorkboardServerHandler::new(config)?;
    serve_stdio(handler).await?;
    Ok(())
}
