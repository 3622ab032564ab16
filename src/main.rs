//! quire - a small personal blog server.

mod cli;
mod config;
mod core;
mod feed;
mod logger;
mod post;
mod site;
mod store;
mod template;
mod utils;
mod watch;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let mut config = SiteConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    config.apply_cli(&cli);

    match &cli.command {
        Commands::Serve { .. } => {
            core::setup_shutdown_handler()?;
            cli::serve::serve(&config)
        }
        Commands::Check { json } => cli::check::check_posts(&config, *json),
        Commands::Feed => cli::feed::print_feed(&config),
    }
}
