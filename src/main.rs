mod cli;
mod tui;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::warn;

use cli::args::{Cli, Commands};
use cli::handlers;
use waqt::config::AppConfig;
use waqt::db;
use waqt::prayer_times::build_resolver;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB (migrations run on every startup)
    AppConfig::ensure_data_dir()?;
    let conn = db::open(&AppConfig::db_path()?)?;
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Config { action }) => {
            handlers::handle_config(&conn, config, &action)?;
        }
        Some(Commands::Qibla) => {
            handlers::handle_qibla(&config);
        }
        Some(Commands::Times { json }) => {
            let mut resolver = build_resolver(&config, conn, today)?;
            handlers::handle_times(&mut resolver, &config, json)?;
        }
        Some(Commands::Next) => {
            let mut resolver = build_resolver(&config, conn, today)?;
            handlers::handle_next(&mut resolver, &config);
        }
        Some(Commands::Cache { action }) => {
            let resolver = build_resolver(&config, conn, today)?;
            handlers::handle_cache(&resolver, &action)?;
        }

        // No subcommand → launch TUI
        None => {
            let resolver = build_resolver(&config, conn, today)?;
            // Warm the cache for the week so day rollover doesn't depend on the provider
            if let Err(e) = resolver.inner().ensure_cached(today, 7) {
                warn!("could not pre-cache schedules: {:#}", e);
            }
            tui::app::run(resolver, config)?;
        }
    }

    Ok(())
}
