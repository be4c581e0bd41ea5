use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "waqt", version, author, about = "Prayer-time countdowns for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer times, statuses and countdown
    Times {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// One-line countdown to the next prayer
    Next,
    /// Show the Qibla bearing from the configured location
    Qibla,
    /// Inspect or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Manage the cached schedules
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set the location used for calculation and the Qibla
    Location {
        /// Display name, e.g. "Banjul"
        name: String,
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        /// UTC offset, e.g. "+5:30", "-4", "0"
        #[arg(long, allow_hyphen_values = true)]
        tz: Option<String>,
    },
    /// Set the calculation method (and optionally madhab)
    Method {
        /// One of the supported calculation methods, e.g. "MuslimWorldLeague"
        method: String,
        /// Hanafi or Shafi
        #[arg(long)]
        madhab: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Make sure today and the next N days are cached
    Refresh {
        #[arg(long, default_value = "7", value_parser = clap::value_parser!(u32).range(0..=366))]
        days: u32,
    },
    /// Remove every cached schedule
    Clear,
}
