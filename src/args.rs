use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cityscope_engine::SortKey;

/// CLI arguments for cityscope
#[derive(Debug, Parser)]
#[command(
    name = "cityscope",
    version,
    about = "Browse the world's cities and check the weather in any of them"
)]
pub struct CliArgs {
    /// Config file (default: <config dir>/cityscope/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive shell (default)
    Shell {
        /// Path to open first, e.g. / or /weather/Paris
        #[arg(default_value = "/")]
        route: String,
    },

    /// Print the city table
    List {
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only cities in this country (exact)
        #[arg(long, default_value = "")]
        country: String,

        /// Only cities in this timezone (exact)
        #[arg(long, default_value = "")]
        timezone: String,

        /// Column header clicks, applied in order (name, country, timezone)
        #[arg(long = "sort")]
        sort: Vec<SortKey>,

        /// Maximum pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },

    /// Print search suggestions for a query
    Suggest {
        query: String,
    },

    /// Print current weather for a city
    Weather {
        city: String,
    },
}
