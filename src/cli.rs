use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "paralympics-db")]
#[command(version, about = "Seed and query the paralympics SQLite database")]
pub struct Cli {
    /// Instance directory holding the database and config.toml
    #[arg(long, global = true, env = "PARALYMPICS_INSTANCE_DIR")]
    pub instance_dir: Option<PathBuf>,

    /// SQLite database path (overrides config.toml)
    #[arg(long, global = true, env = "PARALYMPICS_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the tables if they do not exist
    Init,

    /// Create the tables and load any empty ones from CSV
    Seed {
        /// Region CSV (NOC, region, notes)
        #[arg(short, long)]
        regions: Option<PathBuf>,

        /// Event CSV (16 columns)
        #[arg(short, long)]
        events: Option<PathBuf>,
    },

    /// Query regions
    Regions {
        #[command(subcommand)]
        action: RegionAction,
    },

    /// Query events
    Events {
        #[command(subcommand)]
        action: EventAction,
    },

    /// List all table names
    ListTables,
}

#[derive(Subcommand, Debug)]
pub enum RegionAction {
    /// Print all regions as JSON
    List,
    /// Print one region as JSON
    Get(RegionKey),
}

#[derive(Args, Debug)]
pub struct RegionKey {
    /// Three-letter NOC code
    pub noc: String,
}

#[derive(Subcommand, Debug)]
pub enum EventAction {
    /// Print all events as JSON
    List {
        /// Only events hosted by this NOC
        #[arg(long)]
        noc: Option<String>,
    },
    /// Print one event as JSON
    Get {
        id: i64,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
