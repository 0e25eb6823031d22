pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod schema;
pub mod startup;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use db::{Database, StoreOptions};
pub use error::{Error, RowError, RowProblem};
pub use loader::{LoadReport, LoadWarning, Loader, TableReport};
pub use model::{Event, EventPatch, NewEvent, Region, RegionPatch};
