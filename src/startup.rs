use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::loader::{LoadReport, Loader};

/// Open the configured store and make sure both tables exist.
/// Any failure here is fatal to startup.
pub fn open_store(config: &Config) -> Result<Database> {
    let mut db = Database::open(&config.database, &config.store_options())?;
    db.ensure_schema()?;
    Ok(db)
}

/// Open the store, then seed any empty tables from the configured CSV files
pub fn seed(config: &Config) -> Result<(Database, LoadReport)> {
    let mut db = open_store(config)?;
    info!(
        regions = %config.regions_csv.display(),
        events = %config.events_csv.display(),
        "seeding database"
    );
    let report = Loader::new(&mut db).load_files(&config.regions_csv, &config.events_csv)?;
    Ok((db, report))
}
