//! Seeds the `region` and `event` tables from CSV sources, once.
//!
//! Each table is handled in its own `BEGIN IMMEDIATE` transaction that spans
//! the row count, the parse, and every insert. Holding the write lock from the
//! count onwards means two initializers racing on the same database file
//! serialize: the second waits on the busy timeout, then sees rows and skips.
//!
//! Rows are fully parsed before the first insert, so a malformed row leaves
//! the table untouched.

mod report;

pub use report::{LoadReport, LoadWarning, TableReport};

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{info, warn};

use crate::db::schema_gen::generate_insert;
use crate::db::{count_rows_in, Database};
use crate::error::{Error, Result, RowError};
use crate::model::{Event, Region};
use crate::parser::{read_rows, RawRow, SeedRecord, SqlValue};

pub struct Loader<'a> {
    db: &'a mut Database,
}

impl<'a> Loader<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Seed both tables. Regions load first so the event foreign-key audit
    /// sees them. A per-table failure lands in the report; only storage and
    /// source I/O failures are returned as errors.
    pub fn load<R: Read, E: Read>(&mut self, regions: R, events: E) -> Result<LoadReport> {
        let conn = self.db.connection_mut();

        let regions = seed_table::<Region, _, _>(conn, regions, |_, _| Ok(Vec::new()))?;
        let events = seed_table::<Event, _, _>(conn, events, audit_event_nocs)?;

        Ok(LoadReport { regions, events })
    }

    /// Seed both tables from CSV files on disk
    pub fn load_files(&mut self, region_path: &Path, event_path: &Path) -> Result<LoadReport> {
        let regions = open_source(region_path, "region")?;
        let events = open_source(event_path, "event")?;
        self.load(regions, events)
    }
}

fn open_source(path: &Path, table: &'static str) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::Source {
            table,
            source: csv::Error::from(e),
        })
}

fn seed_table<T, R, A>(conn: &mut Connection, source: R, audit: A) -> Result<TableReport>
where
    T: SeedRecord,
    R: Read,
    A: FnOnce(&Transaction, &[T]) -> rusqlite::Result<Vec<LoadWarning>>,
{
    let schema = T::schema();
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = count_rows_in(&tx, schema)?;
    if existing > 0 {
        info!(table = schema.name, existing, "table already populated, skipping");
        return Ok(TableReport::skipped(schema.name, existing));
    }

    info!(table = schema.name, "loading table");
    let rows = read_rows(source, schema.name)?;

    let records = match parse_all::<T>(&rows) {
        Ok(records) => records,
        Err(err) => {
            warn!(table = schema.name, error = %err, "load aborted, rolling back");
            return Ok(TableReport::failed(schema.name, err));
        }
    };

    let warnings = audit(&tx, &records)?;
    for warning in &warnings {
        warn!(table = schema.name, "{}", warning);
    }

    if let Err(e) = insert_batch(&tx, &generate_insert(schema), &records) {
        return match constraint_violation(schema.name, e) {
            Ok(err) => {
                warn!(table = schema.name, error = %err, "load aborted, rolling back");
                Ok(TableReport::failed(schema.name, err))
            }
            Err(e) => Err(e.into()),
        };
    }

    tx.commit()?;
    info!(table = schema.name, rows = records.len(), "table loaded");

    Ok(TableReport::loaded(schema.name, records.len(), warnings))
}

/// Convert every row, stopping at the first bad one
fn parse_all<T: SeedRecord>(rows: &[RawRow]) -> Result<Vec<T>, RowError> {
    let table = T::schema().name;
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut records = Vec::with_capacity(rows.len());

    for raw in rows {
        let record = T::parse(raw).map_err(|problem| RowError::MalformedRow {
            table,
            row: raw.row,
            problem,
        })?;

        if let Some(key) = record.natural_key() {
            if seen.insert(key.to_string(), raw.row).is_some() {
                return Err(RowError::DuplicateKey {
                    table,
                    row: raw.row,
                    key: key.to_string(),
                });
            }
        }

        records.push(record);
    }

    Ok(records)
}

/// Insert rows through one cached statement
fn insert_batch<T: SeedRecord>(
    tx: &Transaction,
    sql: &str,
    batch: &[T],
) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare_cached(sql)?;

    for record in batch {
        let values: Vec<SqlValue> = record.values();
        for (idx, value) in values.iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        stmt.raw_execute()?;
    }

    Ok(())
}

/// Split store errors into constraint violations (reported) and the rest (fatal).
/// Parsing already rejects duplicate keys and empty required fields, so a
/// violation here comes from a constraint added to the store outside the
/// declared schema.
fn constraint_violation(
    table: &'static str,
    err: rusqlite::Error,
) -> std::result::Result<RowError, rusqlite::Error> {
    match err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == ErrorCode::ConstraintViolation =>
        {
            Ok(RowError::Constraint {
                table,
                message: message.unwrap_or_else(|| code.to_string()),
            })
        }
        other => Err(other),
    }
}

fn audit_event_nocs(tx: &Transaction, events: &[Event]) -> rusqlite::Result<Vec<LoadWarning>> {
    let referenced: BTreeSet<&str> = events
        .iter()
        .map(|e| e.fields.noc.as_str())
        .filter(|noc| !noc.is_empty())
        .collect();

    let mut unknown = BTreeSet::new();
    {
        let mut stmt = tx.prepare("SELECT 1 FROM \"region\" WHERE \"NOC\" = ?1")?;
        for noc in referenced {
            let found: Option<i64> = stmt.query_row([noc], |row| row.get(0)).optional()?;
            if found.is_none() {
                unknown.insert(noc);
            }
        }
    }

    Ok(events
        .iter()
        .filter(|e| unknown.contains(e.fields.noc.as_str()))
        .map(|e| LoadWarning::ForeignKeyIgnored {
            row: e.id as usize,
            noc: e.fields.noc.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_reports_duplicate_key() {
        let rows = vec![
            RawRow::new(1, ["USA", "United States", ""]),
            RawRow::new(2, ["GBR", "UK", ""]),
            RawRow::new(3, ["USA", "America", ""]),
        ];
        let err = parse_all::<Region>(&rows).unwrap_err();
        assert_eq!(
            err,
            RowError::DuplicateKey {
                table: "region",
                row: 3,
                key: "USA".into()
            }
        );
    }

    #[test]
    fn test_parse_all_stops_at_first_malformed_row() {
        let rows = vec![
            RawRow::new(1, ["USA", "United States", ""]),
            RawRow::new(2, ["GBR", ""]),
            RawRow::new(3, ["", "Nowhere", ""]),
        ];
        let err = parse_all::<Region>(&rows).unwrap_err();
        assert_eq!(err.row(), Some(2));
    }

    #[test]
    fn test_constraint_violation_split() {
        let mut db = Database::open_in_memory().unwrap();
        db.ensure_schema().unwrap();
        let conn = db.connection_mut();
        conn.execute("INSERT INTO region VALUES ('USA', 'United States', NULL)", [])
            .unwrap();
        let err = conn
            .execute("INSERT INTO region VALUES ('USA', 'America', NULL)", [])
            .unwrap_err();
        assert!(matches!(
            constraint_violation("region", err),
            Ok(RowError::Constraint { table: "region", .. })
        ));
        assert!(constraint_violation("region", rusqlite::Error::InvalidQuery).is_err());
    }
}
