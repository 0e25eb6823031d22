use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::model::{Region, RegionPatch};
use crate::parser::SeedRecord;
use crate::schema::REGION;

use super::schema_gen::{generate_insert, generate_select};

fn from_row(row: &Row) -> rusqlite::Result<Region> {
    Ok(Region {
        noc: row.get(0)?,
        region: row.get(1)?,
        notes: row.get(2)?,
    })
}

/// All regions ordered by NOC
pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Region>> {
    let sql = format!("{} ORDER BY \"NOC\"", generate_select(&REGION));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn get(conn: &Connection, noc: &str) -> rusqlite::Result<Option<Region>> {
    let sql = format!("{} WHERE \"NOC\" = ?1", generate_select(&REGION));
    conn.query_row(&sql, [noc], from_row).optional()
}

/// Insert a new region. Fails with a constraint error if the NOC exists.
pub fn insert(conn: &Connection, region: &Region) -> rusqlite::Result<()> {
    conn.execute(
        &generate_insert(&REGION),
        rusqlite::params_from_iter(region.values()),
    )?;
    Ok(())
}

/// Apply a partial update; `None` if no region has this NOC
pub fn update(
    conn: &Connection,
    noc: &str,
    patch: &RegionPatch,
) -> rusqlite::Result<Option<Region>> {
    let Some(mut region) = get(conn, noc)? else {
        return Ok(None);
    };
    patch.apply(&mut region);

    conn.execute(
        "UPDATE \"region\" SET \"region\" = ?1, \"notes\" = ?2 WHERE \"NOC\" = ?3",
        params![region.region, region.notes, noc],
    )?;
    Ok(Some(region))
}

/// Delete a region; returns whether a row was removed
pub fn delete(conn: &Connection, noc: &str) -> rusqlite::Result<bool> {
    let removed = conn.execute("DELETE FROM \"region\" WHERE \"NOC\" = ?1", [noc])?;
    Ok(removed > 0)
}
