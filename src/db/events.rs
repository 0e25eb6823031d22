use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::model::{Event, EventPatch, NewEvent};
use crate::parser::record::event_values;
use crate::schema::EVENT;

use super::schema_gen::{generate_select, quote_ident, quoted_list};

fn from_row(row: &Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        fields: NewEvent {
            kind: row.get(1)?,
            year: row.get(2)?,
            country: row.get(3)?,
            host: row.get(4)?,
            noc: row.get(5)?,
            start: row.get(6)?,
            end: row.get(7)?,
            duration: row.get(8)?,
            disabilities_included: row.get(9)?,
            countries: row.get(10)?,
            events: row.get(11)?,
            sports: row.get(12)?,
            participants_m: row.get(13)?,
            participants_f: row.get(14)?,
            participants: row.get(15)?,
            highlights: row.get(16)?,
        },
    })
}

/// Columns other than the surrogate key, in schema order
fn data_columns() -> Vec<&'static str> {
    EVENT.columns.iter().map(|c| c.name).collect()
}

/// All events ordered by id
pub fn list(conn: &Connection) -> rusqlite::Result<Vec<Event>> {
    let sql = format!("{} ORDER BY \"id\"", generate_select(&EVENT));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<Event>> {
    let sql = format!("{} WHERE \"id\" = ?1", generate_select(&EVENT));
    conn.query_row(&sql, [id], from_row).optional()
}

/// All events hosted by a region
pub fn list_by_noc(conn: &Connection, noc: &str) -> rusqlite::Result<Vec<Event>> {
    let sql = format!(
        "{} WHERE \"NOC\" = ?1 ORDER BY \"id\"",
        generate_select(&EVENT)
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([noc], from_row)?;
    rows.collect()
}

/// Insert a new event and return the id the store assigned
pub fn insert(conn: &Connection, event: &NewEvent) -> rusqlite::Result<i64> {
    let columns = data_columns();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(EVENT.name),
        quoted_list(&columns),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(event_values(event)))?;
    Ok(conn.last_insert_rowid())
}

/// Apply a partial update; `None` if no event has this id
pub fn update(conn: &Connection, id: i64, patch: &EventPatch) -> rusqlite::Result<Option<Event>> {
    let Some(mut event) = get(conn, id)? else {
        return Ok(None);
    };
    patch.apply(&mut event.fields);

    let assignments: Vec<String> = data_columns()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ?{}", quote_ident(c), i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = ?{}",
        quote_ident(EVENT.name),
        assignments.join(", "),
        assignments.len() + 1
    );

    let mut values = event_values(&event.fields);
    values.push(crate::parser::SqlValue::Integer(id));
    conn.execute(&sql, params_from_iter(values))?;
    Ok(Some(event))
}

/// Delete an event; returns whether a row was removed
pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let removed = conn.execute("DELETE FROM \"event\" WHERE \"id\" = ?1", [id])?;
    Ok(removed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.ensure_schema().unwrap();
        db
    }

    fn sydney() -> NewEvent {
        NewEvent {
            kind: "Summer".into(),
            year: 2000,
            country: "Australia".into(),
            host: "Sydney".into(),
            noc: "AUS".into(),
            start: "18/10/2000".into(),
            end: "29/10/2000".into(),
            duration: Some(11),
            disabilities_included: "".into(),
            countries: Some(122),
            participants: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let db = db();
        let conn = db.connection();
        assert_eq!(insert(conn, &sydney()).unwrap(), 1);
        assert_eq!(insert(conn, &sydney()).unwrap(), 2);

        let event = get(conn, 2).unwrap().unwrap();
        assert_eq!(event.fields, sydney());
        assert_eq!(list(conn).unwrap().len(), 2);
        assert_eq!(list_by_noc(conn, "AUS").unwrap().len(), 2);
        assert!(list_by_noc(conn, "GBR").unwrap().is_empty());
    }

    #[test]
    fn test_update_partial() {
        let db = db();
        let conn = db.connection();
        let id = insert(conn, &sydney()).unwrap();

        let patch = EventPatch {
            highlights: Some("Biggest games yet".into()),
            duration: Some(None),
            ..Default::default()
        };
        let updated = update(conn, id, &patch).unwrap().unwrap();
        assert_eq!(updated.fields.highlights, "Biggest games yet");
        assert_eq!(updated.fields.duration, None);
        assert_eq!(updated.fields.host, "Sydney");
        assert_eq!(get(conn, id).unwrap().unwrap(), updated);

        assert!(update(conn, 99, &patch).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let db = db();
        let conn = db.connection();
        let id = insert(conn, &sydney()).unwrap();
        assert!(delete(conn, id).unwrap());
        assert!(get(conn, id).unwrap().is_none());
        assert!(!delete(conn, id).unwrap());
    }
}
