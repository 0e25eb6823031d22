use rusqlite::types::{Null, ToSqlOutput, Value};
use rusqlite::ToSql;

use super::source::RawRow;
use crate::error::RowProblem;
use crate::model::{Event, NewEvent, Region};
use crate::schema::{TableSchema, EVENT, REGION};

/// A value ready to bind into an INSERT statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlValue::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        value.map(SqlValue::Integer).unwrap_or(SqlValue::Null)
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map(SqlValue::Text).unwrap_or(SqlValue::Null)
    }
}

/// An entity that can be seeded from one row of a tabular source
pub trait SeedRecord: Sized {
    fn schema() -> &'static TableSchema;

    /// Build the entity from a raw row
    fn parse(raw: &RawRow) -> Result<Self, RowProblem>;

    /// Values for every column of `schema().column_names()`, in order
    fn values(&self) -> Vec<SqlValue>;

    /// Natural key, for tables whose primary key comes from the source
    fn natural_key(&self) -> Option<&str> {
        None
    }
}

impl SeedRecord for Region {
    fn schema() -> &'static TableSchema {
        &REGION
    }

    fn parse(raw: &RawRow) -> Result<Self, RowProblem> {
        let fields = checked_fields(raw, &REGION)?;
        Ok(Region {
            noc: required_text(fields[0], "NOC")?,
            region: required_text(fields[1], "region")?,
            notes: optional_text(fields[2]),
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.noc.clone()),
            SqlValue::Text(self.region.clone()),
            self.notes.clone().into(),
        ]
    }

    fn natural_key(&self) -> Option<&str> {
        Some(&self.noc)
    }
}

impl SeedRecord for Event {
    fn schema() -> &'static TableSchema {
        &EVENT
    }

    fn parse(raw: &RawRow) -> Result<Self, RowProblem> {
        let f = checked_fields(raw, &EVENT)?;
        // Text columns keep empty strings; only the optional integers become NULL
        let fields = NewEvent {
            kind: f[0].to_string(),
            year: required_integer(f[1], "year")?,
            country: f[2].to_string(),
            host: f[3].to_string(),
            noc: f[4].to_string(),
            start: f[5].to_string(),
            end: f[6].to_string(),
            duration: optional_integer(f[7], "duration")?,
            disabilities_included: f[8].to_string(),
            countries: optional_integer(f[9], "countries")?,
            events: optional_integer(f[10], "events")?,
            sports: optional_integer(f[11], "sports")?,
            participants_m: optional_integer(f[12], "participants_m")?,
            participants_f: optional_integer(f[13], "participants_f")?,
            participants: optional_integer(f[14], "participants")?,
            highlights: f[15].to_string(),
        };

        Ok(Event {
            id: raw.row as i64,
            fields,
        })
    }

    fn values(&self) -> Vec<SqlValue> {
        let mut values = vec![SqlValue::Integer(self.id)];
        values.extend(event_values(&self.fields));
        values
    }
}

/// Values for every event column except `id`, in schema order
pub fn event_values(e: &NewEvent) -> Vec<SqlValue> {
    vec![
        SqlValue::Text(e.kind.clone()),
        SqlValue::Integer(e.year),
        SqlValue::Text(e.country.clone()),
        SqlValue::Text(e.host.clone()),
        SqlValue::Text(e.noc.clone()),
        SqlValue::Text(e.start.clone()),
        SqlValue::Text(e.end.clone()),
        e.duration.into(),
        SqlValue::Text(e.disabilities_included.clone()),
        e.countries.into(),
        e.events.into(),
        e.sports.into(),
        e.participants_m.into(),
        e.participants_f.into(),
        e.participants.into(),
        SqlValue::Text(e.highlights.clone()),
    ]
}

fn checked_fields<'a>(raw: &'a RawRow, schema: &TableSchema) -> Result<Vec<&'a str>, RowProblem> {
    let expected = schema.source_width();
    if raw.len() != expected {
        return Err(RowProblem::FieldCount {
            expected,
            found: raw.len(),
        });
    }
    raw.fields()
}

fn required_text(value: &str, column: &'static str) -> Result<String, RowProblem> {
    if value.is_empty() {
        return Err(RowProblem::EmptyRequired { column });
    }
    Ok(value.to_string())
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn required_integer(value: &str, column: &'static str) -> Result<i64, RowProblem> {
    optional_integer(value, column)?.ok_or(RowProblem::EmptyRequired { column })
}

fn optional_integer(value: &str, column: &'static str) -> Result<Option<i64>, RowProblem> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| RowProblem::NotAnInteger {
            column,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_row(row: usize, overrides: &[(usize, &str)]) -> RawRow {
        let mut fields = vec![
            "Summer",
            "2012",
            "UK",
            "London",
            "GBR",
            "29/08/2012",
            "09/09/2012",
            "11",
            "Spinal injury",
            "164",
            "503",
            "20",
            "2736",
            "1501",
            "4237",
            "",
        ];
        for (idx, value) in overrides {
            fields[*idx] = *value;
        }
        RawRow::new(row, fields)
    }

    #[test]
    fn test_region_notes_empty_is_null() {
        let region = Region::parse(&RawRow::new(1, ["GBR", "Great Britain", ""])).unwrap();
        assert_eq!(region.notes, None);
        assert_eq!(region.values()[2], SqlValue::Null);
    }

    #[test]
    fn test_region_required_fields() {
        assert_eq!(
            Region::parse(&RawRow::new(1, ["", "Nowhere", ""])),
            Err(RowProblem::EmptyRequired { column: "NOC" })
        );
        assert_eq!(
            Region::parse(&RawRow::new(1, ["XXX", "", "note"])),
            Err(RowProblem::EmptyRequired { column: "region" })
        );
    }

    #[test]
    fn test_region_field_count() {
        assert_eq!(
            Region::parse(&RawRow::new(1, ["GBR", "Great Britain"])),
            Err(RowProblem::FieldCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_event_id_follows_row_index() {
        let event = Event::parse(&event_row(4, &[])).unwrap();
        assert_eq!(event.id, 4);
        assert_eq!(event.values()[0], SqlValue::Integer(4));
    }

    #[test]
    fn test_event_empty_text_stays_empty_string() {
        let event = Event::parse(&event_row(1, &[(2, "")])).unwrap();
        assert_eq!(event.fields.country, "");
        assert_eq!(event.values()[3], SqlValue::Text(String::new()));
    }

    #[test]
    fn test_event_empty_optional_integer_is_null() {
        let event = Event::parse(&event_row(1, &[(7, ""), (14, "")])).unwrap();
        assert_eq!(event.fields.duration, None);
        assert_eq!(event.fields.participants, None);
        assert_eq!(event.fields.sports, Some(20));
        assert_eq!(event.values()[8], SqlValue::Null);
    }

    #[test]
    fn test_event_integer_validation() {
        assert_eq!(
            Event::parse(&event_row(1, &[(1, "")])),
            Err(RowProblem::EmptyRequired { column: "year" })
        );
        assert_eq!(
            Event::parse(&event_row(1, &[(10, "many")])),
            Err(RowProblem::NotAnInteger {
                column: "events",
                value: "many".into()
            })
        );
        let padded = Event::parse(&event_row(1, &[(1, " 1960 ")])).unwrap();
        assert_eq!(padded.fields.year, 1960);
    }

    #[test]
    fn test_event_field_count() {
        let short = RawRow::new(3, ["Summer"; 15]);
        assert_eq!(
            Event::parse(&short),
            Err(RowProblem::FieldCount {
                expected: 16,
                found: 15
            })
        );
    }
}
