//! Table schema definitions for the paralympics database

use super::types::*;

pub static REGION: TableSchema = TableSchema {
    name: "region",
    source_file: "noc_regions.csv",
    primary_key: PrimaryKey::Natural("NOC"),
    columns: &[
        Column::required("NOC", ColumnType::Text),
        Column::required("region", ColumnType::Text),
        Column::new("notes", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static EVENT: TableSchema = TableSchema {
    name: "event",
    source_file: "paralympic_events.csv",
    primary_key: PrimaryKey::Surrogate("id"),
    columns: &[
        Column::new("type", ColumnType::Text),
        Column::required("year", ColumnType::Integer),
        Column::new("country", ColumnType::Text),
        Column::new("host", ColumnType::Text),
        Column::new("NOC", ColumnType::Text),
        Column::new("start", ColumnType::Text),
        Column::new("end", ColumnType::Text),
        Column::new("duration", ColumnType::Integer),
        Column::new("disabilities_included", ColumnType::Text),
        Column::new("countries", ColumnType::Integer),
        Column::new("events", ColumnType::Integer),
        Column::new("sports", ColumnType::Integer),
        Column::new("participants_m", ColumnType::Integer),
        Column::new("participants_f", ColumnType::Integer),
        Column::new("participants", ColumnType::Integer),
        Column::new("highlights", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("NOC", "region", "NOC")],
};

/// All tables in creation order (parents before children)
pub static ALL_TABLES: &[&TableSchema] = &[&REGION, &EVENT];

/// Look up a table by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}

/// Names of all declared tables
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
