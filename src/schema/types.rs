/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

impl ColumnType {
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }
}

/// Foreign key reference. Declared in the DDL only; the store does not
/// enforce it at insert time.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
        }
    }
}

/// How the primary key of a table is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKey {
    /// Natural key supplied by the source data (e.g. a NOC code)
    Natural(&'static str),
    /// Integer surrogate key, assigned sequentially by the store
    Surrogate(&'static str),
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    /// Default file name of the CSV source for this table
    pub source_file: &'static str,
    pub primary_key: PrimaryKey,
    /// Columns in source-file order. A surrogate key is not listed here.
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    /// Number of fields a source row for this table must have
    pub fn source_width(&self) -> usize {
        self.columns.len()
    }

    /// All stored column names, surrogate key first
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.columns.len() + 1);
        if let PrimaryKey::Surrogate(key) = self.primary_key {
            names.push(key);
        }
        names.extend(self.columns.iter().map(|c| c.name));
        names
    }
}
