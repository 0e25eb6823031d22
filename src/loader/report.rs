use std::fmt;

use crate::error::RowError;

/// Informational findings that do not stop a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// An event names a NOC with no region row. The reference is advisory,
    /// so the event is stored anyway.
    ForeignKeyIgnored { row: usize, noc: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::ForeignKeyIgnored { row, noc } => {
                write!(f, "row {} references unknown NOC {:?}", row, noc)
            }
        }
    }
}

/// What a load attempt did to one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: &'static str,
    /// Rows committed by this attempt
    pub loaded: usize,
    /// The table already held rows, so the source was not read
    pub skipped: bool,
    /// Row count found before the attempt
    pub existing: u64,
    pub error: Option<RowError>,
    pub warnings: Vec<LoadWarning>,
}

impl TableReport {
    pub(crate) fn skipped(table: &'static str, existing: u64) -> Self {
        Self {
            table,
            loaded: 0,
            skipped: true,
            existing,
            error: None,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn loaded(table: &'static str, loaded: usize, warnings: Vec<LoadWarning>) -> Self {
        Self {
            table,
            loaded,
            skipped: false,
            existing: 0,
            error: None,
            warnings,
        }
    }

    pub(crate) fn failed(table: &'static str, error: RowError) -> Self {
        Self {
            table,
            loaded: 0,
            skipped: false,
            existing: 0,
            error: Some(error),
            warnings: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(err) = &self.error {
            return write!(f, "{}: failed, nothing committed ({})", self.table, err);
        }
        if self.skipped {
            return write!(f, "{}: skipped ({} existing rows)", self.table, self.existing);
        }
        write!(f, "{}: loaded {} rows", self.table, self.loaded)?;
        if !self.warnings.is_empty() {
            write!(f, ", {} warnings", self.warnings.len())?;
        }
        Ok(())
    }
}

/// Result of one `Loader::load` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub regions: TableReport,
    pub events: TableReport,
}

impl LoadReport {
    /// Neither table reported an error
    pub fn is_clean(&self) -> bool {
        self.regions.is_ok() && self.events.is_ok()
    }

    pub fn errors(&self) -> impl Iterator<Item = &RowError> {
        self.regions.error.iter().chain(self.events.error.iter())
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.regions)?;
        write!(f, "{}", self.events)
    }
}
