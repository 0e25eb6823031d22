use std::io::Read;
use std::str;

use csv::{ByteRecord, ReaderBuilder};

use crate::error::{Error, Result, RowProblem};

/// One untyped data row from a tabular source
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 1-based data row index, header excluded
    pub row: usize,
    record: ByteRecord,
}

impl RawRow {
    pub fn new<I, T>(row: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self {
            row,
            record: fields.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Borrow the fields as text, failing if any field is not UTF-8
    pub fn fields(&self) -> Result<Vec<&str>, RowProblem> {
        self.record
            .iter()
            .map(|f| str::from_utf8(f).map_err(|_| RowProblem::InvalidUtf8))
            .collect()
    }
}

/// Read every data row of a CSV source. The header row is consumed and not
/// validated. Field counts are not checked here; the typed parser reports
/// shape errors per row.
pub fn read_rows<R: Read>(reader: R, table: &'static str) -> Result<Vec<RawRow>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut record = ByteRecord::new();

    loop {
        let more = csv
            .read_byte_record(&mut record)
            .map_err(|source| Error::Source { table, source })?;
        if !more {
            break;
        }
        rows.push(RawRow {
            row: rows.len() + 1,
            record: record.clone(),
        });
    }

    Ok(rows)
}
