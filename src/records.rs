//! Reading name records from a delimited text file.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use crate::error::{CertError, Result};

/// How the records file is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOptions {
    /// Treat the first row as a header and skip it.
    pub has_headers: bool,
    pub delimiter: u8,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            has_headers: true,
            delimiter: b',',
        }
    }
}

/// One input row. The first field is the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line the row starts on.
    pub line: u64,
    pub fields: Vec<String>,
}

impl Record {
    pub fn name(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// Reject names carrying line breaks or other control characters, which
    /// is what an unterminated quote leaves behind.
    fn check(self) -> Result<Self> {
        if self.name().chars().any(char::is_control) {
            return Err(CertError::MalformedRow {
                line: Some(self.line),
                reason: "name contains a line break or control character (unterminated quote?)"
                    .to_string(),
            });
        }
        Ok(self)
    }

    fn from_row(row: &StringRecord) -> Self {
        Self {
            line: row.position().map(|p| p.line()).unwrap_or_default(),
            fields: row.iter().map(str::to_owned).collect(),
        }
    }
}

/// Forward-only iterator over the records of one file.
///
/// A malformed row yields an error for that row only; the next call moves on.
/// An I/O failure yields one error and ends the sequence.
pub struct RecordReader {
    rows: StringRecordsIntoIter<File>,
    finished: bool,
}

/// Open `path` for reading records.
pub fn open_records(path: impl AsRef<Path>, options: RecordOptions) -> Result<RecordReader> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CertError::io(path, e))?;
    let rows = ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .flexible(false)
        .from_reader(file)
        .into_records();
    Ok(RecordReader {
        rows,
        finished: false,
    })
}

impl Iterator for RecordReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.rows.next()? {
            Ok(row) => Some(Record::from_row(&row).check()),
            Err(err) => {
                let line = err.position().map(|p| p.line());
                if let csv::ErrorKind::Io(_) = err.kind() {
                    self.finished = true;
                }
                Some(Err(CertError::Record { line, source: err }))
            }
        }
    }
}
