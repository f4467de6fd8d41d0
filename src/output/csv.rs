//! CSV output for a batch of cache files.
//!
//! One row per file. Failed files carry the error kind and message and
//! leave the header columns empty.
//!
//! # Columns
//!
//! - `path`, `status` (`ok` / `patched` / `error`), `error`
//! - `expire_time`, `expire`, `creation_time`, `last_modified_time`
//! - `key`, `body_len`

use std::io;

use serde::Serialize;

use super::{key_string, OutputError};
use crate::batch::FileOutcome;
use crate::datetime::format_timestamp;

#[derive(Debug, Default, Serialize)]
struct CsvRow {
    path: String,
    status: &'static str,
    error: Option<String>,
    expire_time: Option<u64>,
    expire: Option<String>,
    creation_time: Option<u64>,
    last_modified_time: Option<u64>,
    key: Option<String>,
    body_len: Option<u64>,
}

impl CsvRow {
    fn from_outcome(outcome: &FileOutcome, utc: bool) -> Self {
        let path = outcome.path.to_string_lossy().into_owned();
        match &outcome.result {
            Ok(info) => {
                let header = &info.header;
                Self {
                    path,
                    status: if outcome.patched { "patched" } else { "ok" },
                    error: None,
                    expire_time: Some(header.expire_time),
                    expire: format_timestamp(header.expire_time, utc),
                    creation_time: Some(header.creation_time),
                    last_modified_time: header.last_modified(),
                    key: Some(key_string(header)),
                    body_len: info.body_len(),
                }
            }
            Err(e) => Self {
                path,
                status: "error",
                error: Some(format!("{}: {}", e.kind(), e)),
                ..Self::default()
            },
        }
    }
}

/// CSV formatter.
pub struct CsvOutput<'a> {
    outcomes: &'a [FileOutcome],
    utc: bool,
}

impl<'a> CsvOutput<'a> {
    #[must_use]
    pub fn new(outcomes: &'a [FileOutcome], utc: bool) -> Self {
        Self { outcomes, utc }
    }

    /// Write all rows, header line first.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), OutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for outcome in self.outcomes {
            csv_writer.serialize(CsvRow::from_outcome(outcome, self.utc))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Render the CSV into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, OutputError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
