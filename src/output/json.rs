//! JSON output for a batch of cache files.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "files": [
//!     {
//!       "path": "/var/cache/nginx/c/29/b7f5...",
//!       "ok": true,
//!       "patched": false,
//!       "header": {
//!         "version": 5,
//!         "expire_time": 1500000000,
//!         "expire": "2017-07-14T02:40:00Z",
//!         "expired": true,
//!         "key": "httpexample.com/index.html",
//!         "body_len": 2048
//!       }
//!     },
//!     {
//!       "path": "/var/cache/nginx/broken",
//!       "ok": false,
//!       "error": { "kind": "TruncatedInput", "message": "..." }
//!     }
//!   ],
//!   "summary": { "total": 2, "failed": 1, "patched": 0 }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::{key_string, text_field, variant_hex, OutputError};
use crate::batch::{BatchSummary, FileOutcome};
use crate::codec::{CacheFileInfo, CodecError};
use crate::datetime::{format_timestamp, now_epoch};

/// Decoded header fields in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonHeader {
    pub version: u64,
    pub expire_time: u64,
    pub expire: Option<String>,
    pub expired: bool,
    pub updating_sec: u64,
    pub error_sec: u64,
    pub last_modified_time: Option<u64>,
    pub last_modified: Option<String>,
    pub creation_time: u64,
    pub creation: Option<String>,
    pub crc32: u32,
    pub valid_msec: u16,
    pub header_start: u16,
    pub body_start: u16,
    pub etag: Option<String>,
    pub vary: Option<String>,
    pub variant: Option<String>,
    pub key_length: usize,
    pub key: String,
    pub http_headers: Option<String>,
    pub body_len: Option<u64>,
}

impl JsonHeader {
    #[must_use]
    pub fn from_info(info: &CacheFileInfo, utc: bool) -> Self {
        Self::at(info, utc, now_epoch())
    }

    /// Build the header view with staleness judged at `now` (epoch seconds).
    #[must_use]
    pub fn at(info: &CacheFileInfo, utc: bool, now: u64) -> Self {
        let header = &info.header;
        Self {
            version: header.version,
            expire_time: header.expire_time,
            expire: format_timestamp(header.expire_time, utc),
            expired: header.is_expired_at(now),
            updating_sec: header.updating_sec,
            error_sec: header.error_sec,
            last_modified_time: header.last_modified(),
            last_modified: format_timestamp(header.last_modified_time, utc),
            creation_time: header.creation_time,
            creation: format_timestamp(header.creation_time, utc),
            crc32: header.crc32,
            valid_msec: header.valid_msec,
            header_start: header.header_start,
            body_start: header.body_start,
            etag: text_field(&header.etag),
            vary: text_field(&header.vary),
            variant: variant_hex(&header.variant),
            key_length: header.key_length,
            key: key_string(header),
            http_headers: info
                .http_headers
                .as_deref()
                .map(|block| String::from_utf8_lossy(block).into_owned()),
            body_len: info.body_len(),
        }
    }
}

/// A failure in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonError {
    pub kind: &'static str,
    pub message: String,
}

impl From<&CodecError> for JsonError {
    fn from(err: &CodecError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// One file in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFileReport {
    pub path: String,
    pub ok: bool,
    pub patched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<JsonHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Batch counts in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub total: usize,
    pub failed: usize,
    pub patched: usize,
}

impl From<BatchSummary> for JsonSummary {
    fn from(summary: BatchSummary) -> Self {
        Self {
            total: summary.total,
            failed: summary.failed,
            patched: summary.patched,
        }
    }
}

/// JSON formatter for a batch.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub files: Vec<JsonFileReport>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    #[must_use]
    pub fn new(outcomes: &[FileOutcome], utc: bool) -> Self {
        let files = outcomes
            .iter()
            .map(|outcome| JsonFileReport {
                path: outcome.path.to_string_lossy().into_owned(),
                ok: outcome.is_ok(),
                patched: outcome.patched,
                header: outcome
                    .result
                    .as_ref()
                    .ok()
                    .map(|info| JsonHeader::from_info(info, utc)),
                error: outcome.result.as_ref().err().map(JsonError::from),
            })
            .collect();
        Self {
            files,
            summary: BatchSummary::from_outcomes(outcomes).into(),
        }
    }

    /// Compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, OutputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), OutputError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{process_paths, Action};
    use crate::codec::file::info_from_prefix;
    use crate::codec::layout::TIMESTAMP_ABSENT;
    use crate::codec::CacheFileBuilder;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_json_batch() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good");
        let bad = dir.path().join("bad");
        fs::write(
            &good,
            CacheFileBuilder::new("httpexample.com/")
                .expire_time(1_500_000_000)
                .body(b"abc")
                .build(),
        )
        .unwrap();
        fs::write(&bad, b"tiny").unwrap();

        let outcomes = process_paths(&[good, bad], Action::Inspect);
        let json = JsonOutput::new(&outcomes, true).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let files = value["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["ok"], true);
        assert_eq!(files[0]["header"]["expire_time"], 1_500_000_000u64);
        assert_eq!(files[0]["header"]["expire"], "2017-07-14T02:40:00Z");
        assert_eq!(files[0]["header"]["expired"], true);
        assert_eq!(files[0]["header"]["key"], "httpexample.com/");
        assert_eq!(files[0]["header"]["last_modified_time"], serde_json::Value::Null);
        assert_eq!(files[0]["header"]["body_len"], 3);
        assert!(files[0].get("error").is_none());

        assert_eq!(files[1]["ok"], false);
        assert_eq!(files[1]["error"]["kind"], "TruncatedInput");
        assert!(files[1].get("header").is_none());

        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["failed"], 1);
    }

    #[test]
    fn test_expired_flag_tracks_now() {
        let bytes = CacheFileBuilder::new("k").expire_time(2_000).build();
        let info = info_from_prefix(Path::new("entry"), &bytes, bytes.len() as u64).unwrap();

        assert!(!JsonHeader::at(&info, true, 1_999).expired);
        assert!(JsonHeader::at(&info, true, 2_000).expired);

        let never = CacheFileBuilder::new("k")
            .expire_time(TIMESTAMP_ABSENT)
            .build();
        let info = info_from_prefix(Path::new("entry"), &never, never.len() as u64).unwrap();
        assert!(!JsonHeader::at(&info, true, u64::MAX - 1).expired);
    }
}
