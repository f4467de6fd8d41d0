//! Report formatters for processed cache files.
//!
//! - [`text`]: human-readable report per file
//! - [`json`]: one JSON document covering the whole batch
//! - [`csv`]: one row per file for spreadsheets
//!
//! # Example
//!
//! ```no_run
//! use nginx_cache_info::batch::{process_paths, Action};
//! use nginx_cache_info::output::JsonOutput;
//! use std::path::PathBuf;
//!
//! let outcomes = process_paths(&[PathBuf::from("/var/cache/nginx")], Action::Inspect);
//! let output = JsonOutput::new(&outcomes, true);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::io;

use thiserror::Error;

pub use self::csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Text of a NUL-padded byte field, `None` when empty.
pub(crate) fn text_field(bytes: &[u8]) -> Option<String> {
    if bytes.iter().all(|&b| b == 0) {
        return None;
    }
    let trimmed = match bytes.iter().rposition(|&b| b != 0) {
        Some(last) => &bytes[..=last],
        None => bytes,
    };
    Some(String::from_utf8_lossy(trimmed).into_owned())
}

/// Lowercase hex of the variant digest, `None` when all zero.
pub(crate) fn variant_hex(variant: &[u8; 16]) -> Option<String> {
    if variant.iter().all(|&b| b == 0) {
        return None;
    }
    Some(variant.iter().map(|b| format!("{b:02x}")).collect())
}

/// The cache key as text, framing removed when present.
pub(crate) fn key_string(header: &crate::codec::CacheHeader) -> String {
    let key = header.key_text().unwrap_or(&header.cache_key);
    String::from_utf8_lossy(key).into_owned()
}
