//! Command-line interface definitions.
//!
//! # Example
//!
//! ```bash
//! # Print the header of one cache file
//! nginx-cache-info /var/cache/nginx/c/29/b7f54b2df7773722d382f4809d65029c
//!
//! # Inspect a whole cache tree as JSON
//! nginx-cache-info /var/cache/nginx --output json
//!
//! # Push the expiry of an entry into the future
//! nginx-cache-info ENTRY --set-expire 2030-01-01T00:00:00
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::datetime::{parse_expire_date, ExpireDate};

/// Examine and patch nginx proxy cache files.
#[derive(Debug, Parser)]
#[command(name = "nginx-cache-info")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cache files to inspect; directories are searched recursively
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Rewrite the expiry date (valid_sec) of every file
    ///
    /// Accepts YYYY-MM-DDTHH:MM:SS, "YYYY-MM-DD HH:MM:SS", YYYY-MM-DD
    /// (local time unless --utc) or RFC 3339 with an offset.
    #[arg(long, value_name = "DATE", value_parser = parse_expire_date)]
    pub set_expire: Option<ExpireDate>,

    /// Interpret and print dates in UTC instead of local time
    #[arg(long)]
    pub utc: bool,

    /// Report format (defaults to the configured format, else text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Hide per-file reports; only errors are printed
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for file reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report per file
    #[default]
    Text,
    /// One JSON document for all files
    Json,
    /// One CSV row per file
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
