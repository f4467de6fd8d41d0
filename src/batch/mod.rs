//! Per-file processing with continue-on-error semantics.
//!
//! Each file is decoded (and optionally patched) on its own; failures are
//! captured as values in a [`FileOutcome`] instead of aborting the run.
//! Outcomes come back in input order so reports stay sequential.

pub mod walker;

use std::path::{Path, PathBuf};

use crate::codec::{patch_expiry, read_cache_file, CacheFileInfo, CodecError, CodecResult};

pub use walker::expand_paths;

/// What to do with each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Decode and report.
    Inspect,
    /// Rewrite the expiry to the given epoch seconds, then report.
    SetExpire(i64),
}

/// Result of processing a single file.
#[derive(Debug)]
pub struct FileOutcome {
    /// File the outcome belongs to.
    pub path: PathBuf,
    /// Decoded file (after patching, for [`Action::SetExpire`]), or the
    /// failure.
    pub result: CodecResult<CacheFileInfo>,
    /// Whether the file was rewritten.
    pub patched: bool,
}

impl FileOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Process one file.
#[must_use]
pub fn process_file(path: &Path, action: Action) -> FileOutcome {
    let result = match action {
        Action::Inspect => read_cache_file(path),
        Action::SetExpire(expire) => patch_expiry(path, expire),
    };
    if let Err(e) = &result {
        log::debug!("{}: {}", path.display(), e);
    }
    FileOutcome {
        path: path.to_path_buf(),
        patched: matches!(action, Action::SetExpire(_)) && result.is_ok(),
        result,
    }
}

/// Expand `paths` and process every file in order.
#[must_use]
pub fn process_paths(paths: &[PathBuf], action: Action) -> Vec<FileOutcome> {
    expand_paths(paths)
        .into_iter()
        .map(|item| match item {
            Ok(path) => process_file(&path, action),
            Err((path, err)) => FileOutcome {
                path,
                result: Err(CodecError::Io(err)),
                patched: false,
            },
        })
        .collect()
}

/// Counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub failed: usize,
    pub patched: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        Self {
            total: outcomes.len(),
            failed: outcomes.iter().filter(|o| !o.is_ok()).count(),
            patched: outcomes.iter().filter(|o| o.patched).count(),
        }
    }
}
