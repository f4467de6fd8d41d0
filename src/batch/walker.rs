//! Expansion of command-line paths into cache files.
//!
//! nginx spreads entries over `levels=1:2` subdirectories, so a directory
//! argument is walked recursively. Files are yielded in sorted order so
//! repeated runs report in the same sequence.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A path to process, or a failure to enumerate one.
pub type WalkItem = Result<PathBuf, (PathBuf, io::Error)>;

/// Expand `paths` into individual files.
///
/// Non-directories are passed through untouched, including paths that do
/// not exist; opening them later reports the error against the path.
#[must_use]
pub fn expand_paths(paths: &[PathBuf]) -> Vec<WalkItem> {
    let mut items = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, &mut items);
        } else {
            items.push(Ok(path.clone()));
        }
    }
    items
}

fn walk_dir(root: &Path, items: &mut Vec<WalkItem>) {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                items.push(Ok(entry.into_path()));
            }
            Ok(_) => {}
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                log::warn!("Cannot read {}: {}", path.display(), e);
                items.push(Err((path, e.into())));
            }
        }
    }
}
