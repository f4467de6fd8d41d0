//! Reading cache files from disk.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::error::CodecResult;
use super::header::{decode_with_len, CacheHeader};

/// Bytes read from the start of a file.
///
/// `header_start` and `body_start` are 16-bit, so the fixed region, the
/// key and the HTTP header block always lie within this prefix.
pub const MAX_PREFIX_LEN: u64 = 1 << 16;

/// A decoded cache file.
#[derive(Debug, Clone)]
pub struct CacheFileInfo {
    /// Path the file was read from.
    pub path: PathBuf,
    /// Size of the file on disk.
    pub file_len: u64,
    /// Decoded header.
    pub header: CacheHeader,
    /// Raw HTTP response header block, if `body_start` is consistent.
    pub http_headers: Option<Vec<u8>>,
}

impl CacheFileInfo {
    /// Length of the cached response body.
    #[must_use]
    pub fn body_len(&self) -> Option<u64> {
        self.header.body_len(self.file_len)
    }
}

/// Read the leading bytes a decode needs.
pub(crate) fn read_prefix<R: Read>(reader: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(MAX_PREFIX_LEN).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Build a [`CacheFileInfo`] from an already-read prefix.
pub(crate) fn info_from_prefix(
    path: &Path,
    prefix: &[u8],
    file_len: u64,
) -> CodecResult<CacheFileInfo> {
    let header = decode_with_len(prefix, file_len)?;
    let http_headers = header
        .http_header_span(file_len)
        .and_then(|span| prefix.get(span))
        .map(<[u8]>::to_vec);
    Ok(CacheFileInfo {
        path: path.to_path_buf(),
        file_len,
        header,
        http_headers,
    })
}

/// Open `path` and decode its header.
///
/// The file is closed before this returns, on success and on error.
///
/// # Errors
///
/// Returns [`CodecError::Io`](super::CodecError::Io) if the file cannot be
/// opened or read, or any decode error.
pub fn read_cache_file(path: &Path) -> CodecResult<CacheFileInfo> {
    let file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let prefix = read_prefix(file)?;
    log::debug!(
        "Read {} of {} bytes from {}",
        prefix.len(),
        file_len,
        path.display()
    );
    info_from_prefix(path, &prefix, file_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CacheFileBuilder, CodecError};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_cache_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("5d41402abc4b2a76b9719d911017c592");
        let bytes = CacheFileBuilder::new("httpexample.com/")
            .expire_time(42)
            .http_headers(b"HTTP/1.1 200 OK\r\n\r\n")
            .body(&[0u8; 1000])
            .build();
        fs::write(&path, &bytes).unwrap();

        let info = read_cache_file(&path).unwrap();
        assert_eq!(info.file_len, bytes.len() as u64);
        assert_eq!(info.header.expire_time, 42);
        assert_eq!(info.http_headers.as_deref(), Some(&b"HTTP/1.1 200 OK\r\n\r\n"[..]));
        assert_eq!(info.body_len(), Some(1000));
    }

    #[test]
    fn test_read_large_body_only_reads_prefix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big");
        let bytes = CacheFileBuilder::new("k")
            .body(&vec![7u8; 200_000])
            .build();
        fs::write(&path, &bytes).unwrap();

        let info = read_cache_file(&path).unwrap();
        assert_eq!(info.body_len(), Some(200_000));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_cache_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").unwrap();
        let err = read_cache_file(&path).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedInput { len: 0, .. }));
    }
}
