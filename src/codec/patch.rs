//! In-place rewrite of the expiry timestamp.
//!
//! A patch is computed against a decoded header, applied to an in-memory
//! copy of the fixed region, and the whole region is written back at
//! offset 0. The file length and every byte outside the expiry span stay
//! as they were.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use super::error::{CodecError, CodecResult};
use super::file::{info_from_prefix, read_prefix, CacheFileInfo};
use super::header::CacheHeader;
use super::layout::{EXPIRY_FIELD, FIXED_HEADER_SIZE};

/// Bytes to write at an absolute file offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPatch {
    /// Absolute offset of the first byte.
    pub offset: u64,
    /// Encoded value, exactly the field's width.
    pub bytes: Vec<u8>,
}

impl FieldPatch {
    /// Overwrite the patched span of `buf`, which starts at file offset 0.
    ///
    /// # Panics
    ///
    /// Panics if `buf` does not cover the span.
    pub fn apply(&self, buf: &mut [u8]) {
        let start = self.offset as usize;
        buf[start..start + self.bytes.len()].copy_from_slice(&self.bytes);
    }
}

/// Encode `new_expire_time` for the expiry field of `header`.
///
/// # Errors
///
/// Returns [`CodecError::OutOfRange`] if the value is negative or does not
/// fit the field.
pub fn encode_expiry(header: &CacheHeader, new_expire_time: i64) -> CodecResult<FieldPatch> {
    let out_of_range = || CodecError::OutOfRange {
        value: new_expire_time,
        width: EXPIRY_FIELD.width,
    };
    let value = u64::try_from(new_expire_time).map_err(|_| out_of_range())?;
    let bytes = EXPIRY_FIELD.encode_uint(value).ok_or_else(out_of_range)?;

    log::debug!(
        "Expiry {} -> {} at offset {}",
        header.expire_time,
        value,
        EXPIRY_FIELD.offset
    );

    Ok(FieldPatch {
        offset: EXPIRY_FIELD.offset as u64,
        bytes,
    })
}

/// Rewrite the expiry of the cache file at `path`.
///
/// The header is decoded and the new value validated before anything is
/// written; on any error the file is left untouched. The handle is dropped
/// on every exit path.
///
/// Returns the file as it reads after the patch.
///
/// # Errors
///
/// Any decode error, [`CodecError::OutOfRange`], or [`CodecError::Io`] if
/// opening, seeking, writing or syncing fails.
pub fn patch_expiry(path: &Path, new_expire_time: i64) -> CodecResult<CacheFileInfo> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    let file_len = file.metadata()?.len();
    let mut prefix = read_prefix(&mut file)?;

    let info = info_from_prefix(path, &prefix, file_len)?;
    let patch = encode_expiry(&info.header, new_expire_time)?;

    let mut fixed = info.header.raw_header_bytes.clone();
    patch.apply(&mut fixed);

    file.seek(SeekFrom::Start(0))?;
    file.write_all(&fixed)?;
    file.flush()?;
    file.sync_all()?;
    log::info!(
        "Set expiry of {} to {}",
        path.display(),
        new_expire_time
    );

    prefix[..FIXED_HEADER_SIZE].copy_from_slice(&fixed);
    info_from_prefix(path, &prefix, file_len)
}
