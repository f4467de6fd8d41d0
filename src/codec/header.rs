//! Decoded view of the fixed header region and the key block.

use std::ops::Range;

use super::error::{CodecError, CodecResult};
use super::layout::{self, FIXED_HEADER_SIZE, KEY_PREFIX, KEY_SUFFIX, TIMESTAMP_ABSENT};

/// Header of one nginx cache file.
///
/// Built by [`decode`] from the leading bytes of a file. Only
/// `expire_time` is ever written back; everything else, including
/// `raw_header_bytes`, is kept so a patch can reproduce the rest of the
/// fixed region byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHeader {
    /// Format version (always [`layout::FORMAT_VERSION`] after decode).
    pub version: u64,
    /// `valid_sec`: epoch seconds after which the entry is stale.
    pub expire_time: u64,
    /// `updating_sec` from `proxy_cache_use_stale updating`.
    pub updating_sec: u64,
    /// `error_sec` from `proxy_cache_use_stale error`.
    pub error_sec: u64,
    /// Origin `Last-Modified`, or [`TIMESTAMP_ABSENT`].
    pub last_modified_time: u64,
    /// `date`: when the entry was written.
    pub creation_time: u64,
    /// CRC32 of the cache key.
    pub crc32: u32,
    /// Millisecond part of the expiry.
    pub valid_msec: u16,
    /// Offset of the HTTP response header block (end of the key block).
    pub header_start: u16,
    /// Offset of the response body.
    pub body_start: u16,
    /// ETag of the cached response, `etag_len` bytes.
    pub etag: Vec<u8>,
    /// Vary header value, `vary_len` bytes.
    pub vary: Vec<u8>,
    /// MD5 of the Vary variant.
    pub variant: [u8; 16],
    /// Length of the key block following the fixed region.
    pub key_length: usize,
    /// Key block exactly as stored, framing included.
    pub cache_key: Vec<u8>,
    /// Verbatim copy of the fixed region.
    pub raw_header_bytes: Vec<u8>,
}

/// Decode a header, treating `bytes` as the whole file.
///
/// # Errors
///
/// See [`decode_with_len`].
pub fn decode(bytes: &[u8]) -> CodecResult<CacheHeader> {
    decode_with_len(bytes, bytes.len() as u64)
}

/// Decode a header from the leading `bytes` of a file that is `file_len`
/// bytes long.
///
/// `bytes` must contain the fixed region and the whole key block.
///
/// # Errors
///
/// - [`CodecError::TruncatedInput`] when `bytes` is shorter than the fixed
///   region.
/// - [`CodecError::UnsupportedVersion`] when the version is not the pinned
///   one.
/// - [`CodecError::MalformedKeyLength`] when the key block starts inside
///   the fixed region, ends past `file_len`, or is not covered by `bytes`.
pub fn decode_with_len(bytes: &[u8], file_len: u64) -> CodecResult<CacheHeader> {
    if bytes.len() < FIXED_HEADER_SIZE {
        return Err(CodecError::TruncatedInput {
            len: bytes.len(),
            required: FIXED_HEADER_SIZE,
        });
    }
    let fixed = &bytes[..FIXED_HEADER_SIZE];

    let version = layout::VERSION.read_uint(fixed);
    if version != layout::FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let header_start = layout::HEADER_START.read_uint(fixed);
    let key_end = header_start as usize;
    if key_end < FIXED_HEADER_SIZE || header_start > file_len || key_end > bytes.len() {
        return Err(CodecError::MalformedKeyLength {
            header_start,
            file_len,
        });
    }

    let padding = &fixed[layout::PADDING.range()];
    if padding.iter().any(|&b| b != 0) {
        log::warn!("Unexpected non-zero header padding: {:02x?}", padding);
    }

    let etag_len = (layout::ETAG_LEN.read_uint(fixed) as usize).min(layout::ETAG.width);
    let vary_len = (layout::VARY_LEN.read_uint(fixed) as usize).min(layout::VARY.width);
    let mut variant = [0u8; 16];
    variant.copy_from_slice(&fixed[layout::VARIANT.range()]);

    Ok(CacheHeader {
        version,
        expire_time: layout::VALID_SEC.read_uint(fixed),
        updating_sec: layout::UPDATING_SEC.read_uint(fixed),
        error_sec: layout::ERROR_SEC.read_uint(fixed),
        last_modified_time: layout::LAST_MODIFIED.read_uint(fixed),
        creation_time: layout::DATE.read_uint(fixed),
        crc32: layout::CRC32.read_uint(fixed) as u32,
        valid_msec: layout::VALID_MSEC.read_uint(fixed) as u16,
        header_start: header_start as u16,
        body_start: layout::BODY_START.read_uint(fixed) as u16,
        etag: fixed[layout::ETAG.offset..layout::ETAG.offset + etag_len].to_vec(),
        vary: fixed[layout::VARY.offset..layout::VARY.offset + vary_len].to_vec(),
        variant,
        key_length: key_end - FIXED_HEADER_SIZE,
        cache_key: bytes[FIXED_HEADER_SIZE..key_end].to_vec(),
        raw_header_bytes: fixed.to_vec(),
    })
}

/// Serialize every modelled field into a copy of the raw fixed region,
/// followed by the key block.
///
/// Bytes the header does not model (padding, unused etag/vary tails) are
/// taken from `raw_header_bytes`, so a freshly decoded header encodes back
/// to the bytes it came from.
#[must_use]
pub fn encode_full(header: &CacheHeader) -> Vec<u8> {
    let mut out = header.raw_header_bytes.clone();
    out.resize(FIXED_HEADER_SIZE, 0);

    layout::VERSION.write_uint(&mut out, header.version);
    layout::VALID_SEC.write_uint(&mut out, header.expire_time);
    layout::UPDATING_SEC.write_uint(&mut out, header.updating_sec);
    layout::ERROR_SEC.write_uint(&mut out, header.error_sec);
    layout::LAST_MODIFIED.write_uint(&mut out, header.last_modified_time);
    layout::DATE.write_uint(&mut out, header.creation_time);
    layout::CRC32.write_uint(&mut out, u64::from(header.crc32));
    layout::VALID_MSEC.write_uint(&mut out, u64::from(header.valid_msec));
    layout::HEADER_START.write_uint(&mut out, u64::from(header.header_start));
    layout::BODY_START.write_uint(&mut out, u64::from(header.body_start));

    let etag_len = header.etag.len().min(layout::ETAG.width);
    layout::ETAG_LEN.write_uint(&mut out, etag_len as u64);
    out[layout::ETAG.offset..layout::ETAG.offset + etag_len]
        .copy_from_slice(&header.etag[..etag_len]);

    let vary_len = header.vary.len().min(layout::VARY.width);
    layout::VARY_LEN.write_uint(&mut out, vary_len as u64);
    out[layout::VARY.offset..layout::VARY.offset + vary_len]
        .copy_from_slice(&header.vary[..vary_len]);

    out[layout::VARIANT.range()].copy_from_slice(&header.variant);

    out.extend_from_slice(&header.cache_key);
    out
}

impl CacheHeader {
    /// Absolute byte range of the key block.
    #[must_use]
    pub fn key_span(&self) -> Range<usize> {
        FIXED_HEADER_SIZE..FIXED_HEADER_SIZE + self.key_length
    }

    /// Absolute byte range of the HTTP response header block.
    ///
    /// `None` when `body_start` lies before the key block's end or past
    /// the end of the file.
    #[must_use]
    pub fn http_header_span(&self, file_len: u64) -> Option<Range<usize>> {
        let start = usize::from(self.header_start);
        let end = usize::from(self.body_start);
        if end < start || end as u64 > file_len {
            return None;
        }
        Some(start..end)
    }

    /// Number of body bytes after `body_start`.
    #[must_use]
    pub fn body_len(&self, file_len: u64) -> Option<u64> {
        self.http_header_span(file_len)
            .map(|span| file_len - span.end as u64)
    }

    /// The cache key with nginx's `"\nKEY: "` / `"\n"` framing removed.
    ///
    /// Returns `None` when the key block is not framed.
    #[must_use]
    pub fn key_text(&self) -> Option<&[u8]> {
        self.cache_key
            .strip_prefix(KEY_PREFIX)
            .and_then(|rest| rest.strip_suffix(KEY_SUFFIX))
    }

    /// Last-Modified of the origin response, if nginx recorded one.
    #[must_use]
    pub fn last_modified(&self) -> Option<u64> {
        (self.last_modified_time != TIMESTAMP_ABSENT).then_some(self.last_modified_time)
    }

    /// Whether the entry is stale at `now` (epoch seconds).
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expire_time != TIMESTAMP_ABSENT && self.expire_time <= now
    }
}
