//! On-disk layout of the nginx cache file header.
//!
//! nginx writes `ngx_http_file_cache_header_t` verbatim at offset 0 of each
//! cache file, so the layout depends on the build (pointer width, `time_t`
//! size, endianness). The table below is pinned to Linux x86_64 builds
//! (format version 5, nginx 1.x). Every offset used by the codec comes from
//! this module; a format change is an edit here and nowhere else.
//!
//! ```text
//! offset  width  field
//!      0      8  version
//!      8      8  valid_sec        (expiry)
//!     16      8  updating_sec
//!     24      8  error_sec
//!     32      8  last_modified
//!     40      8  date             (creation)
//!     48      4  crc32
//!     52      2  valid_msec
//!     54      2  header_start
//!     56      2  body_start
//!     58      1  etag_len
//!     59    128  etag
//!    187      1  vary_len
//!    188    128  vary
//!    316     16  variant
//!    332      4  padding
//! ```

use std::ops::Range;

use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

/// Cache file format version this layout describes.
pub const FORMAT_VERSION: u64 = 5;

/// Length of the fixed-width header region.
pub const FIXED_HEADER_SIZE: usize = 336;

/// Timestamp value nginx uses for "not set" (`(time_t) -1`).
pub const TIMESTAMP_ABSENT: u64 = u64::MAX;

/// Framing written by nginx in front of the cache key.
pub const KEY_PREFIX: &[u8] = b"\nKEY: ";

/// Framing written by nginx after the cache key.
pub const KEY_SUFFIX: &[u8] = b"\n";

/// Byte order of an integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Position, width and encoding of one header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name as it appears in nginx's header struct.
    pub name: &'static str,
    /// Absolute offset from the start of the file.
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
    /// Byte order for integer fields; ignored for byte arrays.
    pub order: ByteOrder,
}

impl FieldSpec {
    const fn new(name: &'static str, offset: usize, width: usize) -> Self {
        Self {
            name,
            offset,
            width,
            order: ByteOrder::Little,
        }
    }

    /// Byte range occupied by the field.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.width
    }

    /// First byte after the field.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Largest unsigned value the field can hold.
    #[must_use]
    pub const fn max_value(&self) -> u64 {
        if self.width >= 8 {
            u64::MAX
        } else {
            (1u64 << (self.width * 8)) - 1
        }
    }

    /// Read the field as an unsigned integer.
    ///
    /// # Panics
    ///
    /// Panics if `buf` does not cover the field or the field is wider than
    /// eight bytes.
    #[must_use]
    pub fn read_uint(&self, buf: &[u8]) -> u64 {
        let bytes = &buf[self.range()];
        match self.order {
            ByteOrder::Little => LittleEndian::read_uint(bytes, self.width),
            ByteOrder::Big => BigEndian::read_uint(bytes, self.width),
        }
    }

    /// Encode `value` into exactly `width` bytes, or `None` when it does
    /// not fit.
    #[must_use]
    pub fn encode_uint(&self, value: u64) -> Option<Vec<u8>> {
        if self.width > 8 || value > self.max_value() {
            return None;
        }
        let mut out = vec![0u8; self.width];
        match self.order {
            ByteOrder::Little => LittleEndian::write_uint(&mut out, value, self.width),
            ByteOrder::Big => BigEndian::write_uint(&mut out, value, self.width),
        }
        Some(out)
    }

    /// Write `value` into the field's span of `buf`.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not fit the field or `buf` does not cover
    /// it. Use [`FieldSpec::encode_uint`] for values that are not bounded
    /// by their type.
    pub fn write_uint(&self, buf: &mut [u8], value: u64) {
        let span = &mut buf[self.range()];
        match self.order {
            ByteOrder::Little => LittleEndian::write_uint(span, value, self.width),
            ByteOrder::Big => BigEndian::write_uint(span, value, self.width),
        }
    }
}

pub const VERSION: FieldSpec = FieldSpec::new("version", 0, 8);
pub const VALID_SEC: FieldSpec = FieldSpec::new("valid_sec", 8, 8);
pub const UPDATING_SEC: FieldSpec = FieldSpec::new("updating_sec", 16, 8);
pub const ERROR_SEC: FieldSpec = FieldSpec::new("error_sec", 24, 8);
pub const LAST_MODIFIED: FieldSpec = FieldSpec::new("last_modified", 32, 8);
pub const DATE: FieldSpec = FieldSpec::new("date", 40, 8);
pub const CRC32: FieldSpec = FieldSpec::new("crc32", 48, 4);
pub const VALID_MSEC: FieldSpec = FieldSpec::new("valid_msec", 52, 2);
pub const HEADER_START: FieldSpec = FieldSpec::new("header_start", 54, 2);
pub const BODY_START: FieldSpec = FieldSpec::new("body_start", 56, 2);
pub const ETAG_LEN: FieldSpec = FieldSpec::new("etag_len", 58, 1);
pub const ETAG: FieldSpec = FieldSpec::new("etag", 59, 128);
pub const VARY_LEN: FieldSpec = FieldSpec::new("vary_len", 187, 1);
pub const VARY: FieldSpec = FieldSpec::new("vary", 188, 128);
pub const VARIANT: FieldSpec = FieldSpec::new("variant", 316, 16);
pub const PADDING: FieldSpec = FieldSpec::new("padding", 332, 4);

/// Every field in file order, padding included.
pub const FIELDS: [FieldSpec; 16] = [
    VERSION,
    VALID_SEC,
    UPDATING_SEC,
    ERROR_SEC,
    LAST_MODIFIED,
    DATE,
    CRC32,
    VALID_MSEC,
    HEADER_START,
    BODY_START,
    ETAG_LEN,
    ETAG,
    VARY_LEN,
    VARY,
    VARIANT,
    PADDING,
];

/// The field `--set-expire` rewrites.
pub const EXPIRY_FIELD: FieldSpec = VALID_SEC;
