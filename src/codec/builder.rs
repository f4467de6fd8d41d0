//! Construction of complete cache file images.

use super::layout::{self, FIXED_HEADER_SIZE, FORMAT_VERSION, KEY_PREFIX, KEY_SUFFIX};

/// Builds the bytes of a cache file the way nginx lays them out: fixed
/// header, framed key, HTTP response headers, body.
///
/// `header_start` and `body_start` are computed from the parts.
///
/// # Example
///
/// ```
/// use nginx_cache_info::codec::{decode, CacheFileBuilder};
///
/// let bytes = CacheFileBuilder::new("httpexample.com/")
///     .expire_time(1_700_000_000)
///     .body(b"hello")
///     .build();
/// let header = decode(&bytes).unwrap();
/// assert_eq!(header.expire_time, 1_700_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct CacheFileBuilder {
    key: Vec<u8>,
    expire_time: u64,
    updating_sec: u64,
    error_sec: u64,
    last_modified_time: u64,
    creation_time: u64,
    crc32: u32,
    valid_msec: u16,
    etag: Vec<u8>,
    vary: Vec<u8>,
    variant: [u8; 16],
    http_headers: Vec<u8>,
    body: Vec<u8>,
}

impl CacheFileBuilder {
    /// Start a file for `key` (unframed; framing is added on build).
    #[must_use]
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
            expire_time: 0,
            updating_sec: 0,
            error_sec: 0,
            last_modified_time: layout::TIMESTAMP_ABSENT,
            creation_time: 0,
            crc32: 0,
            valid_msec: 0,
            etag: Vec::new(),
            vary: Vec::new(),
            variant: [0; 16],
            http_headers: Vec::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn expire_time(mut self, secs: u64) -> Self {
        self.expire_time = secs;
        self
    }

    #[must_use]
    pub fn updating_sec(mut self, secs: u64) -> Self {
        self.updating_sec = secs;
        self
    }

    #[must_use]
    pub fn error_sec(mut self, secs: u64) -> Self {
        self.error_sec = secs;
        self
    }

    #[must_use]
    pub fn last_modified_time(mut self, secs: u64) -> Self {
        self.last_modified_time = secs;
        self
    }

    #[must_use]
    pub fn creation_time(mut self, secs: u64) -> Self {
        self.creation_time = secs;
        self
    }

    #[must_use]
    pub fn crc32(mut self, crc: u32) -> Self {
        self.crc32 = crc;
        self
    }

    #[must_use]
    pub fn valid_msec(mut self, msec: u16) -> Self {
        self.valid_msec = msec;
        self
    }

    /// ETag value; anything past 128 bytes is dropped.
    #[must_use]
    pub fn etag(mut self, etag: &[u8]) -> Self {
        self.etag = etag[..etag.len().min(layout::ETAG.width)].to_vec();
        self
    }

    /// Vary value; anything past 128 bytes is dropped.
    #[must_use]
    pub fn vary(mut self, vary: &[u8]) -> Self {
        self.vary = vary[..vary.len().min(layout::VARY.width)].to_vec();
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: [u8; 16]) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn http_headers(mut self, headers: &[u8]) -> Self {
        self.http_headers = headers.to_vec();
        self
    }

    #[must_use]
    pub fn body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        self
    }

    /// Length of the framed key block this builder will emit.
    #[must_use]
    pub fn key_block_len(&self) -> usize {
        KEY_PREFIX.len() + self.key.len() + KEY_SUFFIX.len()
    }

    /// Assemble the file image.
    ///
    /// Offsets past 65535 cannot be represented by nginx and are clamped,
    /// which yields a file the decoder will reject.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let header_start = FIXED_HEADER_SIZE + self.key_block_len();
        let body_start = header_start + self.http_headers.len();

        let mut out = vec![0u8; FIXED_HEADER_SIZE];
        layout::VERSION.write_uint(&mut out, FORMAT_VERSION);
        layout::VALID_SEC.write_uint(&mut out, self.expire_time);
        layout::UPDATING_SEC.write_uint(&mut out, self.updating_sec);
        layout::ERROR_SEC.write_uint(&mut out, self.error_sec);
        layout::LAST_MODIFIED.write_uint(&mut out, self.last_modified_time);
        layout::DATE.write_uint(&mut out, self.creation_time);
        layout::CRC32.write_uint(&mut out, u64::from(self.crc32));
        layout::VALID_MSEC.write_uint(&mut out, u64::from(self.valid_msec));
        layout::HEADER_START.write_uint(&mut out, header_start.min(0xffff) as u64);
        layout::BODY_START.write_uint(&mut out, body_start.min(0xffff) as u64);
        layout::ETAG_LEN.write_uint(&mut out, self.etag.len() as u64);
        out[layout::ETAG.offset..layout::ETAG.offset + self.etag.len()].copy_from_slice(&self.etag);
        layout::VARY_LEN.write_uint(&mut out, self.vary.len() as u64);
        out[layout::VARY.offset..layout::VARY.offset + self.vary.len()].copy_from_slice(&self.vary);
        out[layout::VARIANT.range()].copy_from_slice(&self.variant);

        out.extend_from_slice(KEY_PREFIX);
        out.extend_from_slice(&self.key);
        out.extend_from_slice(KEY_SUFFIX);
        out.extend_from_slice(&self.http_headers);
        out.extend_from_slice(&self.body);
        out
    }
}
