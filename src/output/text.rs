//! Human-readable report for one cache file.
//!
//! ```text
//! ** Nginx cache header ** /var/cache/nginx/c/29/b7f5...
//! version: 5
//! valid_sec: 2017-07-14T02:40:00Z (1500000000) expired
//! ...
//!
//! ** Nginx cache key **
//! httpexample.com/index.html
//!
//! ** HTTP headers **
//! HTTP/1.1 200 OK
//!
//! ** HTTP body length **
//! 13 (13 B)
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use super::{key_string, text_field, variant_hex};
use crate::codec::CacheFileInfo;
use crate::datetime::{format_timestamp, now_epoch};

/// Text formatter for a decoded file.
pub struct TextOutput<'a> {
    info: &'a CacheFileInfo,
    utc: bool,
    now: u64,
}

impl<'a> TextOutput<'a> {
    #[must_use]
    pub fn new(info: &'a CacheFileInfo, utc: bool) -> Self {
        Self {
            info,
            utc,
            now: now_epoch(),
        }
    }

    /// Judge staleness at `now` (epoch seconds) instead of the current time.
    #[must_use]
    pub fn with_now(mut self, now: u64) -> Self {
        self.now = now;
        self
    }

    fn timestamp(&self, secs: u64) -> String {
        match format_timestamp(secs, self.utc) {
            Some(date) => format!("{date} ({secs})"),
            None => "None".to_string(),
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let header = &self.info.header;
        let none = || "None".to_string();

        writeln!(
            writer,
            "{} {}",
            "** Nginx cache header **".bold(),
            self.info.path.display()
        )?;
        writeln!(writer, "version: {}", header.version)?;
        write!(writer, "valid_sec: {}", self.timestamp(header.expire_time))?;
        if header.is_expired_at(self.now) {
            write!(writer, " {}", "expired".yellow())?;
        }
        writeln!(writer)?;
        writeln!(writer, "updating_sec: {}", header.updating_sec)?;
        writeln!(writer, "error_sec: {}", header.error_sec)?;
        writeln!(
            writer,
            "last_modified: {}",
            self.timestamp(header.last_modified_time)
        )?;
        writeln!(writer, "date: {}", self.timestamp(header.creation_time))?;
        writeln!(writer, "crc32: {:#010x}", header.crc32)?;
        writeln!(writer, "valid_msec: {}", header.valid_msec)?;
        writeln!(writer, "header_start: {}", header.header_start)?;
        writeln!(writer, "body_start: {}", header.body_start)?;
        writeln!(writer, "etag_len: {}", header.etag.len())?;
        writeln!(
            writer,
            "etag: {}",
            text_field(&header.etag).unwrap_or_else(none)
        )?;
        writeln!(writer, "vary_len: {}", header.vary.len())?;
        writeln!(
            writer,
            "vary: {}",
            text_field(&header.vary).unwrap_or_else(none)
        )?;
        writeln!(
            writer,
            "variant: {}",
            variant_hex(&header.variant).unwrap_or_else(none)
        )?;

        writeln!(writer, "\n{}", "** Nginx cache key **".bold())?;
        writeln!(writer, "{}", key_string(header))?;

        writeln!(writer, "\n{}", "** HTTP headers **".bold())?;
        match &self.info.http_headers {
            Some(block) => writeln!(writer, "{}", String::from_utf8_lossy(block).trim())?,
            None => writeln!(writer, "{}", "(header block out of bounds)".yellow())?,
        }

        writeln!(writer, "\n{}", "** HTTP body length **".bold())?;
        match self.info.body_len() {
            Some(len) => writeln!(writer, "{} ({})", len, ByteSize(len))?,
            None => writeln!(writer, "unknown")?,
        }
        Ok(())
    }

    /// Render the report into a string.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, CacheFileBuilder};
    use std::path::PathBuf;

    fn info() -> CacheFileInfo {
        let bytes = CacheFileBuilder::new("httpexample.com/index.html")
            .expire_time(1_500_000_000)
            .creation_time(1_499_999_000)
            .etag(b"\"v1\"")
            .http_headers(b"HTTP/1.1 200 OK\r\nServer: nginx\r\n\r\n")
            .body(&[b'x'; 2048])
            .build();
        let header = decode(&bytes).unwrap();
        let http_headers = header
            .http_header_span(bytes.len() as u64)
            .map(|span| bytes[span].to_vec());
        CacheFileInfo {
            path: PathBuf::from("/cache/entry"),
            file_len: bytes.len() as u64,
            header,
            http_headers,
        }
    }

    #[test]
    fn test_text_report_sections() {
        yansi::disable();
        let info = info();
        let text = TextOutput::new(&info, true).to_string_lossy();

        assert!(text.starts_with("** Nginx cache header ** /cache/entry\n"));
        assert!(text.contains("valid_sec: 2017-07-14T02:40:00Z (1500000000) expired\n"));
        assert!(text.contains("last_modified: None\n"));
        assert!(text.contains("etag: \"v1\"\n"));
        assert!(text.contains("vary: None\n"));
        assert!(text.contains("** Nginx cache key **\nhttpexample.com/index.html\n"));
        assert!(text.contains("HTTP/1.1 200 OK\r\nServer: nginx\n"));
        assert!(text.contains("** HTTP body length **\n2048 ("));
    }

    #[test]
    fn test_fresh_entry_has_no_marker() {
        yansi::disable();
        let info = info();
        let text = TextOutput::new(&info, true)
            .with_now(1_499_999_999)
            .to_string_lossy();
        assert!(text.contains("valid_sec: 2017-07-14T02:40:00Z (1500000000)\n"));
    }
}
