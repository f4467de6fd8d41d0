//! Error type for header decoding and patching.

use std::io;

use thiserror::Error;

/// Errors produced while decoding or patching a cache file header.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Fewer bytes than the fixed header region were supplied.
    #[error("truncated input: {len} bytes, header needs {required}")]
    TruncatedInput { len: usize, required: usize },

    /// The header's version field does not match the pinned layout.
    #[error("unsupported cache file version {0}")]
    UnsupportedVersion(u64),

    /// The key block would start inside the fixed region or end past EOF.
    #[error("malformed key length: key ends at byte {header_start}, file is {file_len} bytes")]
    MalformedKeyLength { header_start: u64, file_len: u64 },

    /// The new expiry cannot be stored in the field's fixed width.
    #[error("expiry value {value} does not fit the {width}-byte expiry field")]
    OutOfRange { value: i64, width: usize },

    /// Filesystem failure while reading or writing the cache file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    /// Short machine-readable name of the failure kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TruncatedInput { .. } => "TruncatedInput",
            Self::UnsupportedVersion(_) => "UnsupportedVersion",
            Self::MalformedKeyLength { .. } => "MalformedKeyLength",
            Self::OutOfRange { .. } => "OutOfRange",
            Self::Io(_) => "IOFailure",
        }
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
