//! Header codec for nginx proxy cache files.
//!
//! An nginx cache file starts with a fixed-size binary header, followed by
//! the cache key, the cached HTTP response headers and the body:
//!
//! ```text
//! +----------------------+  0
//! | fixed header (336 B) |
//! +----------------------+  FIXED_HEADER_SIZE
//! | "\nKEY: " key "\n"   |
//! +----------------------+  header_start
//! | HTTP response header |
//! +----------------------+  body_start
//! | body                 |
//! +----------------------+  EOF
//! ```
//!
//! # Architecture
//!
//! * [`layout`]: offset/width/byte-order table, the only place offsets live.
//! * [`header`]: pure decode and full re-encode of the header.
//! * [`patch`]: expiry encoding and the in-place file patch.
//! * [`file`]: reading the header prefix of a file from disk.
//! * [`builder`]: assembling complete cache file images.
//!
//! # Example
//!
//! ```no_run
//! use nginx_cache_info::codec::{patch_expiry, read_cache_file};
//! use std::path::Path;
//!
//! let path = Path::new("/var/cache/nginx/c/29/b7f54b2df7773722d382f4809d65029c");
//! let info = read_cache_file(path).unwrap();
//! println!("expires at {}", info.header.expire_time);
//!
//! patch_expiry(path, 1_900_000_000).unwrap();
//! ```

pub mod builder;
pub mod error;
pub mod file;
pub mod header;
pub mod layout;
pub mod patch;

pub use builder::CacheFileBuilder;
pub use error::{CodecError, CodecResult};
pub use file::{read_cache_file, CacheFileInfo};
pub use header::{decode, decode_with_len, encode_full, CacheHeader};
pub use layout::FIXED_HEADER_SIZE;
pub use patch::{encode_expiry, patch_expiry, FieldPatch};
