use nginx_cache_info::codec::{
    decode, encode_expiry, encode_full, layout, patch_expiry, CacheFileBuilder, CodecError,
    FIXED_HEADER_SIZE,
};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

prop_compose! {
    fn cache_file()(
        key in proptest::collection::vec(any::<u8>(), 0..200),
        expire in any::<u64>(),
        created in any::<u64>(),
        last_modified in any::<u64>(),
        crc in any::<u32>(),
        etag in proptest::collection::vec(1u8..=255, 0..128),
        vary in proptest::collection::vec(1u8..=255, 0..128),
        variant in any::<[u8; 16]>(),
        headers in proptest::collection::vec(any::<u8>(), 0..300),
        body in proptest::collection::vec(any::<u8>(), 0..300),
    ) -> Vec<u8> {
        CacheFileBuilder::new(&key)
            .expire_time(expire)
            .creation_time(created)
            .last_modified_time(last_modified)
            .crc32(crc)
            .etag(&etag)
            .vary(&vary)
            .variant(variant)
            .http_headers(&headers)
            .body(&body)
            .build()
    }
}

proptest! {
    #[test]
    fn test_decode_encode_round_trip(bytes in cache_file()) {
        let header = decode(&bytes).unwrap();
        let encoded = encode_full(&header);
        prop_assert_eq!(&encoded[..], &bytes[..usize::from(header.header_start)]);
        prop_assert_eq!(decode(&encoded).unwrap(), header);
    }

    #[test]
    fn test_patch_changes_only_expiry(bytes in cache_file(), expire in 0i64..=i64::MAX) {
        let header = decode(&bytes).unwrap();
        let patch = encode_expiry(&header, expire).unwrap();

        let mut patched = bytes.clone();
        patch.apply(&mut patched);

        let span = layout::EXPIRY_FIELD.range();
        prop_assert_eq!(&patched[..span.start], &bytes[..span.start]);
        prop_assert_eq!(&patched[span.end..], &bytes[span.end..]);

        let mut expected = header.clone();
        expected.expire_time = expire as u64;
        expected.raw_header_bytes = patched[..FIXED_HEADER_SIZE].to_vec();
        prop_assert_eq!(decode(&patched).unwrap(), expected);
    }

    #[test]
    fn test_negative_expiry_rejected(bytes in cache_file(), expire in i64::MIN..0) {
        let header = decode(&bytes).unwrap();
        let is_out_of_range = matches!(
            encode_expiry(&header, expire),
            Err(CodecError::OutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
    }

    #[test]
    fn test_short_input_is_truncated(bytes in proptest::collection::vec(any::<u8>(), 0..FIXED_HEADER_SIZE)) {
        let is_truncated = matches!(decode(&bytes), Err(CodecError::TruncatedInput { .. }));
        prop_assert!(is_truncated);
    }

    #[test]
    fn test_arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn test_failed_patch_leaves_file_unchanged(bytes in cache_file(), expire in i64::MIN..0) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entry");
        fs::write(&path, &bytes).unwrap();
        let before = blake3::hash(&fs::read(&path).unwrap());

        prop_assert!(patch_expiry(&path, expire).is_err());

        let after = blake3::hash(&fs::read(&path).unwrap());
        prop_assert_eq!(before, after);
    }
}
