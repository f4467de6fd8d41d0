//! Integration tests for batch error handling and exit codes.
//!
//! These tests drive `run_app` the way `main` does and check that one bad
//! file never blocks the others and never gets written to.

use clap::Parser;
use nginx_cache_info::cli::Cli;
use nginx_cache_info::codec::{decode, CacheFileBuilder};
use nginx_cache_info::error::ExitCode;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_entry(path: &Path, expire: u64) -> Vec<u8> {
    let bytes = CacheFileBuilder::new("httpexample.com/")
        .expire_time(expire)
        .creation_time(1_000)
        .http_headers(b"HTTP/1.1 200 OK\r\n\r\n")
        .body(b"body")
        .build();
    fs::write(path, &bytes).unwrap();
    bytes
}

fn run(args: &[&str]) -> ExitCode {
    let mut argv = vec!["nginx-cache-info", "--quiet"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    nginx_cache_info::run_app(cli).unwrap()
}

#[test]
fn test_exit_code_success() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entry");
    write_entry(&path, 10);

    assert_eq!(run(&[path.to_str().unwrap()]), ExitCode::Success);
}

#[test]
fn test_exit_code_zero_length_files() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::write(&a, b"").unwrap();
    fs::write(&b, b"").unwrap();

    let code = run(&[
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--set-expire",
        "2030-01-01",
        "--utc",
    ]);
    assert_eq!(code, ExitCode::FileErrors);
    assert_ne!(code.as_i32(), 0);
    assert!(fs::read(&a).unwrap().is_empty());
    assert!(fs::read(&b).unwrap().is_empty());
}

#[test]
fn test_bad_file_does_not_block_patch_of_others() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("bad");
    let good = dir.path().join("good");
    fs::write(&bad, b"garbage").unwrap();
    write_entry(&good, 10);

    let code = run(&[
        bad.to_str().unwrap(),
        good.to_str().unwrap(),
        "--set-expire",
        "2017-07-14T02:40:00",
        "--utc",
    ]);
    assert_eq!(code, ExitCode::FileErrors);
    assert_eq!(fs::read(&bad).unwrap(), b"garbage");
    let header = decode(&fs::read(&good).unwrap()).unwrap();
    assert_eq!(header.expire_time, 1_500_000_000);
}

#[test]
fn test_missing_file_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    assert_eq!(run(&[missing.to_str().unwrap()]), ExitCode::FileErrors);
}

#[test]
fn test_directory_argument_patches_tree() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("c").join("29");
    fs::create_dir_all(&sub).unwrap();
    let a = sub.join("a");
    let b = dir.path().join("b");
    let before_a = write_entry(&a, 1);
    write_entry(&b, 2);

    let code = run(&[
        dir.path().to_str().unwrap(),
        "--set-expire",
        "2017-07-14T04:40:00+02:00",
    ]);
    assert_eq!(code, ExitCode::Success);

    let after_a = fs::read(&a).unwrap();
    assert_eq!(decode(&after_a).unwrap().expire_time, 1_500_000_000);
    assert_eq!(after_a[16..], before_a[16..]);
    assert_eq!(decode(&fs::read(&b).unwrap()).unwrap().expire_time, 1_500_000_000);
}

#[test]
fn test_json_and_csv_output_modes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entry");
    write_entry(&path, 10);

    for format in ["json", "csv", "text"] {
        let cli = Cli::try_parse_from([
            "nginx-cache-info",
            "--output",
            format,
            "--no-color",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(nginx_cache_info::run_app(cli).unwrap(), ExitCode::Success);
    }
}

#[test]
fn test_unparsable_date_rejected_before_processing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("entry");
    let before = write_entry(&path, 10);

    let result = Cli::try_parse_from([
        "nginx-cache-info",
        path.to_str().unwrap(),
        "--set-expire",
        "next tuesday",
    ]);
    assert!(result.is_err());
    assert_eq!(fs::read(&path).unwrap(), before);
}
