// tests/common/mod.rs
//! Shared fixtures for end-to-end bridge tests.

pub mod fixtures;

use std::io::Write;

use tempfile::NamedTempFile;

/// Write `contents` to a temp file with the given extension.
pub fn spec_file(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("create temp spec");
    file.write_all(contents.as_bytes()).expect("write temp spec");
    file
}
