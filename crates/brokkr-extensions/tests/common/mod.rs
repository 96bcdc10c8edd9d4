//! Shared helpers for extension integration tests
//!
//! Builds real pack archives (.tar.gz with an extension.yaml at the root)
//! in temporary directories so tests drive the loader the way a user
//! install would.

#![allow(dead_code)]

use std::io::Write as _;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Write a pack archive containing a manifest and optional extra files.
/// Extra files are added with the executable bit set so scripts run after
/// unpacking.
pub fn write_pack(
    dir: &Path,
    archive_name: &str,
    manifest_yaml: &str,
    files: &[(&str, &str)],
) -> PathBuf {
    let path = dir.join(archive_name);
    let file = std::fs::File::create(&path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    append_file(&mut builder, "extension.yaml", manifest_yaml.as_bytes(), 0o644);
    for (name, content) in files {
        append_file(&mut builder, name, content.as_bytes(), 0o755);
    }

    let mut encoder = builder.into_inner().unwrap();
    encoder.flush().unwrap();
    encoder.finish().unwrap();
    path
}

fn append_file<W: std::io::Write>(
    builder: &mut tar::Builder<W>,
    path: &str,
    data: &[u8],
    mode: u32,
) {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(mode);
    header.set_cksum();
    builder.append_data(&mut header, path, data).unwrap();
}

/// A minimal manifest declaring one command
pub fn manifest_yaml(
    pack: &str,
    command: &str,
    description: &str,
    profiles: &[&str],
    program: &str,
) -> String {
    let profiles = if profiles.is_empty() {
        String::new()
    } else {
        format!("    profiles: [{}]\n", profiles.join(", "))
    };

    format!(
        "metadata:\n  name: {pack}\n  version: \"1.0.0\"\n  description: test pack\ncommands:\n  - name: {command}\n    description: {description}\n{profiles}    exec:\n      program: {program}\n"
    )
}
