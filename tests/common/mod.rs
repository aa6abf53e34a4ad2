// tests/common/mod.rs

//! Shared test utilities: builds real .deb archives in temporary directories.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xz2::write::XzEncoder;

/// Compression used for the control.tar member of a fixture
#[derive(Debug, Clone, Copy)]
pub enum ControlCompression {
    None,
    Gzip,
    Xz,
    Zstd,
}

impl ControlCompression {
    fn member_name(self) -> &'static str {
        match self {
            Self::None => "control.tar",
            Self::Gzip => "control.tar.gz",
            Self::Xz => "control.tar.xz",
            Self::Zstd => "control.tar.zst",
        }
    }

    fn compress(self, data: Vec<u8>) -> Vec<u8> {
        match self {
            Self::None => data,
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&data).unwrap();
                encoder.finish().unwrap()
            }
            Self::Xz => {
                let mut encoder = XzEncoder::new(Vec::new(), 6);
                encoder.write_all(&data).unwrap();
                encoder.finish().unwrap()
            }
            Self::Zstd => zstd::encode_all(data.as_slice(), 0).unwrap(),
        }
    }
}

/// Tar up a single `./control` file
fn control_tar(control: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(control.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "./control", control.as_bytes())
        .unwrap();
    builder.into_inner().unwrap()
}

/// Write a .deb whose control file declares `package` and `version`
pub fn write_deb_with(
    dir: &Path,
    file_name: &str,
    package: &str,
    version: &str,
    compression: ControlCompression,
) -> PathBuf {
    let control = format!(
        "Package: {}\nVersion: {}\nArchitecture: amd64\nMaintainer: Test <test@example.com>\nDescription: test fixture\n fixture package\n",
        package, version
    );
    let control_member = compression.compress(control_tar(&control));
    let empty_tar = tar::Builder::new(Vec::new()).into_inner().unwrap();
    let data_member = ControlCompression::Gzip.compress(empty_tar);

    let path = dir.join(file_name);
    let mut builder = ar::Builder::new(File::create(&path).unwrap());
    for (name, data) in [
        ("debian-binary", b"2.0\n".to_vec()),
        (compression.member_name(), control_member),
        ("data.tar.gz", data_member),
    ] {
        let header = ar::Header::new(name.as_bytes().to_vec(), data.len() as u64);
        builder.append(&header, data.as_slice()).unwrap();
    }

    path
}

/// Write a gzip-compressed .deb named the way dpkg-deb --build would
pub fn write_deb(dir: &Path, package: &str, version: &str) -> PathBuf {
    let file_version = version.split_once(':').map_or(version, |(_, v)| v);
    let file_name = format!("{}_{}_amd64.deb", package, file_version);
    write_deb_with(dir, &file_name, package, version, ControlCompression::Gzip)
}

/// Write a file with a .deb name that is not an archive
pub fn write_garbage(dir: &Path, file_name: &str) -> PathBuf {
    let path = dir.join(file_name);
    File::create(&path)
        .unwrap()
        .write_all(b"this is not an ar archive")
        .unwrap();
    path
}

/// File names left in `dir`, sorted
pub fn remaining(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// A temporary directory of kernel and userland packages.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn setup_package_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (package, version) in [
        ("linux-image-5.15.26-grsec-securedrop", "5.15.26-grsec-securedrop-1"),
        ("linux-image-5.10.0-grsec-securedrop", "5.10.0-grsec-securedrop-1"),
        ("linux-image-5.18.1-grsec-securedrop", "5.18.1-grsec-securedrop-1"),
        ("foo", "1.0"),
        ("foo", "2.0"),
    ] {
        write_deb(dir.path(), package, version);
    }
    dir
}
