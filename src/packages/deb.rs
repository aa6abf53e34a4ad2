// src/packages/deb.rs

//! Native reader for Debian package control data
//!
//! DEB packages are ar archives containing:
//! - debian-binary: format version "2.0\n"
//! - control.tar[.gz|.xz|.zst]: package metadata and scripts
//! - data.tar[.gz|.xz|.zst]: file contents (never read here)

use crate::error::{Error, Result};
use crate::packages::traits::{MetadataReader, PackageIdentity, parse_control_fields};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use xz2::read::XzDecoder;

/// Upper bound on the size of the `control` file we are willing to read
pub const MAX_CONTROL_SIZE: u64 = 1024 * 1024;

/// Compression used for the control member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlCompression {
    None,
    Gzip,
    Xz,
    Zstd,
}

impl ControlCompression {
    /// Detect compression from the ar member name
    fn from_member(identifier: &str) -> Option<Self> {
        match identifier {
            "control.tar" => Some(Self::None),
            "control.tar.gz" => Some(Self::Gzip),
            "control.tar.xz" => Some(Self::Xz),
            "control.tar.zst" => Some(Self::Zstd),
            _ => None,
        }
    }
}

/// Reads `Package` and `Version` straight from the archive, no external tools
#[derive(Debug, Clone, Copy, Default)]
pub struct DebControlReader;

impl DebControlReader {
    /// Return the text of the archive's `control` file
    pub fn read_control(path: &Path) -> Result<String> {
        let file = File::open(path)
            .map_err(|e| Error::metadata(path, format!("Failed to open package file: {}", e)))?;
        let mut archive = ar::Archive::new(file);
        let mut saw_debian_binary = false;

        while let Some(entry) = archive.next_entry() {
            let mut entry = entry
                .map_err(|e| Error::metadata(path, format!("Not a Debian archive: {}", e)))?;

            // GNU ar terminates member names with '/'
            let identifier = String::from_utf8_lossy(entry.header().identifier())
                .trim_end_matches('/')
                .to_string();

            if identifier == "debian-binary" {
                saw_debian_binary = true;
                continue;
            }

            let Some(compression) = ControlCompression::from_member(&identifier) else {
                continue;
            };

            if !saw_debian_binary {
                return Err(Error::metadata(
                    path,
                    "control member precedes debian-binary",
                ));
            }

            debug!("Reading {} from {}", identifier, path.display());
            let reader: Box<dyn Read + '_> = match compression {
                ControlCompression::None => Box::new(&mut entry),
                ControlCompression::Gzip => Box::new(GzDecoder::new(&mut entry)),
                ControlCompression::Xz => Box::new(XzDecoder::new(&mut entry)),
                ControlCompression::Zstd => Box::new(zstd::Decoder::new(&mut entry).map_err(
                    |e| Error::metadata(path, format!("Failed to create zstd decoder: {}", e)),
                )?),
            };

            return Self::control_from_tar(path, reader);
        }

        Err(Error::metadata(path, "archive has no control.tar member"))
    }

    /// Find `./control` inside the control tarball
    fn control_from_tar(path: &Path, reader: impl Read) -> Result<String> {
        let mut archive = tar::Archive::new(reader);
        let entries = archive
            .entries()
            .map_err(|e| Error::metadata(path, format!("Failed to read control.tar: {}", e)))?;

        for entry in entries {
            let mut entry = entry.map_err(|e| {
                Error::metadata(path, format!("Failed to read control.tar entry: {}", e))
            })?;

            let entry_path = entry
                .path()
                .map_err(|e| Error::metadata(path, format!("Bad control.tar entry path: {}", e)))?
                .to_string_lossy()
                .to_string();

            if entry_path.trim_start_matches("./") != "control" {
                continue;
            }

            let size = entry.header().size().unwrap_or(0);
            if size > MAX_CONTROL_SIZE {
                return Err(Error::metadata(
                    path,
                    format!("control file is too large ({} bytes)", size),
                ));
            }

            // Only Package and Version matter; other fields may be Latin-1
            let mut content = Vec::new();
            entry
                .read_to_end(&mut content)
                .map_err(|e| Error::metadata(path, format!("Failed to read control file: {}", e)))?;
            return Ok(String::from_utf8_lossy(&content).into_owned());
        }

        Err(Error::metadata(path, "control.tar has no control file"))
    }
}

impl MetadataReader for DebControlReader {
    fn name(&self) -> &'static str {
        "native"
    }

    fn read(&self, path: &Path) -> Result<PackageIdentity> {
        let control = Self::read_control(path)?;
        parse_control_fields(&control).map_err(|reason| Error::metadata(path, reason))
    }
}
