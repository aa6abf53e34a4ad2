// src/packages/dpkg_deb.rs

//! Read package metadata with the `dpkg-deb` command-line tool

use crate::error::{Error, Result};
use crate::packages::traits::{MetadataReader, PackageIdentity, parse_control_fields};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs `dpkg-deb --field <archive> Package Version` per archive
#[derive(Debug, Clone)]
pub struct DpkgDebReader {
    program: PathBuf,
}

impl DpkgDebReader {
    /// Find `dpkg-deb` on PATH
    pub fn locate() -> Result<Self> {
        let program = which::which("dpkg-deb").map_err(|e| {
            Error::Configuration(format!("Cannot read packages with dpkg-deb: {}", e))
        })?;
        debug!("Using {} for metadata extraction", program.display());
        Ok(Self { program })
    }

    /// Use a specific `dpkg-deb` executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MetadataReader for DpkgDebReader {
    fn name(&self) -> &'static str {
        "dpkg-deb"
    }

    fn read(&self, path: &Path) -> Result<PackageIdentity> {
        let output = Command::new(&self.program)
            .arg("--field")
            .arg(path)
            .args(["Package", "Version"])
            .output()
            .map_err(|e| {
                Error::metadata(
                    path,
                    format!("Failed to run {}: {}", self.program.display(), e),
                )
            })?;

        if !output.status.success() {
            return Err(Error::metadata(
                path,
                format!(
                    "dpkg-deb failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        parse_control_fields(&String::from_utf8_lossy(&output.stdout))
            .map_err(|reason| Error::metadata(path, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_extraction_error() {
        let reader = DpkgDebReader::with_program("/nonexistent/dpkg-deb");
        let err = reader.read(Path::new("foo.deb")).unwrap_err();
        assert!(matches!(err, Error::MetadataExtraction { .. }));
        assert!(err.to_string().contains("/nonexistent/dpkg-deb"));
    }
}
