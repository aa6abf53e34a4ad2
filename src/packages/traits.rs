// src/packages/traits.rs

//! Common types for package metadata readers

use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Name and version as recorded in a package's control data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
}

impl PackageIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// One archive discovered in the target directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveMetadata {
    /// Package name exactly as the archive declares it
    pub raw_name: String,
    /// Package version exactly as the archive declares it
    pub version: String,
    /// Location of the archive file
    pub path: PathBuf,
    /// File size in bytes, when it could be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl ArchiveMetadata {
    pub fn new(identity: PackageIdentity, path: PathBuf) -> Self {
        Self {
            raw_name: identity.name,
            version: identity.version,
            path,
            size: None,
        }
    }

    /// The archive's file name, used in reports
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Reads package name and version from an archive file
///
/// Implementations must be usable from several threads at once; the scanner
/// extracts metadata in parallel.
pub trait MetadataReader: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Read the `Package` and `Version` fields of the archive at `path`
    fn read(&self, path: &Path) -> Result<PackageIdentity>;
}

/// Pull `Package` and `Version` out of a control paragraph
///
/// Field names are matched case-insensitively and continuation lines are
/// skipped. Only the first paragraph is considered.
pub fn parse_control_fields(content: &str) -> std::result::Result<PackageIdentity, String> {
    let mut name = None;
    let mut version = None;
    let mut seen_field = false;

    for line in content.lines() {
        if line.trim().is_empty() {
            if seen_field {
                break;
            }
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            continue;
        }

        if let Some((key, value)) = line.split_once(':') {
            seen_field = true;
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("Package") {
                name = Some(value.to_string());
            } else if key.eq_ignore_ascii_case("Version") {
                version = Some(value.to_string());
            }
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| "control data has no Package field".to_string())?;
    let version = version
        .filter(|v| !v.is_empty())
        .ok_or_else(|| "control data has no Version field".to_string())?;

    Ok(PackageIdentity { name, version })
}
