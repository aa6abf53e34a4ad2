// src/retention/scan.rs

//! Directory scanning and grouping
//!
//! Lists the archives in the target directory, extracts their metadata and
//! files each one under its normalized name. A file whose metadata cannot be
//! read is recorded as a failure and left out of every group.

use crate::error::{Error, Result};
use crate::packages::{ARCHIVE_EXTENSION, ArchiveMetadata, MetadataReader};
use crate::retention::normalize::normalize_name;
use crate::version::DebVersion;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Normalized name → version string → archive
pub type NormalizedGroups = BTreeMap<String, BTreeMap<String, ArchiveMetadata>>;

/// An archive that was skipped because its metadata could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning one directory
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Number of archive files found, readable or not
    pub archives_found: usize,
    pub groups: NormalizedGroups,
    pub failures: Vec<ScanFailure>,
}

/// Fail unless `dir` exists and is a directory
pub fn validate_directory(dir: &Path) -> Result<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::Configuration(format!(
            "'{}' is not a directory",
            dir.display()
        ))),
        Err(e) => Err(Error::Configuration(format!(
            "Cannot access directory '{}': {}",
            dir.display(),
            e
        ))),
    }
}

/// List `.deb` files directly inside `dir`, sorted by file name
pub fn list_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            Error::Configuration(format!("Cannot list directory '{}': {}", dir.display(), e))
        })?;
        let path = entry.path();

        let is_archive = path
            .extension()
            .is_some_and(|ext| ext == ARCHIVE_EXTENSION);
        // is_file() follows symlinks, so linked archives count too
        if is_archive && path.is_file() {
            archives.push(path.to_path_buf());
        }
    }

    debug!("Found {} archives in {}", archives.len(), dir.display());
    Ok(archives)
}

/// Read metadata for one archive and check that its version is usable
pub fn extract_archive(path: &Path, reader: &dyn MetadataReader) -> Result<ArchiveMetadata> {
    let identity = reader.read(path).map_err(|e| match e {
        Error::MetadataExtraction { .. } => e,
        other => Error::metadata(path, other.to_string()),
    })?;

    // dpkg refuses these outright; anything else it only warns about
    let (_, problems) = DebVersion::parse_with_warnings(&identity.version)
        .map_err(|e| Error::metadata(path, e.to_string()))?;
    for problem in problems {
        warn!(
            "{}: version '{}' {}",
            path.display(),
            identity.version,
            problem
        );
    }

    let mut archive = ArchiveMetadata::new(identity, path.to_path_buf());
    archive.size = std::fs::metadata(path).ok().map(|m| m.len());
    Ok(archive)
}

/// Extract metadata for every path, keeping input order
///
/// `jobs` caps the number of worker threads; `Some(1)` runs sequentially and
/// `None` uses rayon's global pool.
pub fn extract_all(
    paths: &[PathBuf],
    reader: &dyn MetadataReader,
    jobs: Option<usize>,
) -> Result<Vec<Result<ArchiveMetadata>>> {
    let extract = |path: &PathBuf| extract_archive(path, reader);

    let results: Vec<Result<ArchiveMetadata>> = match jobs {
        Some(1) => paths.iter().map(extract).collect(),
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| {
                    Error::Configuration(format!("Failed to start {} workers: {}", threads, e))
                })?;
            pool.install(|| paths.par_iter().map(extract).collect())
        }
        None => paths.par_iter().map(extract).collect(),
    };

    Ok(results)
}

/// File archives under their normalized names
///
/// If two archives in one group declare the same version, the later one wins.
pub fn group_archives(archives: impl IntoIterator<Item = ArchiveMetadata>) -> NormalizedGroups {
    let mut groups = NormalizedGroups::new();

    for archive in archives {
        let key = normalize_name(&archive.raw_name);
        let versions = groups.entry(key.clone()).or_default();
        if let Some(previous) = versions.insert(archive.version.clone(), archive) {
            warn!(
                "Duplicate version {} in group {}; ignoring {}",
                previous.version,
                key,
                previous.path.display()
            );
        }
    }

    groups
}

/// Scan `dir` with `reader` and group what was found
pub fn scan_directory(
    dir: &Path,
    reader: &dyn MetadataReader,
    jobs: Option<usize>,
) -> Result<ScanOutcome> {
    validate_directory(dir)?;

    let paths = list_archives(dir)?;
    info!(
        "Reading metadata for {} archives with the {} reader",
        paths.len(),
        reader.name()
    );

    let mut archives = Vec::with_capacity(paths.len());
    let mut failures = Vec::new();

    for (path, result) in paths.iter().zip(extract_all(&paths, reader, jobs)?) {
        match result {
            Ok(archive) => archives.push(archive),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                failures.push(ScanFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(ScanOutcome {
        archives_found: paths.len(),
        groups: group_archives(archives),
        failures,
    })
}
