// src/retention/mod.rs

//! Retention engine
//!
//! One pass over a directory of `.deb` archives:
//!
//! 1. List the archives and read each one's name and version
//! 2. Group them by normalized package name
//! 3. Sort each group newest first and split it at the keep-count
//! 4. Delete everything past the split and report what happened
//!
//! Nothing is removed until the whole plan has been built, and a problem
//! with one archive never stops work on the others.

pub mod executor;
pub mod normalize;
pub mod planner;
pub mod report;
pub mod scan;

pub use executor::{ArchiveRemover, DeletionFailure, ExecutionOutcome, FsRemover, execute_plan};
pub use normalize::normalize_name;
pub use planner::{GroupPlan, PlanSummary, RetentionPlan, RetentionPlanner, plan_retention};
pub use report::{ReportFormat, RunReport, RunSummary, render_plan};
pub use scan::{NormalizedGroups, ScanFailure, ScanOutcome, scan_directory};

use crate::error::{Error, Result};
use crate::packages::MetadataReader;
use crate::version::VersionOrdering;
use std::path::PathBuf;
use tracing::info;

/// Settings for one retention run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Directory holding the archives
    pub directory: PathBuf,
    /// Newest versions to keep per package
    pub keep: usize,
    /// Plan and report without deleting
    pub dry_run: bool,
    /// Worker threads for metadata extraction; `None` lets rayon decide
    pub jobs: Option<usize>,
}

impl RetentionConfig {
    pub fn new(directory: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            directory: directory.into(),
            keep,
            dry_run: false,
            jobs: None,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Check the settings before anything touches the directory's contents
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(Error::Configuration(
                "job count must be at least 1".to_string(),
            ));
        }
        scan::validate_directory(&self.directory)
    }
}

/// Ties a configuration to its metadata reader and version ordering
pub struct RetentionEngine<'a> {
    config: RetentionConfig,
    reader: &'a dyn MetadataReader,
    ordering: &'a dyn VersionOrdering,
    remover: &'a dyn ArchiveRemover,
}

impl<'a> RetentionEngine<'a> {
    pub fn new(
        config: RetentionConfig,
        reader: &'a dyn MetadataReader,
        ordering: &'a dyn VersionOrdering,
    ) -> Self {
        Self {
            config,
            reader,
            ordering,
            remover: &FsRemover,
        }
    }

    /// Replace the component that removes files from disk
    pub fn with_remover(mut self, remover: &'a dyn ArchiveRemover) -> Self {
        self.remover = remover;
        self
    }

    /// Scan and plan without side effects
    pub fn plan(&self) -> Result<(ScanOutcome, RetentionPlan)> {
        self.config.validate()?;

        let scan = scan_directory(&self.config.directory, self.reader, self.config.jobs)?;
        let plan = RetentionPlanner::new(self.config.keep, self.ordering).plan(&scan.groups);

        let summary = plan.summary();
        info!(
            "Planned {} deletions across {} packages in {}",
            summary.deleted,
            summary.groups,
            self.config.directory.display()
        );

        Ok((scan, plan))
    }

    /// Scan, plan, delete, and report
    ///
    /// Only configuration problems return `Err`; per-archive problems are
    /// collected in the report.
    pub fn run(&self) -> Result<RunReport> {
        let (scan, plan) = self.plan()?;
        Ok(self.execute(scan, plan))
    }

    /// Carry out a plan built by `plan` and report on it
    pub fn execute(&self, scan: ScanOutcome, plan: RetentionPlan) -> RunReport {
        let outcome = execute_plan(&plan, self.config.dry_run, self.remover);

        RunReport::new(
            self.config.directory.clone(),
            self.config.dry_run,
            scan.archives_found,
            scan.failures,
            plan,
            outcome,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageIdentity;
    use crate::version::DpkgVersionOrdering;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Reads "<name>_<version>.deb" file names instead of archive contents
    struct FileNameReader;

    impl MetadataReader for FileNameReader {
        fn name(&self) -> &'static str {
            "file-name"
        }

        fn read(&self, path: &Path) -> Result<PackageIdentity> {
            let stem = path.file_stem().unwrap().to_string_lossy().to_string();
            let (name, version) = stem
                .split_once('_')
                .ok_or_else(|| Error::metadata(path, "no version in file name"))?;
            Ok(PackageIdentity::new(name, version))
        }
    }

    fn populate(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
        }
    }

    fn remaining(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_config_rejects_zero_jobs() {
        let dir = TempDir::new().unwrap();
        let config = RetentionConfig::new(dir.path(), 1).with_jobs(Some(0));
        assert!(config.validate().unwrap_err().is_fatal());
    }

    #[test]
    fn test_missing_directory_fails_before_work() {
        let config = RetentionConfig::new("/nonexistent/debs", 1);
        let engine = RetentionEngine::new(config, &FileNameReader, &DpkgVersionOrdering);
        assert!(matches!(engine.run(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_run_deletes_old_versions() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["foo_1.0.deb", "foo_2.0.deb", "foo_10.0.deb", "bar_1.0.deb"]);

        let config = RetentionConfig::new(dir.path(), 2);
        let report = RetentionEngine::new(config, &FileNameReader, &DpkgVersionOrdering)
            .run()
            .unwrap();

        assert_eq!(report.summary.deleted, 1);
        assert!(!report.has_failures());
        assert_eq!(remaining(dir.path()), vec!["bar_1.0.deb", "foo_10.0.deb", "foo_2.0.deb"]);
    }

    #[test]
    fn test_dry_run_keeps_files() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["foo_1.0.deb", "foo_2.0.deb"]);

        let config = RetentionConfig::new(dir.path(), 0).with_dry_run(true);
        let report = RetentionEngine::new(config, &FileNameReader, &DpkgVersionOrdering)
            .run()
            .unwrap();

        assert_eq!(report.summary.planned_deletions, 2);
        assert_eq!(report.summary.deleted, 0);
        assert_eq!(remaining(dir.path()).len(), 2);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["foo_1.0.deb", "foo_2.0.deb", "foo_3.0.deb"]);

        let engine = RetentionEngine::new(
            RetentionConfig::new(dir.path(), 1),
            &FileNameReader,
            &DpkgVersionOrdering,
        );
        let first = engine.run().unwrap();
        assert_eq!(first.summary.deleted, 2);

        let second = engine.run().unwrap();
        assert!(second.groups.is_empty());
        assert_eq!(second.summary.deleted, 0);
        assert_eq!(remaining(dir.path()), vec!["foo_3.0.deb"]);
    }
}
