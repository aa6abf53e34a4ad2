// src/commands/prune.rs
//! The prune command: scan, plan, delete, report

use crate::cli::{Cli, ComparatorKind, ReaderKind};
use anyhow::{Context, Result};
use debprune::retention::render_plan;
use debprune::{
    DebControlReader, DpkgCommandOrdering, DpkgDebReader, DpkgVersionOrdering, MetadataReader,
    ReportFormat, RetentionConfig, RetentionEngine, VersionOrdering,
};
use std::io::Write;
use tracing::{debug, error, warn};

/// How a completed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneStatus {
    /// Every archive was read and every planned deletion succeeded
    Clean,
    /// The run finished but some archives could not be read or deleted
    PartialFailure,
}

/// Build the configured reader
fn metadata_reader(kind: ReaderKind) -> Result<Box<dyn MetadataReader>> {
    let reader: Box<dyn MetadataReader> = match kind {
        ReaderKind::Native => Box::new(DebControlReader),
        ReaderKind::DpkgDeb => Box::new(DpkgDebReader::locate()?),
    };
    Ok(reader)
}

/// Build the configured version ordering
fn version_ordering(kind: ComparatorKind) -> Result<Box<dyn VersionOrdering>> {
    let ordering: Box<dyn VersionOrdering> = match kind {
        ComparatorKind::Native => Box::new(DpkgVersionOrdering),
        ComparatorKind::Dpkg => Box::new(DpkgCommandOrdering::locate()?),
    };
    Ok(ordering)
}

/// Remove all but the newest `cli.keep` versions of each package
///
/// Group sections are written before the first deletion. A report that
/// cannot be finished after files were deleted ends the run as a partial
/// failure, not a fatal one.
pub fn cmd_prune(cli: &Cli, out: &mut dyn Write) -> Result<PruneStatus> {
    let config = RetentionConfig::new(&cli.directory, cli.keep)
        .with_dry_run(cli.dry_run)
        .with_jobs(cli.jobs);
    debug!("Running with {:?}", config);

    let reader = metadata_reader(cli.reader)?;
    let ordering = version_ordering(cli.compare_with)?;
    let format = ReportFormat::from(cli.format);

    let engine = RetentionEngine::new(config, reader.as_ref(), ordering.as_ref());
    let (scan, plan) = engine
        .plan()
        .with_context(|| format!("Failed to clean up {}", cli.directory.display()))?;

    render_plan(&plan, format, out).context("Failed to write report")?;

    let report = engine.execute(scan, plan);

    match report.render_outcome(format, out) {
        Ok(()) => {}
        Err(e) if report.summary.deleted > 0 => {
            error!(
                "Failed to write report after deleting {} archive(s): {}",
                report.summary.deleted, e
            );
            return Ok(PruneStatus::PartialFailure);
        }
        Err(e) => return Err(e).context("Failed to write report"),
    }

    if report.has_failures() {
        warn!(
            "{} archive(s) could not be read and {} could not be deleted",
            report.summary.scan_failures, report.summary.deletion_failures
        );
        Ok(PruneStatus::PartialFailure)
    } else {
        Ok(PruneStatus::Clean)
    }
}
