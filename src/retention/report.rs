// src/retention/report.rs

//! Run reports in text and JSON form

use crate::error::Result;
use crate::retention::executor::{DeletionFailure, ExecutionOutcome};
use crate::retention::planner::{GroupPlan, RetentionPlan};
use crate::retention::scan::ScanFailure;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Output format of a run report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Counts for the closing summary line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub archives_found: usize,
    pub groups_over_limit: usize,
    pub kept: usize,
    pub planned_deletions: usize,
    pub deleted: usize,
    pub scan_failures: usize,
    pub deletion_failures: usize,
    pub reclaimed_bytes: u64,
}

/// Everything one run planned and did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub directory: PathBuf,
    pub keep_count: usize,
    pub dry_run: bool,
    pub groups: Vec<GroupPlan>,
    pub scan_failures: Vec<ScanFailure>,
    pub deletion_failures: Vec<DeletionFailure>,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(
        directory: PathBuf,
        dry_run: bool,
        archives_found: usize,
        scan_failures: Vec<ScanFailure>,
        plan: RetentionPlan,
        outcome: ExecutionOutcome,
    ) -> Self {
        let planned = plan.summary();
        let summary = RunSummary {
            archives_found,
            groups_over_limit: planned.groups,
            kept: planned.kept,
            planned_deletions: planned.deleted,
            deleted: outcome.deleted.len(),
            scan_failures: scan_failures.len(),
            deletion_failures: outcome.failures.len(),
            reclaimed_bytes: outcome.reclaimed_bytes,
        };

        Self {
            directory,
            keep_count: plan.keep_count,
            dry_run,
            groups: plan.groups,
            scan_failures,
            deletion_failures: outcome.failures,
            summary,
        }
    }

    /// True if any archive could not be read or deleted
    pub fn has_failures(&self) -> bool {
        !self.scan_failures.is_empty() || !self.deletion_failures.is_empty()
    }

    /// Write the report in the requested format
    pub fn render(&self, format: ReportFormat, out: &mut dyn Write) -> Result<()> {
        if format == ReportFormat::Text {
            write_groups(&self.groups, out)?;
        }
        self.render_outcome(format, out)
    }

    /// Write what follows the plan sections: failures and the summary line
    ///
    /// For JSON this is the whole document.
    pub fn render_outcome(&self, format: ReportFormat, out: &mut dyn Write) -> Result<()> {
        match format {
            ReportFormat::Text => self.write_outcome_text(out)?,
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn write_outcome_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if !self.scan_failures.is_empty() {
            writeln!(
                out,
                "Could not read {} archive(s):",
                self.scan_failures.len()
            )?;
            for failure in &self.scan_failures {
                writeln!(out, "  {}", failure.reason)?;
            }
            writeln!(out)?;
        }

        if !self.deletion_failures.is_empty() {
            writeln!(
                out,
                "Could not delete {} archive(s):",
                self.deletion_failures.len()
            )?;
            for failure in &self.deletion_failures {
                writeln!(out, "  {}: {}", failure.path.display(), failure.reason)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "{}", self.summary_line())
    }

    /// One-line summary of the run
    pub fn summary_line(&self) -> String {
        let s = &self.summary;

        if s.groups_over_limit == 0 {
            return format!(
                "Nothing to delete: {} archive(s) scanned, no package has more than {} version(s)",
                s.archives_found, self.keep_count
            );
        }

        if self.dry_run {
            format!(
                "Dry run: would delete {} archive(s) in {} package(s), keeping {}",
                s.planned_deletions, s.groups_over_limit, s.kept
            )
        } else {
            format!(
                "Deleted {} of {} archive(s) in {} package(s), keeping {} ({} bytes freed)",
                s.deleted, s.planned_deletions, s.groups_over_limit, s.kept, s.reclaimed_bytes
            )
        }
    }
}

/// Write the keep/delete sections of a plan, before anything is deleted
///
/// JSON reports are written in one piece by `RunReport::render_outcome`, so
/// nothing is written here for them.
pub fn render_plan(
    plan: &RetentionPlan,
    format: ReportFormat,
    out: &mut dyn Write,
) -> Result<()> {
    if format == ReportFormat::Text {
        write_groups(&plan.groups, out)?;
    }
    Ok(())
}

fn write_groups(groups: &[GroupPlan], out: &mut dyn Write) -> std::io::Result<()> {
    for group in groups {
        writeln!(out, "{}", group.name)?;
        writeln!(out, "  keep:")?;
        if group.keep.is_empty() {
            writeln!(out, "    (none)")?;
        }
        for archive in &group.keep {
            writeln!(out, "    {}", archive.file_name())?;
        }
        writeln!(out, "  delete:")?;
        for archive in &group.delete {
            writeln!(out, "    {}", archive.file_name())?;
        }
        writeln!(out)?;
    }
    Ok(())
}
