// src/cli/mod.rs
//! CLI definitions for debprune
//!
//! This module contains the command-line interface definition using clap.
//! The command implementation is in the `commands` module.

use clap::{Parser, ValueEnum};
use debprune::ReportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debprune")]
#[command(author, version)]
#[command(about = "Delete all but the newest versions of each package in a directory of .deb archives", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Directory containing the .deb archives
    pub directory: PathBuf,

    /// Number of newest versions to keep per package (0 deletes everything)
    #[arg(value_parser = parse_keep_count)]
    pub keep: usize,

    /// Show what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// How package name and version are read from each archive
    #[arg(long, value_enum, default_value_t = ReaderKind::Native)]
    pub reader: ReaderKind,

    /// How versions are compared
    #[arg(long = "compare-with", value_enum, default_value_t = ComparatorKind::Native)]
    pub compare_with: ComparatorKind,

    /// Number of archives to read in parallel (default: one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable keep/delete lists
    Text,
    /// Machine-readable JSON document
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReaderKind {
    /// Parse the ar/tar container directly
    Native,
    /// Run `dpkg-deb --field`
    DpkgDeb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComparatorKind {
    /// Built-in implementation of dpkg's ordering
    Native,
    /// Run `dpkg --compare-versions`
    Dpkg,
}

/// Parse the keep-count, rejecting negatives with a readable message
fn parse_keep_count(s: &str) -> Result<usize, String> {
    s.trim().parse::<usize>().map_err(|_| {
        format!(
            "'{}' is not a valid keep-count; expected a non-negative integer",
            s
        )
    })
}
