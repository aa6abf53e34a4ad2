// src/lib.rs

//! debprune
//!
//! Keeps the newest versions of each package in a directory of `.deb`
//! archives and deletes the rest.
//!
//! # Architecture
//!
//! - Readers: pluggable `MetadataReader`s pull `Package`/`Version` out of each
//!   archive (native ar/tar parsing or `dpkg-deb`)
//! - Grouping: kernel packages that embed their version in the name are
//!   folded into one group per environment tag
//! - Ordering: Debian version semantics behind the `VersionOrdering` trait
//! - Plan first: the full keep/delete plan exists before the first deletion,
//!   and per-archive failures never abort the run

mod error;
pub mod packages;
pub mod retention;
pub mod version;

pub use error::{Error, Result};
pub use packages::{
    ArchiveMetadata, DebControlReader, DpkgDebReader, MetadataReader, PackageIdentity,
};
pub use retention::{
    GroupPlan, ReportFormat, RetentionConfig, RetentionEngine, RetentionPlan, RetentionPlanner,
    RunReport, normalize_name,
};
pub use version::{
    DebVersion, DpkgCommandOrdering, DpkgVersionOrdering, VersionOrdering, compare_versions,
};
