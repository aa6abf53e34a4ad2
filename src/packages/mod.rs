// src/packages/mod.rs

//! Package metadata extraction
//!
//! Readers turn an archive file into its `(name, version)` pair. Each reader
//! implements the `MetadataReader` trait.

pub mod deb;
pub mod dpkg_deb;
pub mod traits;

pub use deb::DebControlReader;
pub use dpkg_deb::DpkgDebReader;
pub use traits::{ArchiveMetadata, MetadataReader, PackageIdentity, parse_control_fields};

/// File extension of the archives the scanner picks up
pub const ARCHIVE_EXTENSION: &str = "deb";
