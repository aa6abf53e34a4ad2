// src/commands/mod.rs
//! Command handlers for the debprune CLI

mod prune;

pub use prune::{PruneStatus, cmd_prune};

/// Exit status for a run that completed with no per-archive failures
pub const EXIT_SUCCESS: u8 = 0;

/// Exit status for a configuration error; nothing was deleted
pub const EXIT_FATAL: u8 = 1;

/// Exit status for a run that completed but could not read or delete
/// some archives (clap uses 2 for usage errors)
pub const EXIT_PARTIAL_FAILURE: u8 = 3;

impl PruneStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            PruneStatus::Clean => EXIT_SUCCESS,
            PruneStatus::PartialFailure => EXIT_PARTIAL_FAILURE,
        }
    }
}
