// src/version/dpkg_command.rs

//! Version ordering backed by `dpkg --compare-versions`

use super::{DpkgVersionOrdering, VersionOrdering};
use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Orders versions by asking the system `dpkg` binary
///
/// Each comparison spawns up to two processes. If `dpkg` cannot be run the
/// in-process ordering is used for that comparison.
#[derive(Debug, Clone)]
pub struct DpkgCommandOrdering {
    program: PathBuf,
}

impl DpkgCommandOrdering {
    /// Find `dpkg` on PATH
    pub fn locate() -> Result<Self> {
        let program = which::which("dpkg").map_err(|e| {
            Error::Configuration(format!("Cannot compare versions with dpkg: {}", e))
        })?;
        debug!("Using {} for version comparison", program.display());
        Ok(Self { program })
    }

    /// Use a specific `dpkg` executable
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn relation_holds(&self, a: &str, relation: &str, b: &str) -> std::io::Result<bool> {
        let status = Command::new(&self.program)
            .args(["--compare-versions", a, relation, b])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.success())
    }
}

impl VersionOrdering for DpkgCommandOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }

        let result = self.relation_holds(a, "lt", b).and_then(|less| {
            if less {
                Ok(Ordering::Less)
            } else if self.relation_holds(a, "gt", b)? {
                Ok(Ordering::Greater)
            } else {
                Ok(Ordering::Equal)
            }
        });

        match result {
            Ok(ord) => ord,
            Err(e) => {
                warn!(
                    "Failed to run {}: {}; comparing '{}' and '{}' in-process",
                    self.program.display(),
                    e,
                    a,
                    b
                );
                DpkgVersionOrdering.compare(a, b)
            }
        }
    }
}
