// src/retention/executor.rs

//! Deletion pass
//!
//! Walks the plan in group order and removes every archive in each delete
//! list. A failed removal is recorded and the pass moves on.

use crate::error::Error;
use crate::retention::planner::RetentionPlan;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A planned deletion that did not happen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub group: String,
    pub path: PathBuf,
    pub reason: String,
}

/// What the deletion pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<DeletionFailure>,
    pub reclaimed_bytes: u64,
}

/// Removes archives from disk
///
/// Behind a trait so tests can provoke failures without touching
/// permissions.
pub trait ArchiveRemover {
    fn remove(&self, path: &Path) -> std::io::Result<()>;
}

/// Removes archives with `std::fs::remove_file`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl ArchiveRemover for FsRemover {
    fn remove(&self, path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }
}

/// Delete every archive the plan marks for deletion
///
/// With `dry_run` nothing is removed and the outcome is empty.
pub fn execute_plan(
    plan: &RetentionPlan,
    dry_run: bool,
    remover: &dyn ArchiveRemover,
) -> ExecutionOutcome {
    let mut outcome = ExecutionOutcome::default();

    if dry_run {
        info!(
            "Dry run: leaving {} archives in place",
            plan.deletions().count()
        );
        return outcome;
    }

    for (group, archive) in plan.deletions() {
        debug!("Deleting {} from group {}", archive.path.display(), group);

        match remover.remove(&archive.path) {
            Ok(()) => {
                outcome.reclaimed_bytes += archive.size.unwrap_or(0);
                outcome.deleted.push(archive.path.clone());
            }
            Err(source) => {
                let reason = source.to_string();
                warn!(
                    "{}",
                    Error::Deletion {
                        path: archive.path.clone(),
                        source,
                    }
                );
                outcome.failures.push(DeletionFailure {
                    group: group.to_string(),
                    path: archive.path.clone(),
                    reason,
                });
            }
        }
    }

    info!(
        "Deleted {} archives ({} failed)",
        outcome.deleted.len(),
        outcome.failures.len()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::{ArchiveMetadata, PackageIdentity};
    use crate::retention::planner::GroupPlan;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Refuses to remove one path and records the rest
    struct FlakyRemover {
        refuse: PathBuf,
        removed: RefCell<Vec<PathBuf>>,
    }

    impl ArchiveRemover for FlakyRemover {
        fn remove(&self, path: &Path) -> std::io::Result<()> {
            if path == self.refuse {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only file system",
                ));
            }
            self.removed.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn archive(dir: &Path, name: &str, version: &str) -> ArchiveMetadata {
        let path = dir.join(format!("{}_{}_all.deb", name, version));
        fs::write(&path, b"payload").unwrap();
        let mut archive = ArchiveMetadata::new(PackageIdentity::new(name, version), path);
        archive.size = Some(7);
        archive
    }

    fn plan(groups: Vec<GroupPlan>) -> RetentionPlan {
        RetentionPlan {
            keep_count: 1,
            groups,
        }
    }

    #[test]
    fn test_deletes_planned_archives_only() {
        let dir = TempDir::new().unwrap();
        let keep = archive(dir.path(), "foo", "2.0");
        let old = archive(dir.path(), "foo", "1.0");
        let plan = plan(vec![GroupPlan {
            name: "foo".to_string(),
            keep: vec![keep.clone()],
            delete: vec![old.clone()],
        }]);

        let outcome = execute_plan(&plan, false, &FsRemover);
        assert_eq!(outcome.deleted, vec![old.path.clone()]);
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.reclaimed_bytes, 7);
        assert!(keep.path.exists());
        assert!(!old.path.exists());
    }

    #[test]
    fn test_dry_run_deletes_nothing() {
        let dir = TempDir::new().unwrap();
        let old = archive(dir.path(), "foo", "1.0");
        let plan = plan(vec![GroupPlan {
            name: "foo".to_string(),
            keep: vec![],
            delete: vec![old.clone()],
        }]);

        let outcome = execute_plan(&plan, true, &FsRemover);
        assert_eq!(outcome, ExecutionOutcome::default());
        assert!(old.path.exists());
    }

    #[test]
    fn test_missing_file_is_reported_and_run_continues() {
        let dir = TempDir::new().unwrap();
        let gone = archive(dir.path(), "foo", "1.0");
        let other = archive(dir.path(), "bar", "1.0");
        fs::remove_file(&gone.path).unwrap();

        let plan = plan(vec![
            GroupPlan {
                name: "bar".to_string(),
                keep: vec![],
                delete: vec![other.clone()],
            },
            GroupPlan {
                name: "foo".to_string(),
                keep: vec![],
                delete: vec![gone.clone()],
            },
        ]);

        let outcome = execute_plan(&plan, false, &FsRemover);
        assert_eq!(outcome.deleted, vec![other.path.clone()]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].group, "foo");
        assert_eq!(outcome.failures[0].path, gone.path);
    }

    #[test]
    fn test_failure_in_one_group_does_not_stop_the_next() {
        let dir = TempDir::new().unwrap();
        let a1 = archive(dir.path(), "a", "1.0");
        let a0 = archive(dir.path(), "a", "0.9");
        let b1 = archive(dir.path(), "b", "1.0");
        let remover = FlakyRemover {
            refuse: a1.path.clone(),
            removed: RefCell::new(Vec::new()),
        };

        let plan = plan(vec![
            GroupPlan {
                name: "a".to_string(),
                keep: vec![],
                delete: vec![a1.clone(), a0.clone()],
            },
            GroupPlan {
                name: "b".to_string(),
                keep: vec![],
                delete: vec![b1.clone()],
            },
        ]);

        let outcome = execute_plan(&plan, false, &remover);
        assert_eq!(*remover.removed.borrow(), vec![a0.path.clone(), b1.path.clone()]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].reason, "read-only file system");
        assert_eq!(outcome.reclaimed_bytes, 14);
    }
}
