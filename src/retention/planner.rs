// src/retention/planner.rs

//! Retention planner
//!
//! Builds the complete keep/delete decision for every group before anything
//! is removed from disk.

use crate::packages::ArchiveMetadata;
use crate::retention::scan::NormalizedGroups;
use crate::version::VersionOrdering;
use serde::Serialize;

/// Keep/delete split for one normalized group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPlan {
    /// Normalized package name
    pub name: String,
    /// Newest archives, highest version first
    pub keep: Vec<ArchiveMetadata>,
    /// Older archives, highest version first
    pub delete: Vec<ArchiveMetadata>,
}

impl GroupPlan {
    pub fn len(&self) -> usize {
        self.keep.len() + self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Plans for every group that holds more than `keep_count` archives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetentionPlan {
    pub keep_count: usize,
    /// Sorted by normalized name
    pub groups: Vec<GroupPlan>,
}

impl RetentionPlan {
    /// Check if the plan deletes nothing
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every archive scheduled for deletion, paired with its group name
    pub fn deletions(&self) -> impl Iterator<Item = (&str, &ArchiveMetadata)> {
        self.groups
            .iter()
            .flat_map(|g| g.delete.iter().map(move |a| (g.name.as_str(), a)))
    }

    /// Get a summary of the plan
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary {
            groups: self.groups.len(),
            ..PlanSummary::default()
        };

        for group in &self.groups {
            summary.kept += group.keep.len();
            summary.deleted += group.delete.len();
            summary.reclaimable_bytes += group.delete.iter().filter_map(|a| a.size).sum::<u64>();
        }

        summary
    }
}

/// Summary of a retention plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Groups over the keep-count
    pub groups: usize,
    pub kept: usize,
    pub deleted: usize,
    pub reclaimable_bytes: u64,
}

/// Splits groups into keep and delete sets
pub struct RetentionPlanner<'a> {
    keep_count: usize,
    ordering: &'a dyn VersionOrdering,
}

impl<'a> RetentionPlanner<'a> {
    /// Create a planner keeping `keep_count` archives per group
    pub fn new(keep_count: usize, ordering: &'a dyn VersionOrdering) -> Self {
        Self {
            keep_count,
            ordering,
        }
    }

    /// Plan every group; groups at or under the keep-count are left out
    pub fn plan(&self, groups: &NormalizedGroups) -> RetentionPlan {
        let groups = groups
            .iter()
            .filter_map(|(name, versions)| {
                self.plan_group(name, versions.values().cloned().collect())
            })
            .collect();

        RetentionPlan {
            keep_count: self.keep_count,
            groups,
        }
    }

    /// Plan a single group, or `None` if it is within the keep-count
    pub fn plan_group(&self, name: &str, mut members: Vec<ArchiveMetadata>) -> Option<GroupPlan> {
        if members.len() <= self.keep_count {
            return None;
        }

        self.sort_descending(&mut members);
        let delete = members.split_off(self.keep_count);

        Some(GroupPlan {
            name: name.to_string(),
            keep: members,
            delete,
        })
    }

    /// Stable sort, highest version first
    pub fn sort_descending(&self, members: &mut [ArchiveMetadata]) {
        members.sort_by(|a, b| self.ordering.compare(&b.version, &a.version));
    }
}

/// Plan `groups` keeping the `keep` newest versions of each
pub fn plan_retention(
    groups: &NormalizedGroups,
    keep: usize,
    ordering: &dyn VersionOrdering,
) -> RetentionPlan {
    RetentionPlanner::new(keep, ordering).plan(groups)
}
