// src/version/mod.rs

//! Debian version parsing and ordering
//!
//! Versions have the form `[epoch:]upstream[-revision]` and are ordered the
//! way dpkg orders them: epoch numerically, then upstream, then revision,
//! where the last two are compared by alternating non-digit and digit runs.
//! Within a non-digit run letters sort before other characters and `~`
//! sorts before everything, even the end of the string.

mod dpkg_command;

pub use dpkg_command::DpkgCommandOrdering;

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// A parsed Debian version with epoch, upstream and revision components
#[derive(Debug, Clone)]
pub struct DebVersion {
    pub epoch: u64,
    pub upstream: String,
    pub revision: Option<String>,
}

impl DebVersion {
    /// Parse a version string, rejecting anything that breaks the Debian grammar
    ///
    /// Format: [epoch:]upstream[-revision]
    /// Examples:
    /// - "1.2.3" → epoch=0, upstream="1.2.3", revision=None
    /// - "2:1.2.3" → epoch=2, upstream="1.2.3", revision=None
    /// - "1.2.3-4ubuntu1" → epoch=0, upstream="1.2.3", revision=Some("4ubuntu1")
    /// - "1:2.3-rc1-5" → epoch=1, upstream="2.3-rc1", revision=Some("5")
    pub fn parse(s: &str) -> Result<Self> {
        let (version, problems) = Self::parse_with_warnings(s)?;
        match problems.first() {
            Some(reason) => Err(Error::InvalidVersion {
                version: s.trim().to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(version),
        }
    }

    /// Parse a version string the way dpkg does
    ///
    /// Errors are the cases dpkg refuses outright. Grammar problems dpkg only
    /// warns about (upstream not starting with a digit, characters outside
    /// the allowed set) are returned alongside the version.
    pub fn parse_with_warnings(s: &str) -> Result<(Self, Vec<&'static str>)> {
        let s = s.trim();
        let invalid = |reason: &str| Error::InvalidVersion {
            version: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("version string is empty"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("version string has embedded spaces"));
        }

        let (epoch, rest) = match s.split_once(':') {
            Some((epoch_str, rest)) => {
                if epoch_str.is_empty() {
                    return Err(invalid("epoch in version is empty"));
                }
                if !epoch_str.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("epoch in version is not a number"));
                }
                let epoch = epoch_str
                    .parse::<u64>()
                    .map_err(|_| invalid("epoch in version is too big"))?;
                (epoch, rest)
            }
            None => (0, s),
        };

        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((upstream, revision)) => {
                if revision.is_empty() {
                    return Err(invalid("revision number is empty"));
                }
                (upstream, Some(revision))
            }
            None => (rest, None),
        };

        if upstream.is_empty() {
            return Err(invalid("version number is empty"));
        }

        let mut problems = Vec::new();
        if !upstream.starts_with(|c: char| c.is_ascii_digit()) {
            problems.push("version number does not start with digit");
        }
        if !upstream
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b".+~-:".contains(&b))
        {
            problems.push("invalid character in version number");
        }
        if let Some(revision) = revision
            && !revision
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b".+~".contains(&b))
        {
            problems.push("invalid character in revision number");
        }

        let version = Self {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.map(str::to_string),
        };
        Ok((version, problems))
    }

    /// Split a version string without validating it
    ///
    /// Used where an ordering must exist for every string. A non-numeric
    /// epoch is kept as part of the upstream version.
    pub fn parse_lenient(s: &str) -> Self {
        let s = s.trim();

        let (epoch, rest) = match s.split_once(':') {
            Some((epoch_str, rest)) if !epoch_str.is_empty() => match epoch_str.parse::<u64>() {
                Ok(epoch) => (epoch, rest),
                Err(_) => (0, s),
            },
            Some(("", rest)) => (0, rest),
            _ => (0, s),
        };

        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((upstream, revision)) if !upstream.is_empty() => {
                (upstream.to_string(), Some(revision.to_string()))
            }
            _ => (rest.to_string(), None),
        };

        Self {
            epoch,
            upstream,
            revision,
        }
    }

    /// Compare two versions using dpkg semantics
    pub fn compare(&self, other: &DebVersion) -> Ordering {
        match self.epoch.cmp(&other.epoch) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match verrevcmp(&self.upstream, &other.upstream) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // A missing revision compares like revision "0"
        verrevcmp(
            self.revision.as_deref().unwrap_or(""),
            other.revision.as_deref().unwrap_or(""),
        )
    }
}

/// Weight of one character inside a non-digit run
fn order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(c),
        Some(c) => i32::from(c) + 256,
    }
}

/// dpkg's comparison of an upstream version or revision string
fn verrevcmp(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let is_digit = |s: &[u8], i: usize| s.get(i).is_some_and(u8::is_ascii_digit);
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        while (i < a.len() && !a[i].is_ascii_digit()) || (j < b.len() && !b[j].is_ascii_digit()) {
            let ac = order(a.get(i).copied());
            let bc = order(b.get(j).copied());
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }

        while a.get(i) == Some(&b'0') {
            i += 1;
        }
        while b.get(j) == Some(&b'0') {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while is_digit(a, i) && is_digit(b, j) {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }

        // The longer digit run is the larger number
        if is_digit(a, i) {
            return Ordering::Greater;
        }
        if is_digit(b, j) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}

impl fmt::Display for DebVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.upstream)?;
        if let Some(ref revision) = self.revision {
            write!(f, "-{}", revision)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for DebVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Equality follows the ordering, so "1.0" == "1.00" and "1.0" == "1.0-0"
impl PartialEq for DebVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for DebVersion {}

impl Ord for DebVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for DebVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Three-way comparison over raw version strings
///
/// The retention planner sorts through this trait so the ordering rule can be
/// swapped (in-process or the `dpkg` binary) and tested without any I/O.
pub trait VersionOrdering: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// In-process implementation of dpkg's version ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct DpkgVersionOrdering;

impl VersionOrdering for DpkgVersionOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_versions(a, b)
    }
}

/// Compare two version strings with dpkg semantics
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    DebVersion::parse_lenient(a).compare(&DebVersion::parse_lenient(b))
}
