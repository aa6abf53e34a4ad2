// src/retention/normalize.rs

//! Grouping keys for package names
//!
//! Kernel packages carry their version inside the name, e.g.
//! `linux-image-5.15.26-grsec-securedrop`. Left alone, every kernel build
//! would be its own single-member group and never be cleaned up.

/// Environment tags that mark a name as one of our kernel builds
pub const ENVIRONMENT_SUFFIXES: [&str; 2] = ["-securedrop", "-workstation"];

/// Kernel package families whose names embed a version
pub const KERNEL_PREFIXES: [&str; 2] = ["linux-image-", "linux-headers-"];

/// Map a raw package name to the key it is grouped under
///
/// `linux-image-<anything>-securedrop` becomes `linux-image-securedrop`, and
/// likewise for `linux-headers-` and the `-workstation` tag. Every other name
/// is returned unchanged, including names that carry a tag but not one of the
/// kernel prefixes.
pub fn normalize_name(raw: &str) -> String {
    let Some(suffix) = ENVIRONMENT_SUFFIXES.iter().find(|s| raw.ends_with(*s)) else {
        return raw.to_string();
    };

    match KERNEL_PREFIXES.iter().find(|p| raw.starts_with(*p)) {
        Some(prefix) => format!("{}{}", prefix, suffix.trim_start_matches('-')),
        None => raw.to_string(),
    }
}
