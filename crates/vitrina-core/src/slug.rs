//! Slug derivation and conflict resolution.
//!
//! A slug is the permanent filesystem-safe identifier of one uploaded
//! image, derived from the human-entered display name. Editing transform
//! parameters never changes the slug; only a new upload under a new name
//! creates a new one.

use std::collections::HashSet;

use crate::constants::{FALLBACK_SLUG, MAX_SLUG_LEN};

/// Derive a slug from a display name.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen, strips leading/trailing hyphens, truncates to 60
/// characters, and falls back to `"image"` for names with no usable
/// characters. Total and deterministic.
pub fn slugify(display_name: &str) -> String {
    let mut slug = String::with_capacity(display_name.len());
    for ch in display_name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let trimmed = slug.trim_end_matches('-');
    let truncated: String = trimmed.chars().take(MAX_SLUG_LEN).collect();
    if truncated.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        truncated
    }
}

/// Resolve a slug collision against the snapshot of existing slugs.
///
/// Returns `base` unchanged when unused; otherwise the lowest-numbered
/// unused `base-N` with N starting at 2. Callers snapshot `existing`
/// before the upload; concurrent uploads of the same name can still race
/// to the same suffix (documented limitation, last writer wins).
pub fn resolve_conflict(base: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    let mut n: u32 = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !existing.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
