// src/naming.rs

//! Name-convention helpers for SOLiD library and sample names.
//!
//! Library names are usually built from the experimenter's initials, an
//! optional descriptive part and a numeric index, e.g. `DR07`, `LD_C1` or
//! `EP_NCYC2669`.

/// Leading run of alphabetic characters, e.g. `"EP"` for `"EP_NCYC2669"`.
///
/// Returns an empty string if the name does not start with a letter.
pub fn extract_initials(name: &str) -> &str {
    let end = name
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    &name[..end]
}

/// The name with any trailing digits removed, e.g. `"LD_C"` for `"LD_C1"`.
pub fn extract_prefix(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Trailing digits of the name, leading zeroes preserved (`"07"` for `"DR07"`).
pub fn extract_index_string(name: &str) -> &str {
    &name[extract_prefix(name).len()..]
}

/// Numeric value of an index string.
///
/// An empty string has no index. An all-zero string such as `"00"` is `0`.
/// Digit runs too long for a `u64` also yield `None`.
pub fn parse_index(index_string: &str) -> Option<u64> {
    if index_string.is_empty() {
        return None;
    }
    let stripped = index_string.trim_start_matches('0');
    if stripped.is_empty() {
        return Some(0);
    }
    stripped.parse().ok()
}

/// Simple glob-style match used for sample and library lookups.
///
/// An empty pattern or `*` matches everything, a trailing `*` matches any
/// name starting with the rest of the pattern, anything else must match
/// exactly.
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    if pattern.is_empty() || pattern == "*" {
        return true;
    }
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}
