//! Dotted key rules.
//!
//! A persisted key has at least three dot-separated segments. The first two
//! segments name the group the entry is written under; the remainder is the
//! label inside that group:
//!
//! ```text
//! server.http.port        -> group "server.http", sub-key "port"
//! server.http.tls.cert    -> group "server.http", sub-key "tls.cert"
//! ```
//!
//! Valid keys:
//! - Must be non-empty and must not start with `#`
//! - Must not contain `=`, whitespace or line breaks
//! - Must not contain empty segments (`a..b`, leading or trailing `.`)
//! - Must have at least [`MIN_KEY_SEGMENTS`] segments

use crate::error::{StoreError, StoreResult};

/// Minimum number of dotted segments a key needs to be grouped on save.
pub const MIN_KEY_SEGMENTS: usize = 3;

/// Separator between key segments.
pub const SEPARATOR: char = '.';

/// Validate a key, returning `Ok(())` if it can be written to a file.
///
/// # Examples
///
/// ```
/// use dotprops_store::key::validate_key;
///
/// assert!(validate_key("test.message.third").is_ok());
/// assert!(validate_key("test.object.tls.cert").is_ok());
/// assert!(validate_key("test.message").is_err());
/// assert!(validate_key("bad..key.name").is_err());
/// ```
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(malformed(key, "key must not be empty"));
    }

    if key.starts_with('#') {
        return Err(malformed(key, "must not start with '#'"));
    }

    if key.contains('=') {
        return Err(malformed(key, "must not contain '='"));
    }

    if let Some(ch) = key.chars().find(|c| c.is_whitespace()) {
        return Err(malformed(key, &format!("contains whitespace: {ch:?}")));
    }

    let mut segments = 0;
    for segment in key.split(SEPARATOR) {
        if segment.is_empty() {
            return Err(malformed(key, "contains an empty segment"));
        }
        segments += 1;
    }

    if segments < MIN_KEY_SEGMENTS {
        return Err(malformed(
            key,
            &format!("needs at least {MIN_KEY_SEGMENTS} segments, found {segments}"),
        ));
    }

    Ok(())
}

/// Split a key into its group (first two segments) and sub-key (the rest).
///
/// The key is validated first, so the sub-key is never empty.
pub fn split_key(key: &str) -> StoreResult<(&str, &str)> {
    validate_key(key)?;

    let mut dots = key.match_indices(SEPARATOR).map(|(i, _)| i);
    let second = dots
        .nth(1)
        .ok_or_else(|| malformed(key, "missing group separator"))?;

    Ok((&key[..second], &key[second + 1..]))
}

/// Join a key prefix and a member name: `prefix.name`.
pub fn child_key(prefix: &str, name: &str) -> String {
    format!("{prefix}{SEPARATOR}{name}")
}

fn malformed(key: &str, reason: &str) -> StoreError {
    StoreError::MalformedKey {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
