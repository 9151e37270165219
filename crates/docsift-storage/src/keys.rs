//! Cloud object key generation.
//!
//! Key format: `documents/{unix_millis}-{sanitized_filename}`. The timestamp
//! prefix keeps concurrent uploads of identically-named files from
//! colliding; the sanitizer keeps keys safe for URL and path contexts.

use chrono::{DateTime, Utc};

/// Reduce a user-supplied filename to `[A-Za-z0-9._-]`.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Generate the object key for a cloud upload made at `now`.
pub fn cloud_object_key(file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "documents/{}-{}",
        now.timestamp_millis(),
        sanitize_filename(file_name)
    )
}
