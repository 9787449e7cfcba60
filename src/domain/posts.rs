//! Post invariants shared by the service and adapters.

use super::error::DomainError;

/// Upper bound on related posts returned alongside a post.
pub const RELATED_POSTS_LIMIT: usize = 5;

/// Upper bound on documents returned by a full-text search.
pub const FULL_TEXT_RESULT_LIMIT: usize = 50;

/// Reject values that are empty once surrounding whitespace is removed,
/// or that cannot be stored as text.
pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    ensure_storable(value, field)
}

/// Text columns cannot hold NUL characters.
pub fn ensure_storable(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.contains('\0') {
        return Err(DomainError::validation(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(())
}

pub fn ensure_storable_tags(tags: &[String]) -> Result<(), DomainError> {
    tags.iter().try_for_each(|tag| ensure_storable(tag, "tags"))
}

/// Overlay an optional text value; absent or blank candidates keep the current value.
pub fn overlay_text(current: String, candidate: Option<String>) -> String {
    match candidate {
        Some(value) if !value.trim().is_empty() => value,
        _ => current,
    }
}

/// Distinct tags in first-seen order.
pub fn distinct_tags(tags: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag.as_str()) {
            seen.push(tag.as_str());
        }
    }
    seen
}
