//! Sanitizing filters applied to free-text input before storage

use serde_json::Value;

/// Longest value, in characters, that any stored text field may hold
pub const MAX_FIELD_LENGTH: usize = 255;

/// Drop every `<` and `>`, trim, then truncate to [`MAX_FIELD_LENGTH`] characters.
///
/// This is a shallow filter: entities such as `&lt;` are left untouched.
/// Brackets are removed before trimming and the cut is trimmed again, so the
/// output never starts or ends with whitespace and a second pass is a no-op.
pub fn sanitize(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let truncated: String = stripped.trim().chars().take(MAX_FIELD_LENGTH).collect();
    truncated.trim_end().to_string()
}

/// Sanitize an untyped value. Anything that is not a JSON string becomes `""`.
pub fn sanitize_value(value: &Value) -> String {
    value.as_str().map(sanitize).unwrap_or_default()
}

/// Sanitize an optional field, mapping absent or emptied input to `None`
pub fn sanitize_optional(input: Option<&str>) -> Option<String> {
    input.map(sanitize).filter(|s| !s.is_empty())
}
