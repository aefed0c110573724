//! Identifier rules for model and field names.

/// True if `s` matches `^[a-zA-Z_][a-zA-Z0-9_]*$`.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derives a technical name from a human label.
///
/// Lowercases ASCII letters, turns every run of other characters into a
/// single `_`, trims underscores from both ends and prefixes a leading digit
/// with `_`. Returns an empty string when nothing usable remains.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }

    let trimmed = slug.trim_matches('_');
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}
