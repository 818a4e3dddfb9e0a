//! Slug normalisation for human-readable labels.

/// Turn a display label into an object-id fragment.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `_`, and trims leading and trailing underscores. Total: a label
/// made only of punctuation yields an empty string, which callers must treat
/// as "nothing derivable".
#[must_use]
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_separator = false;

    for ch in label.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    }

    slug
}
