//! Slug generation from post titles

use deunicode::deunicode;

/// Build a URL-safe slug from arbitrary text
///
/// Non-Latin scripts are transliterated phonetically to ASCII, then
/// everything that is not an ASCII letter or digit collapses into single
/// hyphens. The result is cut to `max_len` bytes without leaving a
/// trailing hyphen. May return an empty string.
pub fn slugify(text: &str, max_len: usize) -> String {
    let ascii = deunicode(text).to_ascii_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    truncate(&slug, max_len).to_string()
}

/// `base` with a numeric suffix, kept within `max_len`
///
/// `attempt` 1 yields `base` itself, 2 yields `base-2` and so on. When
/// `max_len` leaves no room for any of `base`, the bare number is used.
pub fn with_suffix(base: &str, attempt: u32, max_len: usize) -> String {
    if attempt <= 1 {
        return truncate(base, max_len).to_string();
    }
    let number = attempt.to_string();
    let head = truncate(base, max_len.saturating_sub(number.len() + 1));
    if head.is_empty() {
        return truncate(&number, max_len).to_string();
    }
    format!("{}-{}", head, number)
}

// Slugs are pure ASCII, so byte slicing is char-safe.
fn truncate(slug: &str, max_len: usize) -> &str {
    if slug.len() <= max_len {
        return slug;
    }
    slug[..max_len].trim_end_matches('-')
}
