//! Small pure text helpers.

/// Characters of thought content kept in previews before the ellipsis.
pub const PREVIEW_CHARS: usize = 100;

/// Keep up to `max_content` characters of `raw`, then append `suffix`.
///
/// The suffix does NOT count toward the budget: the returned string may be up to
/// `max_content + suffix.chars().count()` characters. Counts `char`s, never bytes.
#[must_use]
pub fn truncate_preview(raw: &str, max_content: usize, suffix: &str) -> String {
    if raw.chars().count() <= max_content {
        return raw.to_string();
    }
    let head: String = raw.chars().take(max_content).collect();
    format!("{head}{suffix}")
}

/// Preview of thought content as shown in recent/retrieved lists and branch context.
#[must_use]
pub fn thought_preview(content: &str) -> String {
    truncate_preview(content, PREVIEW_CHARS, "...")
}

/// English plural for small counts: `1 thought`, `3 thoughts`.
#[must_use]
pub fn count_noun(count: impl Into<u64>, singular: &str) -> String {
    let count = count.into();
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {singular}s")
    }
}
