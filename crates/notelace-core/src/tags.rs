//! Tag normalization.
//!
//! Tags are stored trimmed, deduplicated, and sorted on every save; the
//! client applies the same normalization before the optimistic write so the
//! local value matches what the server will return. Duplicates collapse
//! case-insensitively with the first-typed casing kept ("Work, ideas, work"
//! saves as `["Work", "ideas"]`), while the final sort is case-sensitive
//! (ASCII ordering puts "Work" before "ideas"). Preserved behavior, not a
//! styling choice.

/// Normalize a raw tag list: trim whitespace, drop empties, collapse
/// case-insensitive duplicates (first occurrence's casing wins), then sort
/// lexicographically (case-sensitive).
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        tags.push(trimmed.to_string());
    }
    tags.sort();
    tags
}

/// Split a comma-separated tag draft (as typed in the tag editor) and
/// normalize the result.
pub fn parse_tag_draft(draft: &str) -> Vec<String> {
    normalize_tags(draft.split(','))
}
