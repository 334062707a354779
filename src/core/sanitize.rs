// src/core/sanitize.rs

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop stray `[` / `]` characters but keep what they wrapped.
/// Old CSV exports render list-ish cells as `[Physics]`.
pub fn strip_bracket_chars(s: &str) -> String {
    s.chars().filter(|c| *c != '[' && *c != ']').collect()
}

/// Subject keys as stored: brackets removed, whitespace normalized.
pub fn clean_subject(s: &str) -> String {
    normalize_ws(&strip_bracket_chars(s))
}

/// File-name-safe form of a category label: spaces → `_`, `&` → `and`.
pub fn category_file_stem(category: &str) -> String {
    let mut out = String::with_capacity(category.len());
    for ch in category.chars() {
        match ch {
            ' ' => out.push('_'),
            '&' => out.push_str("and"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_brackets_and_spacing() {
        assert_eq!(clean_subject("[Physics]"), "Physics");
        assert_eq!(clean_subject("  Further   Mathematics (9231) "), "Further Mathematics (9231)");
        assert_eq!(clean_subject("[]"), "");
    }

    #[test]
    fn category_stems() {
        assert_eq!(category_file_stem("AS and A Level"), "AS_and_A_Level");
        assert_eq!(category_file_stem("Art & Design"), "Art_and_Design");
        assert_eq!(category_file_stem("IGCSE"), "IGCSE");
    }
}
