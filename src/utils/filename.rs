use unicode_normalization::UnicodeNormalization;

/// Reduces an uploaded filename to something safe to use as a storage key.
///
/// The name is NFKD-decomposed and reduced to ASCII first, so accented
/// letters keep their base letter. Path separators become whitespace,
/// whitespace runs are joined with `_`, and anything outside `[A-Za-z0-9._-]` is dropped. Leading and trailing `.`/`_`
/// are trimmed so the result can never be `.`, `..` or a hidden name.
///
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let spaced: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
