//! Free-text search filters.
//!
//! List endpoints match `?search=` with `ILIKE`. The user's text is escaped so
//! `%`, `_` and `\` match literally, then wrapped for a substring match.

/// Builds a substring `ILIKE` pattern; blank input means no filter.
pub fn search_pattern(raw: Option<&str>) -> Option<String> {
    let term = raw.map(str::trim).filter(|s| !s.is_empty())?;

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}
