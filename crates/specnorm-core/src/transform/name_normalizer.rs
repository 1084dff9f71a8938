/// Characters that are replaced by `_` in a normalized schema name.
const SEPARATORS: [char; 4] = ['.', '/', '-', '~'];

/// Reverse JSON Pointer escaping in a single reference segment.
///
/// `~1` is decoded before `~0` so that `~01` becomes `~1`, not `/`.
pub fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Turn a schema registry key into an identifier-safe symbol.
///
/// Examples:
/// - `metabase/api.User-Model` → `metabase_api_User_Model`
/// - `a~1b~0c` → `a_b_c`
/// - `_leading..dots_` → `leading_dots`
pub fn normalize_schema_name(name: &str) -> String {
    let decoded = decode_pointer_segment(name);
    let replaced: String = decoded
        .chars()
        .map(|ch| if SEPARATORS.contains(&ch) { '_' } else { ch })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    for ch in replaced.chars() {
        if ch == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(ch);
    }

    collapsed.trim_matches('_').to_string()
}

/// Whether `name` is already in normalized form: ASCII alphanumerics joined by
/// single underscores, with no leading or trailing underscore.
pub fn is_normalized(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('_')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()))
}
