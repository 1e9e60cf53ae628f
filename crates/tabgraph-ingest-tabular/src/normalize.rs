//! Column title normalization.

/// Turn a raw column title into a name usable as an IRI fragment.
///
/// Surrounding whitespace is dropped, then every character outside
/// `[A-Za-z0-9_]` becomes `_`. Case is preserved and the length in characters
/// never changes after trimming.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Percent-encode a normalized name for use inside a property IRI.
pub fn encode_name(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}

/// Fallback title for a headerless column at `index` (0-based).
pub fn positional_title(index: usize) -> String {
    format!("column_{}", index + 1)
}
