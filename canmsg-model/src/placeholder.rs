//! Placeholder resolution for net field names
//!
//! Field names embed ordinal placeholder tokens of the literal form `{k}`
//! where `k` is exactly one decimal digit, each naming a 1-based point
//! index the field draws its value from. The single-digit restriction is
//! part of the established naming convention: `{10}`, `{}` or `{a}` are
//! not tokens and pass through as literal text.

/// Extract the point indices referenced by placeholder tokens in a
/// field name, in order of appearance, duplicates preserved.
///
/// Total over any input; a name without tokens yields an empty vec.
pub fn resolve_references(field_name: &str) -> Vec<usize> {
    let bytes = field_name.as_bytes();
    let mut indices = Vec::new();
    let mut i = 0;
    while i + 2 < bytes.len() {
        if bytes[i] == b'{' && bytes[i + 1].is_ascii_digit() && bytes[i + 2] == b'}' {
            indices.push((bytes[i + 1] - b'0') as usize);
            i += 3;
        } else {
            i += 1;
        }
    }
    indices
}
