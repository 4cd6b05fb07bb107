//! Text normalisation shared by de-duplication and enrichment matching.

/// Lowercase `input`, drop punctuation, and collapse whitespace runs.
///
/// Letters keep their diacritics, so "Phở Hòa" and "pho hoa" stay distinct.
///
/// ```
/// use waypoint::domain::text::normalize_name;
///
/// assert_eq!(normalize_name("  The Grand-Hotel, Vũng Tàu! "), "the grand hotel vũng tàu");
/// ```
pub fn normalize_name(input: &str) -> String {
    let spaced: String = input
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() {
                ch.to_lowercase().collect::<String>()
            } else {
                " ".to_owned()
            }
        })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether either normalised string contains the other.
///
/// Empty strings never match.
pub fn contains_either_way(left: &str, right: &str) -> bool {
    let left = normalize_name(left);
    let right = normalize_name(right);
    if left.is_empty() || right.is_empty() {
        return false;
    }
    left.contains(&right) || right.contains(&left)
}
