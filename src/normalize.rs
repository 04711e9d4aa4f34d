use rustc_hash::FxHashSet;

/// Canonical comparison form of free text: lowercase, punctuation stripped,
/// whitespace collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Digits only, so "(212) 555-0100" and "212.555.0100" compare equal.
pub fn normalize_phone(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Jaccard similarity over the sets of unique characters of two strings.
///
/// Order-insensitive and cheap; returns `0.0` when either side is empty.
pub fn char_jaccard(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let left: FxHashSet<char> = a.chars().collect();
    let right: FxHashSet<char> = b.chars().collect();
    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}
