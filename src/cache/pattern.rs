//! Glob Pattern Module
//!
//! Key matching for pattern deletes. Both cache tiers use the same matcher so
//! they agree on which keys a pattern covers.

/// Wildcard matching any (possibly empty) sequence of characters
pub const WILDCARD: char = '*';

/// Returns true if `text` matches the glob `pattern`.
///
/// `*` matches any sequence of characters, every other character matches
/// itself.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `*` seen and the text index it was tried against
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == WILDCARD {
            backtrack = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == WILDCARD)
}
