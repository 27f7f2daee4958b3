//! Edit-distance helpers and input normalization.
//!
//! Backs the fuzzy item search, "did you mean" suggestions for item
//! references, and the shell's command synonyms. Resolution is three-tier:
//! exact match → synonym lookup → error with suggestion.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// ── Shell command vocabulary ─────────────────────────────────

pub static SHELL_COMMANDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    [
        "list", "add", "check", "edit", "delete", "move", "search", "clear", "dupes", "title",
        "save", "reload", "help", "quit",
    ]
    .into_iter()
    .collect()
});

pub static SHELL_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("ls", "list"),
        ("show", "list"),
        ("new", "add"),
        ("toggle", "check"),
        ("done", "check"),
        ("uncheck", "check"),
        ("rename", "edit"),
        ("rm", "delete"),
        ("del", "delete"),
        ("remove", "delete"),
        ("mv", "move"),
        ("find", "search"),
        ("write", "save"),
        ("refresh", "reload"),
        ("?", "help"),
        ("exit", "quit"),
        ("q", "quit"),
    ]
    .into_iter()
    .collect()
});

/// Normalize a shell command word via exact match or synonym lookup.
///
/// Returns the canonical command, or an error with the original input
/// and an optional suggestion.
pub fn normalize_shell_command(input: &str) -> Result<&'static str, (String, Option<String>)> {
    let lower = input.to_lowercase();

    // Tier 1: exact match
    if let Some(&canonical) = SHELL_COMMANDS.get(lower.as_str()) {
        return Ok(canonical);
    }

    // Tier 2: synonym lookup
    if let Some(&canonical) = SHELL_SYNONYMS.get(lower.as_str()) {
        return Ok(canonical);
    }

    // Tier 3: closest suggestion
    let suggestion = find_closest_match(&lower, &SHELL_COMMANDS, &SHELL_SYNONYMS);
    Err((input.to_string(), suggestion))
}

/// Find the closest matching value across valid set and synonyms.
fn find_closest_match(
    input: &str,
    valid: &HashSet<&str>,
    synonyms: &HashMap<&str, &str>,
) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;

    for &v in valid.iter().chain(synonyms.keys()) {
        let dist = levenshtein_distance(input, v);
        if dist <= 2 && best.is_none_or(|(_, d)| dist < d) {
            // For synonyms, show what it maps to
            let shown = synonyms.get(v).copied().unwrap_or(v);
            best = Some((shown, dist));
        }
    }

    best.map(|(v, _)| v.to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Best approximate occurrence of `pattern` anywhere inside `text`.
///
/// Same recurrence as [`levenshtein_distance`] but with a free start
/// position in `text` (row 0 is all zeros). Returns `(errors, end)` where
/// `end` is the char index just past the best-matching window; ties keep
/// the leftmost window.
pub fn substring_distance(pattern: &[char], text: &[char]) -> (usize, usize) {
    if pattern.is_empty() {
        return (0, 0);
    }
    if text.is_empty() {
        return (pattern.len(), 0);
    }

    // Column-wise: col[i] = best cost of matching pattern[..i] ending at text[j]
    let mut col: Vec<usize> = (0..=pattern.len()).collect();
    let mut best = (pattern.len(), 0);

    for (j, &t) in text.iter().enumerate() {
        let mut diag = col[0];
        col[0] = 0;
        for i in 1..=pattern.len() {
            let cost = usize::from(pattern[i - 1] != t);
            let next = (col[i] + 1).min(col[i - 1] + 1).min(diag + cost);
            diag = col[i];
            col[i] = next;
        }
        if col[pattern.len()] < best.0 {
            best = (col[pattern.len()], j + 1);
        }
    }

    best
}

/// Find existing item names similar to the searched reference.
///
/// Returns up to `max` distinct suggestions with edit distance ≤ 3,
/// sorted by distance then alphabetically.
pub fn find_similar_names(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| (levenshtein_distance(searched, name), name.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    candidates.dedup_by(|a, b| a.1 == b.1);

    candidates
        .into_iter()
        .take(max)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_normalize_shell_command() {
        assert_eq!(normalize_shell_command("add"), Ok("add"));
        assert_eq!(normalize_shell_command("RM"), Ok("delete"));
        assert_eq!(normalize_shell_command("ls"), Ok("list"));

        let (input, suggestion) = normalize_shell_command("chek").unwrap_err();
        assert_eq!(input, "chek");
        assert_eq!(suggestion.as_deref(), Some("check"));
        assert!(normalize_shell_command("xyzzyplugh").unwrap_err().1.is_none());
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_substring_distance() {
        assert_eq!(substring_distance(&chars("milk"), &chars("buy milk today")), (0, 8));
        assert_eq!(substring_distance(&chars("mlik"), &chars("milk")).0, 2);
        assert_eq!(substring_distance(&chars("egs"), &chars("eggs")).0, 1);
        assert_eq!(substring_distance(&chars("abc"), &[]), (3, 0));
        assert_eq!(substring_distance(&[], &chars("abc")), (0, 0));
    }

    #[test]
    fn test_find_similar_names() {
        let names = vec![
            "milk".to_string(),
            "milk".to_string(),
            "silk".to_string(),
            "bread".to_string(),
            String::new(),
        ];
        let result = find_similar_names("mlk", &names, 3);
        assert_eq!(result, vec!["milk".to_string(), "silk".to_string()]);
    }
}
