//! Duplicate name detection.

use crate::model::Item;
use std::collections::HashMap;

/// Names that occur two or more times, by exact string equality.
///
/// Output is in order of each name's first appearance in `items`.
#[must_use]
pub fn duplicates(items: &[Item]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for item in items {
        let count = counts.entry(item.name.as_str()).or_insert(0);
        if *count == 0 {
            order.push(&item.name);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|name| counts[name] > 1)
        .map(str::to_string)
        .collect()
}

/// Whether `name` is in a `duplicates` result.
#[must_use]
pub fn is_duplicate(duplicates: &[String], name: &str) -> bool {
    duplicates.iter().any(|d| d == name)
}
