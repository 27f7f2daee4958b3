//! Fuzzy search over item names.
//!
//! Ranking sits behind [`Matcher`] so it can be swapped. The contract that
//! matters to callers is the fallback: an empty query returns the full list,
//! and [`visible_items`] shows the full list when nothing matched.

use crate::model::Item;
use crate::validate::substring_distance;

/// Searchable item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Name,
}

/// Options for building a [`SearchIndex`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub keys: Vec<SearchKey>,

    /// Fraction of the query length that may be wrong, in `0.0..=1.0`
    pub threshold: f64,

    pub case_sensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            keys: vec![SearchKey::Name],
            threshold: 0.5,
            case_sensitive: false,
        }
    }
}

/// Ranks items against a query.
pub trait Matcher {
    /// Matching items, best first. An empty query returns every item in order.
    fn search(&self, items: &[Item], query: &str) -> Vec<Item>;
}

/// Edit-distance matcher.
///
/// An item matches when some window of its name is within
/// `floor(query_len * threshold)` edits of the query. Results are ordered by
/// error count, then by how early the match ends, then by list position.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    options: SearchOptions,
}

impl FuzzyMatcher {
    #[must_use]
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    fn normalize(&self, s: &str) -> Vec<char> {
        if self.options.case_sensitive {
            s.chars().collect()
        } else {
            s.chars().flat_map(char::to_lowercase).collect()
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn max_errors(&self, query_len: usize) -> usize {
        let threshold = self.options.threshold.clamp(0.0, 1.0);
        (query_len as f64 * threshold).floor() as usize
    }

    fn field<'a>(key: SearchKey, item: &'a Item) -> &'a str {
        match key {
            SearchKey::Name => &item.name,
        }
    }
}

impl Matcher for FuzzyMatcher {
    fn search(&self, items: &[Item], query: &str) -> Vec<Item> {
        if query.is_empty() {
            return items.to_vec();
        }

        let pattern = self.normalize(query);
        let max_errors = self.max_errors(pattern.len());

        let mut scored: Vec<(usize, usize, usize)> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                self.options
                    .keys
                    .iter()
                    .map(|&key| substring_distance(&pattern, &self.normalize(Self::field(key, item))))
                    .min()
                    .filter(|&(errors, _)| errors <= max_errors)
                    .map(|(errors, end)| (errors, end, index))
            })
            .collect();

        scored.sort_unstable();
        scored.into_iter().map(|(_, _, index)| items[index].clone()).collect()
    }
}

/// Search index over one snapshot of the item list.
///
/// Rebuild it whenever the list changes.
#[derive(Debug, Clone)]
pub struct SearchIndex<M = FuzzyMatcher> {
    items: Vec<Item>,
    matcher: M,
}

impl SearchIndex<FuzzyMatcher> {
    #[must_use]
    pub fn new(items: &[Item], options: SearchOptions) -> Self {
        Self::with_matcher(items, FuzzyMatcher::new(options))
    }
}

impl<M: Matcher> SearchIndex<M> {
    pub fn with_matcher(items: &[Item], matcher: M) -> Self {
        Self {
            items: items.to_vec(),
            matcher,
        }
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Item> {
        self.matcher.search(&self.items, query)
    }

    /// Items to display for `query`, falling back to the full list.
    #[must_use]
    pub fn visible(&self, query: &str) -> Vec<Item> {
        visible_items(&self.items, self.search(query), query)
    }
}

/// The list a caller should display: ranked results only when the query is
/// non-empty and produced at least one match, otherwise the full list.
#[must_use]
pub fn visible_items(items: &[Item], results: Vec<Item>, query: &str) -> Vec<Item> {
    if query.is_empty() || results.is_empty() {
        items.to_vec()
    } else {
        results
    }
}
