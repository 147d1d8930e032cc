//! List response normalization
//!
//! List endpoints return either a bare array or a paginated envelope
//! `{ count, next, previous, results }`. Both collapse to a `Vec`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    List(Vec<T>),
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        #[serde(default = "Vec::new")]
        results: Vec<T>,
    },
}

impl<T> Page<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Page::List(items) => items,
            Page::Paginated { results, .. } => results,
        }
    }

    /// Total reported by the backend, or the item count for bare arrays
    pub fn total(&self) -> usize {
        match self {
            Page::List(items) => items.len(),
            Page::Paginated { count, results, .. } => {
                count.map(|c| c as usize).unwrap_or(results.len())
            }
        }
    }
}
