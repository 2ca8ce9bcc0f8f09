//! Cross-provider music search.

mod aggregator;

pub use aggregator::{apply_sort_policy, PlatformFilter, SearchAggregator, SortBy};
