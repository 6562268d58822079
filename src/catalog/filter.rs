//! Search and category filtering.

use std::cmp::Ordering;

use crate::models::{CategorySet, DocumentItem, ALL_CATEGORIES};

/// Select the items matching both the free-text query and the category.
///
/// The query is matched case-insensitively as a substring of the title or
/// the description; a blank query matches everything. The category must
/// equal the item's category exactly unless it is [`ALL_CATEGORIES`].
/// Source order is preserved.
pub fn filter<'a>(items: &'a [DocumentItem], query: &str, category: &str) -> Vec<&'a DocumentItem> {
    let needle = query.trim().to_lowercase();

    items
        .iter()
        .filter(|item| matches_query(item, &needle) && matches_category(item, category))
        .collect()
}

fn matches_query(item: &DocumentItem, needle: &str) -> bool {
    needle.is_empty()
        || item.title.to_lowercase().contains(needle)
        || item.description.to_lowercase().contains(needle)
}

fn matches_category(item: &DocumentItem, category: &str) -> bool {
    category == ALL_CATEGORIES || item.category == category
}

/// Distinct categories of `items`, sorted case-insensitively.
///
/// A data category spelled like [`ALL_CATEGORIES`] is left out; the sentinel
/// already selects those items.
pub fn categories(items: &[DocumentItem]) -> CategorySet {
    let mut values: Vec<String> = items
        .iter()
        .map(|item| item.category.trim())
        .filter(|category| !category.is_empty() && *category != ALL_CATEGORIES)
        .map(str::to_string)
        .collect();

    values.sort_by(|a, b| compare_labels(a, b));
    values.dedup();

    CategorySet::from_sorted(values)
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
