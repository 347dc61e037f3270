//! Page Module
//!
//! Slices one page out of a cached result set.

use serde::Serialize;

use crate::upstream::Item;

// == Source ==
/// Where a page was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Sliced from an entry that was already live
    Cache,
    /// Sliced from a result set fetched by this very request
    Fresh,
}

// == Page Result ==
/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// At most `page_size` items, in upstream order
    pub items: Vec<Item>,
    /// Page number this slice corresponds to
    pub page: u32,
    /// Whether items exist past this page
    pub has_more: bool,
    /// Cache or fresh upstream fetch
    pub source: Source,
}

impl PageResult {
    /// Slices page `page` (1-based) of `page_size` items out of `results`.
    ///
    /// A page past the end yields no items and `has_more = false`.
    pub fn slice(results: &[Item], page: u32, page_size: u32, source: Source) -> Self {
        let page_size = page_size as usize;
        let end = (page as usize).saturating_mul(page_size);
        let start = end.saturating_sub(page_size);

        let items = if start < results.len() {
            results[start..end.min(results.len())].to_vec()
        } else {
            Vec::new()
        };

        Self {
            items,
            page,
            has_more: end < results.len(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(n: usize) -> Vec<Item> {
        (1..=n).map(|i| json!({ "rank": i })).collect()
    }

    fn ranks(page: &PageResult) -> Vec<u64> {
        page.items
            .iter()
            .map(|item| item["rank"].as_u64().unwrap())
            .collect()
    }

    #[test]
    fn test_last_partial_page() {
        let results = items(37);
        let page = PageResult::slice(&results, 4, 10, Source::Cache);

        assert_eq!(ranks(&page), (31..=37).collect::<Vec<_>>());
        assert_eq!(page.page, 4);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let results = items(37);
        let page = PageResult::slice(&results, 5, 10, Source::Cache);

        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_middle_page_has_more() {
        let results = items(37);
        let page = PageResult::slice(&results, 2, 10, Source::Cache);

        assert_eq!(ranks(&page), (11..=20).collect::<Vec<_>>());
        assert!(page.has_more);
    }

    #[test]
    fn test_exact_multiple_has_no_more() {
        let results = items(20);
        let page = PageResult::slice(&results, 2, 10, Source::Cache);

        assert_eq!(page.items.len(), 10);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_size_larger_than_set() {
        let results = items(5);
        let page = PageResult::slice(&results, 1, 100, Source::Fresh);

        assert_eq!(page.items.len(), 5);
        assert!(!page.has_more);
        assert_eq!(page.source, Source::Fresh);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let results = items(3);
        let page = PageResult::slice(&results, u32::MAX, u32::MAX, Source::Cache);

        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Cache).unwrap(), "\"cache\"");
        assert_eq!(serde_json::to_string(&Source::Fresh).unwrap(), "\"fresh\"");
    }
}
