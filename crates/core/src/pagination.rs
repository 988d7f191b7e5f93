//! # Pagination Module
//!
//! Converts a row count plus a 1-based page request into a safe
//! offset/limit window. Total function: out-of-range pages clamp to the
//! last valid page instead of erroring.

use serde::{Deserialize, Serialize};

/// A safe offset/limit window over `total_pages` pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub total_pages: u64,
}

/// Compute the offset/limit window for `requested_page` (1-based).
///
/// `total_pages` is `ceil(total_items / items_per_page)`, zero when there
/// are no items. Pages past the end clamp to the last page.
pub fn safe_offset(total_items: u64, requested_page: u64, items_per_page: u64) -> PageWindow {
    debug_assert!(requested_page >= 1);
    debug_assert!(items_per_page >= 1);

    let total_pages = total_items.div_ceil(items_per_page);
    let limit = items_per_page.min(total_items);

    // Reindex to 0-based before comparing against the page count.
    let page_index = requested_page.saturating_sub(1);

    let offset = if total_pages == 0 {
        0
    } else if page_index < total_pages {
        page_index * items_per_page
    } else {
        (total_pages - 1) * items_per_page
    };

    PageWindow {
        offset,
        limit,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let window = safe_offset(6, 1, 2);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 2);
        assert_eq!(window.total_pages, 3);
    }

    #[test]
    fn test_middle_page() {
        // 6 entries, 2 per page, page 2 -> rows 3-4 of 3 pages.
        let window = safe_offset(6, 2, 2);
        assert_eq!(window.offset, 2);
        assert_eq!(window.limit, 2);
        assert_eq!(window.total_pages, 3);
    }

    #[test]
    fn test_no_items() {
        let window = safe_offset(0, 1, 10);
        assert_eq!(window.offset, 0);
        assert_eq!(window.limit, 0);
        assert_eq!(window.total_pages, 0);
    }

    #[test]
    fn test_page_beyond_end_clamps_to_last_page() {
        let last = safe_offset(6, 3, 2);
        let beyond = safe_offset(6, 99, 2);
        assert_eq!(beyond, last);
        assert_eq!(beyond.offset, 4);
    }

    #[test]
    fn test_limit_never_exceeds_total_items() {
        let window = safe_offset(3, 1, 10);
        assert_eq!(window.limit, 3);
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn test_partial_last_page() {
        let window = safe_offset(5, 3, 2);
        assert_eq!(window.offset, 4);
        assert_eq!(window.total_pages, 3);
    }

    #[test]
    fn test_window_stays_within_bounds() {
        for total_items in 0..40u64 {
            for page in 1..10u64 {
                for items_per_page in 1..8u64 {
                    let window = safe_offset(total_items, page, items_per_page);
                    if total_items == 0 {
                        assert_eq!(window.offset, 0);
                        assert_eq!(window.limit, 0);
                    } else {
                        assert!(
                            window.offset + window.limit
                                <= total_items + items_per_page - 1,
                            "window must start inside the item range"
                        );
                        assert!(window.offset < total_items);
                    }
                }
            }
        }
    }
}
