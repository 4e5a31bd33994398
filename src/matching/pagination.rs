//! Pagination for the private filter browser.

/// Filters shown per page in the inline browser.
pub const PER_PAGE: usize = 10;

/// One clamped page of an item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number after clamping
    pub number: usize,
    /// Total pages, at least 1 even for an empty list
    pub total_pages: usize,
    /// First item index, inclusive
    pub start: usize,
    /// End item index, exclusive
    pub end: usize,
}

impl Page {
    /// Clamp a requested 1-based page against the list size.
    ///
    /// `per_page` must be non-zero.
    pub fn clamped(total_items: usize, requested: usize, per_page: usize) -> Self {
        let total_pages = total_items.div_ceil(per_page).max(1);
        let number = requested.clamp(1, total_pages);
        let start = (number - 1) * per_page;
        let end = (start + per_page).min(total_items);

        Self {
            number,
            total_pages,
            start,
            end,
        }
    }

    /// Whether a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_over_25_items() {
        let p1 = Page::clamped(25, 1, 10);
        assert_eq!((p1.start, p1.end), (0, 10));
        assert!(!p1.has_prev());
        assert!(p1.has_next());

        let p2 = Page::clamped(25, 2, 10);
        assert_eq!((p2.start, p2.end), (10, 20));
        assert!(p2.has_prev());
        assert!(p2.has_next());

        let p3 = Page::clamped(25, 3, 10);
        assert_eq!((p3.start, p3.end), (20, 25));
        assert!(p3.has_prev());
        assert!(!p3.has_next());
    }

    #[test]
    fn test_out_of_range_pages_clamp() {
        let low = Page::clamped(25, 0, 10);
        assert_eq!(low.number, 1);

        let high = Page::clamped(25, 4, 10);
        assert_eq!(high.number, 3);
        assert_eq!((high.start, high.end), (20, 25));
    }

    #[test]
    fn test_empty_list_is_one_empty_page() {
        let p = Page::clamped(0, 1, 10);
        assert_eq!(p.number, 1);
        assert_eq!(p.total_pages, 1);
        assert_eq!((p.start, p.end), (0, 0));
        assert!(!p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn test_exact_multiple_has_no_partial_page() {
        let p = Page::clamped(20, 2, 10);
        assert_eq!(p.total_pages, 2);
        assert_eq!((p.start, p.end), (10, 20));
        assert!(!p.has_next());
    }
}
