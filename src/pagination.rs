//! Fixed-size page window over a visible subset.

use std::ops::Range;

/// Tracks the current 1-based page over a list of `total_items`.
///
/// The current page always satisfies `1 <= page <= total_pages()`, where an
/// empty list still has one (empty) page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
    total_items: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            total_items: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Jump to `page`, clamped into `[1, total_pages]`.
    pub fn go_to(&mut self, page: i64) -> usize {
        let last = self.total_pages() as i64;
        self.current_page = page.clamp(1, last) as usize;
        self.current_page
    }

    pub fn next(&mut self) -> usize {
        if self.has_next() {
            self.current_page += 1;
        }
        self.current_page
    }

    pub fn previous(&mut self) -> usize {
        if self.has_previous() {
            self.current_page -= 1;
        }
        self.current_page
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Record a new visible length, clamping the current page if it no longer
    /// exists. Returns true when the page had to move.
    pub fn sync(&mut self, total_items: usize) -> bool {
        self.total_items = total_items;
        let last = self.total_pages();
        if self.current_page > last {
            self.current_page = last;
            return true;
        }
        false
    }

    /// Index range of the current page within the visible subset.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current_page - 1) * self.page_size;
        let start = start.min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// The current page of `items`.
    pub fn current_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator(page_size: usize, total: usize) -> Paginator {
        let mut p = Paginator::new(page_size);
        p.sync(total);
        p
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let p = paginator(9, 0);
        assert_eq!(p.total_pages(), 1);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.range(), 0..0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(paginator(9, 23).total_pages(), 3);
        assert_eq!(paginator(9, 18).total_pages(), 2);
        assert_eq!(paginator(9, 1).total_pages(), 1);
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let mut p = paginator(0, 3);
        assert_eq!(p.page_size(), 1);
        assert_eq!(p.total_pages(), 3);
        p.set_page_size(0);
        assert_eq!(p.page_size(), 1);
    }

    #[test]
    fn test_go_to_clamps_any_integer() {
        let mut p = paginator(10, 25);
        for page in [i64::MIN, -5, 0, 1, 2, 3, 4, 1_000, i64::MAX] {
            let landed = p.go_to(page);
            assert!((1..=3).contains(&landed), "page {page} landed on {landed}");
        }
        assert_eq!(p.go_to(-3), 1);
        assert_eq!(p.go_to(99), 3);
        assert_eq!(p.go_to(2), 2);
    }

    #[test]
    fn test_next_and_previous_stop_at_boundaries() {
        let mut p = paginator(10, 25);
        assert_eq!(p.previous(), 1);
        assert_eq!(p.next(), 2);
        assert_eq!(p.next(), 3);
        assert_eq!(p.next(), 3);
        assert!(!p.has_next());
        assert_eq!(p.previous(), 2);
        assert!(p.has_previous());
    }

    #[test]
    fn test_sync_clamps_when_list_shrinks() {
        let mut p = paginator(10, 25);
        p.go_to(3);
        assert!(p.sync(5));
        assert_eq!(p.current_page(), 1);
        assert!(!p.sync(5));
    }

    #[test]
    fn test_sync_keeps_page_when_list_grows() {
        let mut p = paginator(10, 25);
        p.go_to(2);
        assert!(!p.sync(100));
        assert_eq!(p.current_page(), 2);
    }

    #[test]
    fn test_set_page_size_resets_to_first_page() {
        let mut p = paginator(5, 30);
        p.go_to(4);
        p.set_page_size(10);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(), 3);
    }

    #[test]
    fn test_current_slice_last_page_is_partial() {
        let items: Vec<u32> = (0..23).collect();
        let mut p = paginator(9, items.len());
        assert_eq!(p.current_slice(&items).len(), 9);
        p.go_to(3);
        assert_eq!(p.current_slice(&items), &[18, 19, 20, 21, 22]);
    }

    #[test]
    fn test_current_slice_tolerates_shorter_input() {
        let p = paginator(10, 25);
        let items: Vec<u32> = (0..4).collect();
        assert_eq!(p.current_slice(&items).len(), 4);
    }
}
