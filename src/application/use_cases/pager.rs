use crate::domain::page::{Page, PageLinks, PaginationMeta};
use crate::domain::record::ResultSet;

/// Links shown on each side of the current page
const LINK_RADIUS: usize = 2;

/// Page position over the current ResultSet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Changing the page size always goes back to page 1
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Move to `page`. Out-of-range requests are ignored and return false.
    pub fn go_to(&mut self, page: usize, total: usize) -> bool {
        if page < 1 || page > self.page_count(total).max(1) {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next(&mut self, total: usize) -> bool {
        self.go_to(self.current_page + 1, total)
    }

    pub fn previous(&mut self, total: usize) -> bool {
        self.go_to(self.current_page.saturating_sub(1), total)
    }

    fn effective_page(&self, total: usize) -> usize {
        self.current_page.clamp(1, self.page_count(total).max(1))
    }

    pub fn meta(&self, total: usize) -> PaginationMeta {
        let current_page = self.effective_page(total);
        let start = ((current_page - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);

        PaginationMeta {
            current_page,
            page_count: self.page_count(total),
            page_size: self.page_size,
            total,
            first_item: if start < end { start + 1 } else { 0 },
            last_item: end,
        }
    }

    /// Slice of the current page; never out of bounds
    pub fn page<'a>(&self, results: &'a ResultSet) -> Page<'a> {
        let meta = self.meta(results.len());
        let start = meta.first_item.saturating_sub(1);
        let records = if meta.first_item == 0 {
            &results.records()[..0]
        } else {
            &results.records()[start..meta.last_item]
        };
        Page { records, meta }
    }

    /// Page numbers around the current page
    pub fn links(&self, total: usize) -> PageLinks {
        let page_count = self.page_count(total);
        if page_count <= 1 {
            return PageLinks {
                pages: Vec::new(),
                leading_ellipsis: false,
                trailing_ellipsis: false,
            };
        }

        let current = self.effective_page(total);
        let first = current.saturating_sub(LINK_RADIUS).max(1);
        let last = (current + LINK_RADIUS).min(page_count);

        PageLinks {
            pages: (first..=last).collect(),
            leading_ellipsis: first > 1,
            trailing_ellipsis: last < page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dataset::FieldMapping;
    use crate::domain::record::Record;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn results(count: usize) -> ResultSet {
        let mapping = Arc::new(FieldMapping::labor_announcement());
        ResultSet::new(
            (1..=count as u64)
                .map(|id| Arc::new(Record::new("t", HashMap::new(), Arc::clone(&mapping)).with_id(id)))
                .collect(),
        )
    }

    #[test]
    fn test_page_count_rounds_up() {
        let pager = Pager::new(50);
        assert_eq!(pager.page_count(0), 0);
        assert_eq!(pager.page_count(50), 1);
        assert_eq!(pager.page_count(51), 2);
    }

    #[test]
    fn test_every_valid_page_is_non_empty_and_in_bounds() {
        let results = results(23);
        let mut pager = Pager::new(5);

        for page in 1..=pager.page_count(results.len()) {
            assert!(pager.go_to(page, results.len()));
            let slice = pager.page(&results);
            assert!(!slice.records.is_empty());
            assert_eq!(slice.records[0].id as usize, slice.meta.first_item);
        }

        let last = pager.page(&results);
        assert_eq!(last.records.len(), 3);
        assert_eq!(last.meta.first_item, 21);
        assert_eq!(last.meta.last_item, 23);
    }

    #[test]
    fn test_out_of_range_navigation_is_rejected() {
        let mut pager = Pager::new(10);
        assert!(pager.go_to(2, 15));
        assert!(!pager.go_to(3, 15));
        assert!(!pager.go_to(0, 15));
        assert!(!pager.next(15));
        assert_eq!(pager.current_page(), 2);
        assert!(pager.previous(15));
        assert!(!pager.previous(15));
    }

    #[test]
    fn test_page_size_change_resets_to_first_page() {
        let mut pager = Pager::new(10);
        pager.go_to(3, 100);
        pager.set_page_size(20);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.page_size(), 20);
    }

    #[test]
    fn test_stale_page_is_clamped_after_results_shrink() {
        let mut pager = Pager::new(10);
        assert!(pager.go_to(5, 100));

        let small = results(12);
        let page = pager.page(&small);
        assert_eq!(page.meta.current_page, 2);
        assert_eq!(page.records.len(), 2);
    }

    #[test]
    fn test_empty_results_give_empty_page() {
        let mut pager = Pager::new(10);
        let empty = results(0);
        let page = pager.page(&empty);
        assert!(page.records.is_empty());
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.page_count, 0);
        assert_eq!((page.meta.first_item, page.meta.last_item), (0, 0));
        assert!(pager.go_to(1, 0));
    }

    #[test]
    fn test_links_window_with_ellipsis() {
        let mut pager = Pager::new(10);
        pager.go_to(5, 100);
        let links = pager.links(100);
        assert_eq!(links.pages, vec![3, 4, 5, 6, 7]);
        assert!(links.leading_ellipsis);
        assert!(links.trailing_ellipsis);

        pager.go_to(1, 100);
        let links = pager.links(100);
        assert_eq!(links.pages, vec![1, 2, 3]);
        assert!(!links.leading_ellipsis);

        assert!(pager.links(5).pages.is_empty());
    }
}
