use serde::Serialize;
use std::sync::Arc;

use super::record::Record;

/// Pagination metadata handed to the renderer alongside a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// 1-based current page
    pub current_page: usize,
    /// Number of pages, 0 when the result set is empty
    pub page_count: usize,
    pub page_size: usize,
    /// Size of the whole result set
    pub total: usize,
    /// 1-based number of the first item on the page, 0 when empty
    pub first_item: usize,
    /// 1-based number of the last item on the page, 0 when empty
    pub last_item: usize,
}

/// Compact set of page links around the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub pages: Vec<usize>,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
}

/// One page worth of records
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub records: &'a [Arc<Record>],
    pub meta: PaginationMeta,
}
