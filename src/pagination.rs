/// Page size used when the client does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// 1-based page selection applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of records to skip before the requested page starts.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Navigation metadata derived from a page selection and a total count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total: usize) -> Self {
        let Pagination { page, per_page } = pagination;
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            page,
            total_pages,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
            has_prev_page,
            has_next_page,
        }
    }
}
