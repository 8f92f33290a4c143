use serde::Serialize;

/// Cards per page.
pub const PAGE_SIZE: i64 = 9;

/// GitHub never serves more than this many search results for one query.
pub const SEARCH_RESULT_CAP: u64 = 1000;

/// How Next/Previous map onto the search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagingMode {
    /// Ask the API for `page`/`per_page` and render what comes back.
    #[default]
    Server,
    /// Fetch the default first page and slice `[offset, offset + 9)` locally.
    Client,
}

impl PagingMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "server" => Some(PagingMode::Server),
            "client" | "legacy" => Some(PagingMode::Client),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    offset: i64,
    page_size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::first()
    }
}

impl Pagination {
    pub fn first() -> Self {
        Self {
            offset: 0,
            page_size: PAGE_SIZE,
        }
    }

    pub fn offset(self) -> i64 {
        self.offset
    }

    pub fn page_size(self) -> i64 {
        self.page_size
    }

    /// Not clamped: the UI disables the control at a boundary instead.
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + self.page_size,
            ..self
        }
    }

    pub fn previous(self) -> Self {
        Self {
            offset: self.offset - self.page_size,
            ..self
        }
    }

    pub fn is_first(self) -> bool {
        self.offset <= 0
    }

    /// `[start, end)` where `end` is an absolute index, not a count.
    pub fn slice_bounds(self) -> (i64, i64) {
        (self.offset, self.offset + self.page_size)
    }

    /// 1-based API page holding this offset.
    pub fn api_page(self) -> u32 {
        if self.offset <= 0 {
            return 1;
        }
        u32::try_from(self.offset / self.page_size + 1).unwrap_or(u32::MAX)
    }

    /// True once this window reaches the end of `total` known results.
    pub fn reaches_total(self, total: u64) -> bool {
        let total = total.min(SEARCH_RESULT_CAP);
        self.offset.saturating_add(self.page_size) >= i64::try_from(total).unwrap_or(i64::MAX)
    }
}

/// Takes `items[start..end]`, clamping both bounds into range.
pub fn slice_page<T>(items: &[T], start: i64, end: i64) -> &[T] {
    let len = items.len() as i64;
    let start = start.clamp(0, len);
    let end = end.clamp(0, len);
    if start >= end {
        return &[];
    }
    &items[start as usize..end as usize]
}
