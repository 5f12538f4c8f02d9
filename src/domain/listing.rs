use std::cmp;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ListRequest {
    page: u32,
    page_size: u32,
}

impl ListRequest {
    /// Build a request, falling back to page 1 and the default page size for
    /// zero values and clamping the size to `MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            cmp::min(page_size, MAX_PAGE_SIZE)
        };

        Self { page, page_size }
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total: u64) -> Self {
        Self {
            items,
            page: page.max(1),
            page_size: page_size.max(1),
            total,
        }
    }
}
