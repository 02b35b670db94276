/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    pub page_number: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

impl<T> PaginatedList<T> {
    pub fn new(items: Vec<T>, page_number: u64, page_size: u64, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };
        Self {
            items,
            page_number,
            total_pages,
            total_count,
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            total_pages: self.total_pages,
            total_count: self.total_count,
        }
    }
}

/// Page request, 1-based; out of range values are clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u64 = 10;
    pub const MAX_PAGE_SIZE: u64 = 100;

    pub fn new(page_number: Option<u64>, page_size: Option<u64>) -> Self {
        Self {
            page_number: page_number.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(Self::DEFAULT_PAGE_SIZE)
                .clamp(1, Self::MAX_PAGE_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page: PaginatedList<u8> = PaginatedList::new(vec![], 1, 10, 21);

        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page());
        assert!(!page.has_previous_page());
    }

    #[test]
    fn test_page_request_clamps() {
        let request = PageRequest::new(Some(0), Some(1000));

        assert_eq!(request.page_number, 1);
        assert_eq!(request.page_size, PageRequest::MAX_PAGE_SIZE);
    }
}
