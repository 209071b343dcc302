//! Fixed-size page windows over filtered collections

/// Requested page and page size for one list view
///
/// The requested page may point past the end after the collection shrinks; every read
/// clamps it into `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: usize,
    page_size: usize,
}

/// One rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, already clamped
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PageWindow {
    /// A zero page size is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Raw requested page, before clamping
    pub fn requested_page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size).max(1)
    }

    pub fn current_page(&self, total_items: usize) -> usize {
        self.page.clamp(1, self.total_pages(total_items))
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Jump to a page; out-of-range values are clamped on read
    pub fn go_to(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Advance one page; no-op on the last page
    pub fn next(&mut self, total_items: usize) {
        let current = self.current_page(total_items);
        self.page = (current + 1).min(self.total_pages(total_items));
    }

    /// Go back one page; no-op on the first page
    pub fn previous(&mut self, total_items: usize) {
        let current = self.current_page(total_items);
        self.page = current.saturating_sub(1).max(1);
    }

    /// Slice the current page out of a filtered, sorted collection
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total_items = items.len();
        let total_pages = self.total_pages(total_items);
        let number = self.current_page(total_items);
        let items = items
            .into_iter()
            .skip((number - 1) * self.page_size)
            .take(self.page_size)
            .collect();

        Page {
            items,
            number,
            total_pages,
            total_items,
        }
    }
}
