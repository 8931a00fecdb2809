//! Page Window
//!
//! Clamped 1-based pagination over the ranked id list. An empty result set
//! still has one (empty) page.

use crate::core::model::PageInfo;

#[derive(Debug, Clone)]
pub struct PageWindow {
    current: usize,
    page_size: usize,
    item_count: usize,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
            item_count: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        ((self.item_count + self.page_size - 1) / self.page_size).max(1)
    }

    /// Reset to page 1 over a new item count.
    pub fn reset(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.current = 1;
    }

    /// Clamp `page` into `[1, total_pages]` and make it current.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current = page.clamp(1, self.total_pages());
        self.current
    }

    /// Index range of the current page within the ranked list.
    pub fn slice_bounds(&self) -> (usize, usize) {
        let start = (self.current - 1) * self.page_size;
        let end = (start + self.page_size).min(self.item_count);
        (start, end.max(start))
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            page: self.current,
            total_pages: self.total_pages(),
            total_results: self.item_count,
        }
    }
}
