//! Page-number pagination over an in-memory, ordered collection.
//!
//! Pages are 1-based. Every navigation clamps into `[1, page_count]`, and an
//! empty collection still has exactly one (empty) page.

use std::ops::Range;

/// Holdings shown per page when not configured.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// `max(1, ceil(total / page_size))`. A zero page size counts as one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Index range `[(page_index - 1) * page_size, page_index * page_size)` of a
/// collection of `total` items, cut short at `total`. Out-of-range pages
/// (including page 0) yield an empty range.
pub fn page_range(total: usize, page_index: usize, page_size: usize) -> Range<usize> {
    if page_index == 0 {
        return 0..0;
    }
    let size = page_size.max(1);
    let start = (page_index - 1).saturating_mul(size);
    if start >= total {
        return 0..0;
    }
    start..start.saturating_add(size).min(total)
}

/// The items of page `page_index`. See [`page_range`].
pub fn slice<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    &items[page_range(items.len(), page_index, page_size)]
}

/// A borrowed view of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Current page of a collection whose length is tracked with
/// [`set_total`](Self::set_total).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_index: usize,
    page_size: usize,
    total: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 1,
            page_size: page_size.max(1),
            total: 0,
        }
    }

    pub fn with_total(page_size: usize, total: usize) -> Self {
        let mut paginator = Self::new(page_size);
        paginator.set_total(total);
        paginator
    }

    /// Update the collection length, pulling the current page back in range if
    /// the collection shrank.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page_index = self.clamp(self.page_index);
    }

    /// Jump to `page_index`, clamped. Returns the page actually selected.
    pub fn go_to(&mut self, page_index: usize) -> usize {
        self.page_index = self.clamp(page_index);
        self.page_index
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.page_index.saturating_add(1))
    }

    pub fn previous(&mut self) -> usize {
        self.go_to(self.page_index.saturating_sub(1))
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total, self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.page_count()
    }

    /// Navigation controls are only worth showing past one page.
    pub fn needs_controls(&self) -> bool {
        self.total > self.page_size
    }

    /// The current page of `items`. The index is clamped against
    /// `items.len()`, so a stale `total` never yields an out-of-range view.
    pub fn page<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        let count = page_count(items.len(), self.page_size);
        let index = self.page_index.clamp(1, count);
        Page {
            items: slice(items, index, self.page_size),
            page_index: index,
            page_size: self.page_size,
            page_count: count,
        }
    }

    /// Index range of the current page within a collection of `total()` items.
    pub fn range(&self) -> Range<usize> {
        page_range(self.total, self.page_index, self.page_size)
    }

    fn clamp(&self, page_index: usize) -> usize {
        page_index.clamp(1, self.page_count())
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
