//! Page-number pagination that never fails.
//!
//! A feed always has at least one page (possibly empty). Requested page numbers
//! outside `1..=num_pages` clamp to the nearest valid page.

use std::num::NonZeroUsize;

use serde::Serialize;

/// One page of an already filtered and ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Current page number (1-indexed), after clamping.
    pub number: usize,
    /// Total number of pages, at least 1.
    pub num_pages: usize,
    /// Total number of items across all pages.
    pub count: usize,
    /// Items per page.
    pub page_size: usize,
}

impl<T> Page<T> {
    /// True when a later page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// True when an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Next page number, if any.
    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }

    /// Previous page number, if any.
    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page (0 when the feed is empty).
    pub fn start_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            (self.number - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item on this page (0 when the feed is empty).
    pub fn end_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            self.start_index() + self.items.len() - 1
        }
    }

    /// Maps the items, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            page_size: self.page_size,
        }
    }
}

/// Number of pages needed for `count` items; an empty set still has one page.
pub fn num_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

/// Slices `items` into the requested page, clamping `requested` into `1..=num_pages`.
pub fn paginate<T>(items: Vec<T>, requested: usize, page_size: NonZeroUsize) -> Page<T> {
    let count = items.len();
    let num_pages = num_pages(count, page_size);
    let number = requested.clamp(1, num_pages);
    let offset = (number - 1) * page_size.get();

    let items = items
        .into_iter()
        .skip(offset)
        .take(page_size.get())
        .collect();

    Page {
        items,
        number,
        num_pages,
        count,
        page_size: page_size.get(),
    }
}
