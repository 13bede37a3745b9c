//! Fixed-size page slicing.

use std::ops::Range;

use crate::error::{ListError, Result};

/// A page of items with the total count across all pages.
///
/// This is the one shape list state consumes, whatever envelope the API
/// returned it in.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page (or the whole data set for unpaginated endpoints).
    pub items: Vec<T>,
    /// Total count of items across all pages.
    pub total: usize,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }

    /// A page holding the full data set.
    #[must_use]
    pub fn complete(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Returns `max(1, ceil(total_items / page_size))`.
#[must_use]
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// Clamps a page number into `[1, total_pages]`.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page (1-indexed).
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
    /// Total count of items (before pagination).
    pub total_items: usize,
    /// Number of pages, at least 1.
    pub total_pages: usize,
}

impl PageInfo {
    /// Creates page metadata, rejecting pages outside `[1, total_pages]`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidPageSize`] for a zero page size and
    /// [`ListError::PageOutOfRange`] for a page outside the range.
    pub fn new(page: usize, page_size: usize, total_items: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(ListError::InvalidPageSize(page_size));
        }
        let total_pages = total_pages(total_items, page_size);
        if page == 0 || page > total_pages {
            return Err(ListError::PageOutOfRange { page, total_pages });
        }
        Ok(Self {
            page,
            page_size,
            total_items,
            total_pages,
        })
    }

    /// Creates page metadata with the page clamped into range.
    pub(crate) fn clamped(page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(total_items, page_size);
        Self {
            page: clamp_page(page, total_pages),
            page_size,
            total_items,
            total_pages,
        }
    }

    /// Index range of this page within the full sequence.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total_items);
        let end = (self.page * self.page_size).min(self.total_items);
        start..end
    }

    /// Returns whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Returns whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based ordinal of the first item shown, 0 when empty.
    #[must_use]
    pub fn first_item(&self) -> usize {
        let range = self.range();
        if range.is_empty() {
            0
        } else {
            range.start + 1
        }
    }

    /// 1-based ordinal of the last item shown, 0 when empty.
    #[must_use]
    pub fn last_item(&self) -> usize {
        self.range().end
    }

    /// Renders `"Showing 21-40 of 45"`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Showing {}-{} of {}",
            self.first_item(),
            self.last_item(),
            self.total_items
        )
    }
}

/// One page of a borrowed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice<'a, T> {
    /// Items on the page.
    pub items: &'a [T],
    /// Page metadata.
    pub info: PageInfo,
}

/// Slices `items` into the requested page.
///
/// # Errors
///
/// Requesting a page outside `[1, total_pages]` is an error; callers clamp
/// first.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Result<PageSlice<'_, T>> {
    let info = PageInfo::new(page, page_size, items.len())?;
    Ok(PageSlice {
        items: &items[info.range()],
        info,
    })
}

/// An entry in the page-link bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    /// Link to a page.
    Page(usize),
    /// Elided pages.
    Gap,
}

/// Page links to render: the first and last page, the current page and its
/// neighbours, with gaps where pages are elided (`1 … 4 5 6 … 10`).
#[must_use]
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageLink> {
    let total_pages = total_pages.max(1);
    let current = clamp_page(current, total_pages);
    (1..=total_pages)
        .filter_map(|n| {
            if n == 1 || n == total_pages || (n + 1 >= current && n <= current + 1) {
                Some(PageLink::Page(n))
            } else if (n + 2 == current && current > 3)
                || (n == current + 2 && current + 2 < total_pages)
            {
                Some(PageLink::Gap)
            } else {
                None
            }
        })
        .collect()
}
