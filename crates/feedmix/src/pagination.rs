use std::num::NonZeroUsize;

use crate::Error;

/// Row window arithmetic for a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: NonZeroUsize,
}

/// Inclusive row window, the shape range-based table queries take.
///
/// `end` is never clamped to the number of rows that exist; a store simply
/// returns fewer rows for the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn offset(&self) -> usize {
        self.start
    }

    pub fn limit(&self) -> usize {
        self.end - self.start + 1
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Result<Self, Error> {
        NonZeroUsize::new(page_size)
            .map(|page_size| Self { page_size })
            .ok_or(Error::ZeroPageSize)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Rows to request for the 1-indexed `current_page`.
    pub fn range(&self, current_page: usize) -> Result<RowRange, Error> {
        if current_page == 0 {
            return Err(Error::ZeroPage);
        }
        let start = (current_page - 1)
            .checked_mul(self.page_size())
            .ok_or(Error::PageOutOfRange(current_page))?;
        let end = start
            .checked_add(self.page_size() - 1)
            .ok_or(Error::PageOutOfRange(current_page))?;
        Ok(RowRange { start, end })
    }

    pub fn total_pages(&self, total_rows: usize) -> usize {
        total_rows.div_ceil(self.page_size())
    }
}
