//! Building blocks for assembling a blog listing page.
//!
//! Nothing in this crate performs I/O. Callers fetch rows from wherever they
//! live, then use these types to decide which rows to request, how sponsored
//! entries are placed between posts, and which search responses are still
//! worth showing.

mod compose;
mod listing;
mod pagination;
mod search;

pub use compose::{Arranged, Cadence, FeedEntry, arrange, compose, hero};
pub use listing::ListingState;
pub use pagination::{Pagination, RowRange};
pub use search::{Debouncer, RequestTracker, Ticket};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("ad stride must be a positive integer or \"off\", got {0:?}")]
    InvalidStride(String),
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("pages are numbered from 1")]
    ZeroPage,
    #[error("page {0} is beyond the last addressable row")]
    PageOutOfRange(usize),
}
