use crate::Error;

/// Page number and search term of a listing view.
///
/// Changing the search term always sends the view back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    page: usize,
    query: String,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            page: 1,
            query: String::new(),
        }
    }
}

impl ListingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(page: usize, query: &str) -> Result<Self, Error> {
        if page == 0 {
            return Err(Error::ZeroPage);
        }
        Ok(Self {
            page,
            query: query.trim().to_string(),
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns true if the term changed (and the page was reset).
    pub fn set_query(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query == self.query {
            return false;
        }
        self.query = query.to_string();
        self.page = 1;
        true
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total_pages: usize) -> bool {
        self.page < total_pages
    }

    pub fn next_page(&mut self, total_pages: usize) -> bool {
        if !self.has_next(total_pages) {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_first_page() {
        let state = ListingState::new();
        assert_eq!(state.page(), 1);
        assert_eq!(state.query(), "");
        assert!(!state.has_prev());
    }

    #[test]
    fn test_new_query_resets_page() {
        let mut state = ListingState::with_page(3, "rust").unwrap();
        assert!(state.set_query("tokio"));
        assert_eq!(state.page(), 1);
        assert_eq!(state.query(), "tokio");
    }

    #[test]
    fn test_same_query_keeps_page() {
        let mut state = ListingState::with_page(3, "rust").unwrap();
        assert!(!state.set_query("  rust "));
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let mut state = ListingState::new();
        assert!(state.next_page(2));
        assert_eq!(state.page(), 2);
        assert!(!state.next_page(2));
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_next_refused_without_results() {
        let mut state = ListingState::new();
        assert!(!state.has_next(0));
        assert!(!state.next_page(0));
    }

    #[test]
    fn test_prev_stops_at_first_page() {
        let mut state = ListingState::with_page(2, "").unwrap();
        assert!(state.prev_page());
        assert!(!state.prev_page());
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_page_zero_is_rejected() {
        assert_eq!(ListingState::with_page(0, ""), Err(Error::ZeroPage));
    }
}
