//! Page-number based pagination.

use crate::error::{DomainError, DomainResult};

/// Fixed page size of every paginated listing.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const INVALID_PAGE_NUMBER: &str = "Invalid page number. Page number must be greater than 0.";
pub const PAGE_OUT_OF_RANGE: &str = "Page number exceeds the total number of available pages.";

/// Skip/take window derived from a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Window for `page_number` (1-based). Rejects page numbers below 1.
    pub fn for_page(page_number: i32, page_size: u32) -> DomainResult<Self> {
        if page_number < 1 {
            return Err(DomainError::validation(INVALID_PAGE_NUMBER));
        }
        let limit = u64::from(page_size);
        Ok(Self {
            offset: (page_number as u64 - 1) * limit,
            limit,
        })
    }

    /// A window must start inside the matching set. An empty result set has
    /// no valid page at all.
    pub fn ensure_within(&self, total_matches: u64) -> DomainResult<()> {
        if self.offset >= total_matches {
            return Err(DomainError::validation(PAGE_OUT_OF_RANGE));
        }
        Ok(())
    }

    /// Apply the window to an already ordered sequence.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

/// One page of results plus the size of the unpaginated match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub page_number: i32,
    pub total_matches: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page_number: self.page_number,
            total_matches: self.total_matches,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        let w = PageWindow::for_page(1, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(w, PageWindow { offset: 0, limit: 10 });
    }

    #[test]
    fn page_below_one_is_invalid() {
        for n in [0, -1, i32::MIN] {
            let err = PageWindow::for_page(n, DEFAULT_PAGE_SIZE).unwrap_err();
            assert_eq!(err, DomainError::validation(INVALID_PAGE_NUMBER));
        }
    }

    #[test]
    fn page_100_needs_at_least_991_matches() {
        let w = PageWindow::for_page(100, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(
            w.ensure_within(990).unwrap_err(),
            DomainError::validation(PAGE_OUT_OF_RANGE)
        );
        assert!(w.ensure_within(991).is_ok());
    }

    #[test]
    fn empty_result_has_no_valid_page() {
        let w = PageWindow::for_page(1, DEFAULT_PAGE_SIZE).unwrap();
        assert!(w.ensure_within(0).is_err());
    }

    #[test]
    fn largest_page_number_does_not_overflow() {
        let w = PageWindow::for_page(i32::MAX, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(w.offset, (i32::MAX as u64 - 1) * 10);
    }

    #[test]
    fn slice_returns_the_tail_of_the_last_page() {
        let w = PageWindow::for_page(3, DEFAULT_PAGE_SIZE).unwrap();
        let items = w.slice(1..=25);
        assert_eq!(items, (21..=25).collect::<Vec<_>>());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: an accepted page is non-empty and never exceeds the page size.
            #[test]
            fn accepted_pages_are_bounded(page in 1i32..200, total in 0u64..2_000) {
                let w = PageWindow::for_page(page, DEFAULT_PAGE_SIZE).unwrap();
                match w.ensure_within(total) {
                    Ok(()) => {
                        prop_assert!(w.offset < total);
                        let items = w.slice(0..total);
                        prop_assert!(!items.is_empty());
                        prop_assert!(items.len() <= DEFAULT_PAGE_SIZE as usize);
                    }
                    Err(e) => {
                        prop_assert_eq!(e, DomainError::validation(PAGE_OUT_OF_RANGE));
                        prop_assert!(w.offset >= total);
                    }
                }
            }
        }
    }
}
