//! Height windows for paging backwards from the chain tip

use crate::error::{ExplorerError, Result};
use tracing::debug;

/// Rows shown per page.
pub const DISPLAY_PER_PAGE: usize = 10;

/// Heights to request for one page, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub heights: Vec<u64>,
    pub is_last_page: bool,
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

/// Compute the window for a 1-indexed `page`.
///
/// Page `n` covers `current_height - (n-1)*page_size` downwards, stopping at
/// genesis. A window shorter than `page_size` (or empty) reached genesis and
/// is the last page.
pub fn page_window(current_height: u64, page: u64, page_size: usize) -> Result<PageWindow> {
    if page == 0 {
        return Err(ExplorerError::InvalidPage(
            "page numbers start at 1".to_string(),
        ));
    }
    if page_size == 0 {
        return Err(ExplorerError::InvalidPage(
            "page size must be positive".to_string(),
        ));
    }

    let size = page_size as u64;
    let top = (page - 1)
        .checked_mul(size)
        .and_then(|offset| current_height.checked_sub(offset));

    let heights: Vec<u64> = match top {
        Some(top) => (0..size).map_while(|i| top.checked_sub(i)).collect(),
        None => Vec::new(),
    };
    let is_last_page = heights.len() < page_size;

    debug!(
        current_height,
        page,
        count = heights.len(),
        is_last_page,
        "computed page window"
    );

    Ok(PageWindow {
        page,
        heights,
        is_last_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_near_genesis() {
        let window = page_window(5, 1, 10).unwrap();
        assert_eq!(window.heights, vec![5, 4, 3, 2, 1, 0]);
        assert!(window.is_last_page);
    }

    #[test]
    fn test_full_first_page() {
        let window = page_window(25, 1, 10).unwrap();
        assert_eq!(window.heights, (16..=25).rev().collect::<Vec<_>>());
        assert!(!window.is_last_page);
    }

    #[test]
    fn test_page_clipped_at_genesis() {
        let window = page_window(25, 3, 10).unwrap();
        assert_eq!(window.heights, vec![5, 4, 3, 2, 1, 0]);
        assert!(window.is_last_page);
    }

    #[test]
    fn test_page_past_genesis_is_empty() {
        let window = page_window(3, 5, 10).unwrap();
        assert!(window.is_empty());
        assert!(window.is_last_page);
    }

    #[test]
    fn test_genesis_only_chain() {
        let window = page_window(0, 1, DISPLAY_PER_PAGE).unwrap();
        assert_eq!(window.heights, vec![0]);
        assert!(window.is_last_page);
    }

    #[test]
    fn test_exact_multiple_is_not_last() {
        // 20 blocks (0..=19): page 2 is full, page 3 is empty
        let second = page_window(19, 2, 10).unwrap();
        assert_eq!(second.heights, (0..=9).rev().collect::<Vec<_>>());
        assert!(!second.is_last_page);

        let third = page_window(19, 3, 10).unwrap();
        assert!(third.is_empty());
        assert!(third.is_last_page);
    }

    #[test]
    fn test_first_page_shape_for_many_heights() {
        for height in 0..200u64 {
            let window = page_window(height, 1, DISPLAY_PER_PAGE).unwrap();
            let expected: Vec<u64> = (height.saturating_sub(9)..=height).rev().collect();
            assert_eq!(window.heights, expected, "height {}", height);
            assert!(window.heights.len() <= DISPLAY_PER_PAGE);
            assert!(window.heights.windows(2).all(|w| w[0] > w[1]));
        }
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let window = page_window(u64::MAX, u64::MAX, DISPLAY_PER_PAGE).unwrap();
        assert!(window.is_empty());

        let window = page_window(u64::MAX, 1, 3).unwrap();
        assert_eq!(window.heights, vec![u64::MAX, u64::MAX - 1, u64::MAX - 2]);
    }

    #[test]
    fn test_zero_page_or_size_rejected() {
        assert!(matches!(
            page_window(10, 0, 10),
            Err(ExplorerError::InvalidPage(_))
        ));
        assert!(matches!(
            page_window(10, 1, 0),
            Err(ExplorerError::InvalidPage(_))
        ));
    }
}
