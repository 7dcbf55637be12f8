use crate::utils::Criteria;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PAGE_BLOCK: i32 = 10;

/// Page navigation for a listing: totals plus a block of up to ten page
/// links around the current page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Pagination {
    pub page: i32,
    pub page_size: i32,
    pub total_items: i64,
    pub total_pages: i32,
    pub start_page: i32,
    pub end_page: i32,
    pub prev: bool,
    pub next: bool,
}

impl Pagination {
    pub fn new(cri: &Criteria, total_items: i64) -> Self {
        let page = cri.page();
        let page_size = cri.per_page_num();
        let total_items = total_items.max(0);

        let total_pages = (total_items + i64::from(page_size) - 1) / i64::from(page_size);

        // page may be anything up to i32::MAX
        let block = i64::from(PAGE_BLOCK);
        let block_end = ((i64::from(page) - 1) / block + 1) * block;
        let start_page = block_end - block + 1;
        let end_page = block_end.min(total_pages).max(start_page);

        Self {
            page,
            page_size,
            total_items,
            total_pages: to_i32(total_pages),
            start_page: to_i32(start_page),
            end_page: to_i32(end_page),
            prev: start_page > 1,
            next: end_page * i64::from(page_size) < total_items,
        }
    }
}

fn to_i32(n: i64) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_block_of_a_long_listing() {
        let p = Pagination::new(&Criteria::new(1, 10), 250);
        assert_eq!(p.total_pages, 25);
        assert_eq!((p.start_page, p.end_page), (1, 10));
        assert!(!p.prev);
        assert!(p.next);
    }

    #[test]
    fn middle_block_has_both_links() {
        let p = Pagination::new(&Criteria::new(14, 10), 250);
        assert_eq!((p.start_page, p.end_page), (11, 20));
        assert!(p.prev);
        assert!(p.next);
    }

    #[test]
    fn last_block_is_cut_at_total_pages() {
        let p = Pagination::new(&Criteria::new(23, 10), 250);
        assert_eq!((p.start_page, p.end_page), (21, 25));
        assert!(p.prev);
        assert!(!p.next);
    }

    #[test]
    fn exact_multiple_has_no_next() {
        let p = Pagination::new(&Criteria::new(10, 10), 100);
        assert_eq!(p.total_pages, 10);
        assert_eq!(p.end_page, 10);
        assert!(!p.next);
    }

    #[test]
    fn empty_listing() {
        let p = Pagination::new(&Criteria::default(), 0);
        assert_eq!(p.total_pages, 0);
        assert_eq!((p.start_page, p.end_page), (1, 1));
        assert!(!p.prev);
        assert!(!p.next);
    }

    #[test]
    fn last_representable_page_does_not_overflow() {
        let p = Pagination::new(&Criteria::new(i32::MAX, 10), 50);
        assert_eq!(p.page, i32::MAX);
        assert_eq!(p.total_pages, 5);
        assert_eq!(p.start_page, 2_147_483_641);
        assert_eq!(p.end_page, 2_147_483_641);
        assert!(p.prev);
        assert!(!p.next);
    }
}
