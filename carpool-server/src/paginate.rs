//! In-memory pagination.

use serde::Serialize;

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Size of the full result set before slicing.
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// An empty page echoing the requested position.
    pub fn empty(page: u32, limit: u32) -> Self {
        Self {
            total: 0,
            page,
            limit,
            data: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            page: self.page,
            limit: self.limit,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

/// Slice `items` into page `page` (1-indexed) of size `limit`.
///
/// Returns elements `[(page-1)*limit, (page-1)*limit + limit)`. Page 0 is
/// treated as page 1; pages past the end are empty.
///
/// # Examples
///
/// ```
/// use carpool_server::paginate::paginate;
///
/// let page = paginate((0..12).collect(), 2, 5);
/// assert_eq!(page.total, 12);
/// assert_eq!(page.data, vec![5, 6, 7, 8, 9]);
/// ```
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let total = items.len();
    let start = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);

    let data = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();

    Page {
        total,
        page,
        limit,
        data,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn page_length_and_total(n in 0usize..200, page in 1u32..30, limit in 1u32..30) {
            let items: Vec<usize> = (0..n).collect();
            let result = paginate(items, page, limit);

            let skipped = (page as usize - 1) * limit as usize;
            let expected_len = (limit as usize).min(n.saturating_sub(skipped));

            prop_assert_eq!(result.total, n);
            prop_assert_eq!(result.data.len(), expected_len);
            if let Some(first) = result.data.first() {
                prop_assert_eq!(*first, skipped);
            }
        }
    }
}
