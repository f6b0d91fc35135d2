//! Page-by-page aggregation
//!
//! Both code search and the issue listing are paginated. The rules for
//! knowing when to stop live here so callers only describe how to fetch a
//! single page.

use gh_discover_config::app_config::MAX_PER_PAGE;
use std::collections::HashSet;
use std::future::Future;
use std::hash::Hash;

/// One fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total result count, when the endpoint reports one
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total_count: None,
        }
    }

    pub fn with_total(items: Vec<T>, total_count: u64) -> Self {
        Self {
            items,
            total_count: Some(total_count),
        }
    }

    /// A short page ends the listing, as does reaching the reported total
    pub fn is_last(&self, page: u32, per_page: u8) -> bool {
        if self.items.len() < usize::from(per_page) {
            return true;
        }
        match self.total_count {
            Some(total) => u64::from(page) * u64::from(per_page) >= total,
            None => false,
        }
    }
}

/// Fetch pages starting at 1 until the last one, unioning all items
///
/// A `per_page` of zero falls back to [`MAX_PER_PAGE`].
///
/// The first error stops the walk and is returned as is; items gathered so
/// far are dropped.
pub async fn collect_pages<T, E, F, Fut>(per_page: u8, mut fetch: F) -> Result<HashSet<T>, E>
where
    T: Eq + Hash,
    F: FnMut(u32, u8) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let per_page = if per_page == 0 { MAX_PER_PAGE } else { per_page };
    let mut collected = HashSet::new();
    let mut page = 1u32;

    loop {
        let result = fetch(page, per_page).await?;
        let is_last = result.is_last(page, per_page);
        log::debug!(
            "Fetched page {} with {} items{}",
            page,
            result.items.len(),
            if is_last { " (last)" } else { "" }
        );
        collected.extend(result.items);

        if is_last {
            return Ok(collected);
        }
        page += 1;
    }
}
