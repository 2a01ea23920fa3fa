//! Splits listings into pages and resolves the links between them.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("page {current_page} is out of range for {total_pages} page(s)")]
    OutOfRange {
        current_page: usize,
        total_pages: usize,
    },
}

/// The position of one page within a paginated listing.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_entries: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page_path: Option<String>,
    pub next_page_path: Option<String>,
}

/// Returns the number of pages needed to show `total_entries`. A listing always
/// has at least one page, even when it is empty.
pub fn total_pages(total_entries: usize, page_size: usize) -> Result<usize, PaginationError> {
    if page_size == 0 {
        return Err(PaginationError::ZeroPageSize);
    }

    Ok(total_entries.div_ceil(page_size).max(1))
}

/// Returns the path of the page at `index` within the listing at `base_path`.
///
/// The first page lives at the listing path itself, and every later page at
/// `<base_path>/<index>`.
pub fn page_path(base_path: &str, index: usize) -> String {
    let base_path = base_path.trim_end_matches('/');

    match index {
        0 if base_path.is_empty() => "/".to_string(),
        0 => base_path.to_string(),
        index => format!("{base_path}/{index}"),
    }
}

impl Pagination {
    /// Resolves the page at `current_page` (zero-based).
    ///
    /// An index past the last page means the listing and the generated routes
    /// disagree about the page count, so it is rejected rather than clamped.
    pub fn resolve(
        base_path: &str,
        total_entries: usize,
        page_size: usize,
        current_page: usize,
    ) -> Result<Self, PaginationError> {
        let total_pages = total_pages(total_entries, page_size)?;
        if current_page >= total_pages {
            return Err(PaginationError::OutOfRange {
                current_page,
                total_pages,
            });
        }

        let has_prev_page = current_page > 0;
        let has_next_page = current_page < total_pages - 1;

        Ok(Self {
            current_page,
            total_pages,
            page_size,
            total_entries,
            has_prev_page,
            has_next_page,
            prev_page_path: has_prev_page.then(|| page_path(base_path, current_page - 1)),
            next_page_path: has_next_page.then(|| page_path(base_path, current_page + 1)),
        })
    }

    /// Returns the number of entries that come before this page.
    pub fn offset(&self) -> usize {
        self.current_page * self.page_size
    }
}

/// A single page of a paginated listing.
#[derive(Debug, PartialEq, Eq)]
pub struct Paginated<'a, T> {
    pub path: String,
    pub pagination: Pagination,
    pub items: &'a [T],
}

/// Splits `items` into pages of `page_size`. An empty listing still gets one
/// (empty) page.
pub fn paginate<'a, T>(
    base_path: &str,
    items: &'a [T],
    page_size: usize,
) -> Result<Vec<Paginated<'a, T>>, PaginationError> {
    let total_pages = total_pages(items.len(), page_size)?;

    (0..total_pages)
        .map(|index| {
            let pagination = Pagination::resolve(base_path, items.len(), page_size, index)?;
            let start = pagination.offset();
            let end = (start + page_size).min(items.len());

            Ok(Paginated {
                path: page_path(base_path, index),
                pagination,
                items: &items[start..end],
            })
        })
        .collect()
}
