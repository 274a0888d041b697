use crate::common::{Sort, SortOrder};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::Filter;

/// A request for one page of documents.
///
/// `current` is the zero based page index. The filter and the sort are
/// optional; without a filter every document is paged, without a sort the
/// repository's default order applies.
///
/// ```text
/// let request = Pagination::new(2, 10)
///     .with_filter(field("status").eq("active"))
///     .with_sort(Sort::ascending("name"));
/// ```
#[derive(Debug, Clone)]
pub struct Pagination<F = Filter, O = SortOrder> {
    pub filter: Option<F>,
    pub items_per_page: u64,
    pub current: u64,
    pub sort: Option<Sort<O>>,
}

impl<F, O> Pagination<F, O> {
    pub fn new(current: u64, items_per_page: u64) -> Self {
        Pagination {
            filter: None,
            items_per_page,
            current,
            sort: None,
        }
    }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_sort(mut self, sort: Sort<O>) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// One page of results.
///
/// `count` is the number of pages the whole result spans and `total` the
/// number of matching documents. A page at or past `count` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub current: u64,
    pub count: u64,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current: u64, count: u64, total: u64) -> Self {
        Paginated {
            items,
            current,
            count,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.current.saturating_add(1) < self.count
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0 && self.count > 0
    }

    pub fn map<R>(self, f: impl FnMut(T) -> R) -> Paginated<R> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            current: self.current,
            count: self.count,
            total: self.total,
        }
    }

    /// Converts every item, failing on the first conversion error.
    pub fn try_map<R>(self, f: impl FnMut(T) -> RepoResult<R>) -> RepoResult<Paginated<R>> {
        Ok(Paginated {
            items: self.items.into_iter().map(f).collect::<RepoResult<Vec<R>>>()?,
            current: self.current,
            count: self.count,
            total: self.total,
        })
    }
}

/// The offset window for one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_count: u64,
    pub skip: u64,
    pub limit: u64,
    current: u64,
}

impl PageWindow {
    /// Derives the window for page `current` over `total` documents.
    ///
    /// `skip` saturates at `u64::MAX` for very large page indexes; such a
    /// page lies past the end and is empty.
    pub fn new(total: u64, current: u64, items_per_page: u64) -> RepoResult<PageWindow> {
        if items_per_page == 0 {
            log::error!("Items per page must be greater than zero");
            return Err(RepoError::new(
                "Items per page must be greater than zero",
                ErrorKind::InvalidArgument,
            ));
        }

        Ok(PageWindow {
            page_count: total.div_ceil(items_per_page),
            skip: current.saturating_mul(items_per_page),
            limit: items_per_page,
            current,
        })
    }

    pub fn is_beyond_end(&self) -> bool {
        self.current >= self.page_count
    }
}
