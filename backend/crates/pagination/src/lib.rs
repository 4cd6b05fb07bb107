//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept a one-based `page` and a `limit`, rank the full
//! result set, then slice it with [`paginate`]. Out-of-range pages never fail:
//! they produce an empty item list with metadata that still describes the
//! whole result set.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageRequest, paginate};
//!
//! let page = paginate((1..=25).collect::<Vec<_>>(), PageRequest::new(3, 10));
//! assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
//! assert_eq!(page.pagination.total_pages, 3);
//! assert!(!page.pagination.has_next_page);
//! assert!(page.pagination.has_prev_page);
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 24;

/// Upper bound applied to every requested page size.
pub const MAX_LIMIT: u32 = 100;

/// Normalised page request.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_LIMIT)
    }
}

impl PageRequest {
    /// Build a request, clamping `page` to at least one and `limit` into
    /// `[1, MAX_LIMIT]`.
    ///
    /// ```
    /// use pagination::{MAX_LIMIT, PageRequest};
    ///
    /// let request = PageRequest::new(0, 500);
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.limit(), MAX_LIMIT);
    /// ```
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Build a request from untrusted query parameters.
    ///
    /// Missing values fall back to page one and `default_limit`; negative or
    /// oversized values are clamped rather than rejected.
    #[must_use]
    pub fn from_raw(page: Option<i64>, limit: Option<i64>, default_limit: u32) -> Self {
        Self::new(
            page.map_or(1, saturate_u32),
            limit.map_or(default_limit, saturate_u32),
        )
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on one page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page in the full result set.
    #[must_use]
    pub fn offset(&self) -> usize {
        to_usize(self.page.saturating_sub(1)).saturating_mul(to_usize(self.limit))
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based page number that was requested.
    pub page: u32,
    /// Page size applied to the result set.
    pub limit: u32,
    /// Number of items across every page.
    pub total: usize,
    /// Number of non-empty pages.
    pub total_pages: usize,
    /// Whether a later page holds items.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl PageInfo {
    /// Describe `request` against a result set of `total` items.
    #[must_use]
    pub fn new(request: PageRequest, total: usize) -> Self {
        let total_pages = total.div_ceil(to_usize(request.limit()));
        let current = to_usize(request.page());
        Self {
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages,
            has_next_page: current < total_pages,
            has_prev_page: request.page() > 1,
        }
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, in result-set order.
    pub items: Vec<T>,
    /// Metadata describing the full result set.
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// Transform every item while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Slice `items` into the page selected by `request`.
///
/// Relative order is preserved; pages past the end yield no items.
#[must_use]
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let pagination = PageInfo::new(request, items.len());
    let sliced = items
        .into_iter()
        .skip(request.offset())
        .take(to_usize(request.limit()))
        .collect();
    Page {
        items: sliced,
        pagination,
    }
}

fn saturate_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
