//! Listing queries and pagination arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::Asset;

/// Ordering applied to asset listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first, by creation time.
    #[default]
    Latest,
    /// Most downloaded first.
    Trending,
}

impl SortOrder {
    /// Parses a sort order; anything unrecognized falls back to [`SortOrder::Latest`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "trending" => SortOrder::Trending,
            _ => SortOrder::Latest,
        }
    }

    /// Query-string value of this order.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Latest => "latest",
            SortOrder::Trending => "trending",
        }
    }

    /// Backend column the order sorts on (always descending).
    pub fn column(&self) -> &'static str {
        match self {
            SortOrder::Latest => "created_at",
            SortOrder::Trending => "downloads_count",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which assets a listing selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetFilter {
    /// Assets belonging to a category.
    InCategory(String),
    /// Assets whose title or description contains the lower-cased text.
    Matching(String),
    /// Assets sharing a category with another asset, excluding that asset.
    RelatedTo {
        /// Category of the reference asset, if it has one.
        category_id: Option<String>,
        /// Identifier of the reference asset.
        exclude: String,
    },
}

impl AssetFilter {
    /// Filter for assets in `category_id`.
    pub fn in_category(category_id: impl Into<String>) -> Self {
        AssetFilter::InCategory(category_id.into())
    }

    /// Filter for a free-text search. The text is lower-cased.
    pub fn matching(text: &str) -> Self {
        AssetFilter::Matching(text.to_lowercase())
    }

    /// Filter for assets related to `asset`.
    pub fn related_to(asset: &Asset) -> Self {
        AssetFilter::RelatedTo {
            category_id: asset.category_id.clone(),
            exclude: asset.id.clone(),
        }
    }

    /// Case-insensitive `LIKE` pattern for text filters.
    pub fn search_pattern(&self) -> Option<String> {
        match self {
            AssetFilter::Matching(text) => Some(format!("%{text}%")),
            _ => None,
        }
    }

    /// Returns true if no asset can ever match (a related filter for an
    /// uncategorized asset).
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(
            self,
            AssetFilter::RelatedTo {
                category_id: None,
                ..
            }
        )
    }

    /// Evaluates the filter against a single asset.
    pub fn accepts(&self, asset: &Asset) -> bool {
        match self {
            AssetFilter::InCategory(id) => asset.category_id.as_deref() == Some(id.as_str()),
            AssetFilter::Matching(text) => asset.matches_text(text),
            AssetFilter::RelatedTo {
                category_id,
                exclude,
            } => {
                category_id.is_some()
                    && asset.category_id == *category_id
                    && asset.id != *exclude
            }
        }
    }
}

/// A filtered, ordered, sliced asset listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetQuery {
    /// Selection.
    pub filter: AssetFilter,
    /// Ordering.
    pub order: SortOrder,
    /// Number of rows to skip.
    pub offset: u64,
    /// Maximum number of rows to return.
    pub limit: u32,
}

impl AssetQuery {
    /// Creates a query for the first [`crate::PAGE_SIZE`] rows, newest first.
    pub fn new(filter: AssetFilter) -> Self {
        Self {
            filter,
            order: SortOrder::Latest,
            offset: 0,
            limit: crate::PAGE_SIZE,
        }
    }

    /// Sets the ordering.
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Restricts the result to at most `limit` rows from the start.
    pub fn limit(mut self, limit: u32) -> Self {
        self.offset = 0;
        self.limit = limit;
        self
    }

    /// Selects the rows of one page.
    pub fn page(mut self, pagination: &Pagination) -> Self {
        self.offset = pagination.offset();
        self.limit = pagination.per_page();
        self
    }
}

/// Position within a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
    total: u64,
}

impl Pagination {
    /// Creates a pagination state. `page` is 1-based and clamped to at
    /// least 1; `per_page` is clamped to at least 1.
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            total,
        }
    }

    /// Current page, 1-based.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Total number of items across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages, zero for an empty listing.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Number of items before the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Inclusive row range of the current page.
    pub fn row_range(&self) -> (u64, u64) {
        let start = self.offset();
        (start, start + u64::from(self.per_page) - 1)
    }

    /// Returns true if a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Returns true if a next page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Returns true if the listing spans more than one page.
    pub fn is_needed(&self) -> bool {
        self.total_pages() > 1
    }

    /// Page numbers within `radius` of the current page, clamped to the
    /// existing pages.
    pub fn window(&self, radius: u32) -> RangeInclusive<u32> {
        let last = self.total_pages();
        let start = self.page.saturating_sub(radius).max(1);
        let end = self.page.saturating_add(radius).min(last);
        start..=end
    }
}
