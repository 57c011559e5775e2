//! Common types used throughout the asset catalog.
//!
//! The records in this crate mirror the tables of the remote backend and
//! are consumed verbatim. The listing types carry the small amount of
//! arithmetic the pages need (pagination windows, sort orders, search
//! patterns).

mod asset;
mod category;
mod format;
mod listing;

pub use asset::{Asset, Download, NewDownload};
pub use category::Category;
pub use format::{format_date, format_file_size};
pub use listing::{AssetFilter, AssetQuery, Pagination, SortOrder};

/// Number of assets per page on category and search listings.
pub const PAGE_SIZE: u32 = 20;

/// Number of latest assets shown per category section on the home page.
pub const HOME_SECTION_SIZE: u32 = 10;

/// Maximum number of related assets shown on a detail page.
pub const RELATED_LIMIT: u32 = 5;

/// IP address recorded with every download; the front-end never sees the real one.
pub const UNKNOWN_IP: &str = "unknown";
