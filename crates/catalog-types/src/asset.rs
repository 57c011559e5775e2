//! Asset and download records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An asset row from the remote store.
///
/// Every column except the identifier and title is nullable on the
/// backend, so the accessors below apply the defaults the pages expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Free-text description (also the prompt text in prompt collections).
    #[serde(default)]
    pub description: Option<String>,
    /// Owning category.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Location of the downloadable file.
    #[serde(default)]
    pub file_url: String,
    /// Location of the preview image.
    #[serde(default)]
    pub thumbnail_url: String,
    /// MIME type or extension of the file.
    #[serde(default)]
    pub file_type: Option<String>,
    /// File size in bytes.
    #[serde(default)]
    pub file_size: Option<u64>,
    /// Width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Number of recorded downloads.
    #[serde(default)]
    pub downloads_count: Option<u64>,
    /// Number of recorded detail views.
    #[serde(default)]
    pub views_count: Option<u64>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Whether the asset is featured.
    #[serde(default)]
    pub is_featured: Option<bool>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Asset {
    /// Creates an asset with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        file_url: impl Into<String>,
        thumbnail_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            category_id: None,
            file_url: file_url.into(),
            thumbnail_url: thumbnail_url.into(),
            file_type: None,
            file_size: None,
            width: None,
            height: None,
            downloads_count: None,
            views_count: None,
            tags: None,
            is_featured: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sets the owning category.
    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the creation timestamp.
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Download count, zero when unknown.
    pub fn downloads(&self) -> u64 {
        self.downloads_count.unwrap_or(0)
    }

    /// View count, zero when unknown.
    pub fn views(&self) -> u64 {
        self.views_count.unwrap_or(0)
    }

    /// Width and height, only when both are known and non-zero.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Tags, empty when unknown.
    pub fn tag_list(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Text copied to the clipboard for prompt assets.
    pub fn prompt_text(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => &self.title,
        }
    }

    /// Returns true if the title or description contains `needle`
    /// ignoring case. `needle` must already be lower-case.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// A download row from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Download {
    /// Unique identifier.
    pub id: String,
    /// Downloaded asset.
    #[serde(default)]
    pub asset_id: Option<String>,
    /// Time of the download.
    #[serde(default)]
    pub downloaded_at: Option<DateTime<Utc>>,
    /// Client address, always [`crate::UNKNOWN_IP`] from this front-end.
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Insert form of a [`Download`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDownload {
    /// Downloaded asset.
    pub asset_id: String,
    /// Client address.
    pub ip_address: String,
}

impl NewDownload {
    /// Creates a download record for `asset_id` with an unknown address.
    pub fn for_asset(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            ip_address: crate::UNKNOWN_IP.to_string(),
        }
    }
}
