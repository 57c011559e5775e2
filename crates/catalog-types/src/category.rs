//! Category records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized name of the category whose assets are text prompts.
const PROMPT_COLLECTION: &str = "aiprompts";

/// A category row from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug used in `/category/{slug}`.
    pub slug: String,
    /// Optional description shown under the category heading.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Position on the home page (ascending).
    #[serde(default)]
    pub display_order: Option<i32>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Creates a category with only the required fields set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            icon: None,
            display_order: None,
            created_at: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the display order.
    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = Some(order);
        self
    }

    /// Returns the description, or an empty string.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Returns true if this category holds copyable text prompts rather
    /// than images. Matching ignores case and whitespace in the name.
    pub fn is_prompt_collection(&self) -> bool {
        let normalized: String = self
            .name
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        normalized == PROMPT_COLLECTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_collection_ignores_case_and_spaces() {
        assert!(Category::new("1", "AI Prompts", "ai-prompts").is_prompt_collection());
        assert!(Category::new("2", "ai  prompts", "x").is_prompt_collection());
        assert!(Category::new("3", "AIPROMPTS", "x").is_prompt_collection());
        assert!(!Category::new("4", "Backgrounds", "backgrounds").is_prompt_collection());
        assert!(!Category::new("5", "AI Prompts 2", "x").is_prompt_collection());
    }

    #[test]
    fn test_deserialize_backend_row() {
        let json = r#"{
            "id": "c1",
            "name": "Backgrounds",
            "slug": "backgrounds",
            "description": null,
            "icon": "image",
            "display_order": 2,
            "created_at": "2024-03-01T10:00:00.123456+00:00"
        }"#;

        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.slug, "backgrounds");
        assert_eq!(category.display_order, Some(2));
        assert_eq!(category.description_or_empty(), "");
        assert!(category.created_at.is_some());
    }
}
