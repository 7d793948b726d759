//! Category and sub-category models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::{split_keywords, trimmed_non_empty};

/// Source tag attached to categories created during onboarding.
pub const ONBOARDING_SOURCE: &str = "onboarding";

/// A user category. The name is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Category {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: None,
            keywords: None,
            source: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoriesUpdateRequest<'a> {
    pub categories: &'a [Category],
}

/// Category row echoed back by `POST /api/categories/update`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedCategory {
    #[serde(default)]
    pub category_id: Option<serde_json::Value>,
    pub name: String,
    #[serde(default)]
    pub date_added: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoriesUpdateResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub updated_count: Option<u64>,
    #[serde(default)]
    pub categories: Vec<SavedCategory>,
}

/// Body of `POST /api/subcategories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCategoryRequest {
    pub category_name: String,
    pub sub_cat_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_cat_description: Option<String>,
    /// Postgres array literal, e.g. `{groceries, pharmacy}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_cat_keywords: Option<String>,
}

impl SubCategoryRequest {
    /// Builds a request from raw form input.
    ///
    /// Names and description are trimmed; `keywords` is a comma-separated
    /// list converted to a Postgres array literal.
    pub fn from_input(
        category_name: &str,
        sub_cat_name: &str,
        description: Option<&str>,
        keywords: Option<&str>,
    ) -> Self {
        let keywords = keywords.map(split_keywords).unwrap_or_default();
        let sub_cat_keywords = if keywords.is_empty() {
            None
        } else {
            Some(format!("{{{}}}", keywords.join(", ")))
        };

        Self {
            category_name: category_name.trim().to_string(),
            sub_cat_name: sub_cat_name.trim().to_string(),
            sub_cat_description: trimmed_non_empty(description),
            sub_cat_keywords,
        }
    }
}

/// Working copy of a category while the user assembles their set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub id: Uuid,
    pub name: String,
    pub definition: String,
    /// Comma-separated as typed by the user.
    pub keywords: String,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_details(name, "", "")
    }

    pub fn with_details(
        name: impl Into<String>,
        definition: impl Into<String>,
        keywords: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            definition: definition.into(),
            keywords: keywords.into(),
        }
    }

    /// Same name, definition and keywords dropped.
    #[must_use]
    pub fn stripped(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            definition: String::new(),
            keywords: String::new(),
        }
    }

    pub fn to_category(&self) -> Category {
        let keywords = split_keywords(&self.keywords);
        Category {
            name: self.name.trim().to_string(),
            definition: trimmed_non_empty(Some(&self.definition)),
            keywords: if keywords.is_empty() {
                None
            } else {
                Some(keywords)
            },
            source: Some(ONBOARDING_SOURCE.to_string()),
        }
    }
}
