//! Category and subcategory entities.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::constants::{DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON};
use crate::entity::{Draft, DraftMode, Entity};
use crate::serde_helpers::null_as_default;
use crate::validation::{hex_color, known_icon, not_blank, FieldErrors};

/// Subcategory, owned by exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
}

/// Category entity as returned by `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Key into the front-end icon registry
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default)]
    pub is_trending: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subcategories: Vec<Subcategory>,
    /// Number of places, computed by the backend for display
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
}

impl Entity for Category {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.id
    }
}

impl Category {
    /// Find a subcategory of this category by id.
    pub fn subcategory(&self, id: i64) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }
}

/// Subcategory row inside a category form. `id` is `None` until saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

/// Category create/edit payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[validate(custom(function = "not_blank", message = "Category name is required"))]
    pub name: String,
    pub description: String,
    #[validate(custom(function = "known_icon"))]
    pub icon: String,
    #[validate(custom(function = "hex_color"))]
    pub color: String,
    pub image: String,
    pub is_trending: bool,
    #[validate(custom(function = "subcategory_names"))]
    pub subcategories: Vec<SubcategoryDraft>,
}

fn subcategory_names(rows: &[SubcategoryDraft]) -> Result<(), ValidationError> {
    if rows.iter().any(|s| s.name.trim().is_empty()) {
        let mut e = ValidationError::new("required");
        e.message = Some("Subcategory names cannot be empty".into());
        return Err(e);
    }
    Ok(())
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            icon: DEFAULT_CATEGORY_ICON.to_string(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            image: String::new(),
            is_trending: false,
            subcategories: Vec::new(),
        }
    }
}

impl CategoryDraft {
    /// Append a new, unsaved subcategory row.
    pub fn add_subcategory(&mut self, name: impl Into<String>) {
        self.subcategories.push(SubcategoryDraft {
            id: None,
            name: name.into(),
        });
    }

    /// Remove the subcategory row at `index`; out of range is ignored.
    pub fn remove_subcategory(&mut self, index: usize) -> Option<SubcategoryDraft> {
        if index < self.subcategories.len() {
            Some(self.subcategories.remove(index))
        } else {
            None
        }
    }
}

impl Draft<Category> for CategoryDraft {
    fn from_entity(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            icon: category.icon.clone(),
            color: category.color.clone(),
            image: category.image.clone(),
            is_trending: category.is_trending,
            subcategories: category
                .subcategories
                .iter()
                .map(|s| SubcategoryDraft {
                    id: Some(s.id),
                    name: s.name.clone(),
                })
                .collect(),
        }
    }

    fn check(&self, _mode: DraftMode) -> Result<(), FieldErrors> {
        FieldErrors::from_validation(self.validate()).into_result()
    }
}
