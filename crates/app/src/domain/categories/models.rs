//! Category Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Category UUID
pub type CategoryUuid = TypedUuid<Category>;

/// Category Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub uuid: CategoryUuid,
    pub parent_uuid: Option<CategoryUuid>,
    pub title: String,
    pub image_src: Option<String>,
    pub created_at: Timestamp,
}

/// A category with its nested subcategories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub category: Category,
    pub subcategories: Vec<CategoryNode>,
}

/// New Category Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub parent_uuid: Option<CategoryUuid>,
    pub title: String,
    pub image_src: Option<String>,
}
