use serde::{Deserialize, Serialize};

/// One row of the flattened two-level category list.
///
/// Level-1 categories have no parent; level-2 categories reference the `id`
/// of a level-1 category emitted earlier in the same list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<u32>,
    pub level: u8,
    pub sort_order: u32,
}

/// Returns the slug of the category whose `id` is `parent_id`, if present.
#[must_use]
pub fn parent_slug(categories: &[Category], parent_id: u32) -> Option<&str> {
    categories
        .iter()
        .find(|c| c.id == parent_id)
        .map(|c| c.slug.as_str())
}
