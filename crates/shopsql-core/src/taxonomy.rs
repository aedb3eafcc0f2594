//! The hand-maintained two-level category taxonomy.
//!
//! The taxonomy is independent of live storefront data. It is loaded from
//! `config/taxonomy.yaml` and written out as `category_tree.json`, a nested
//! object keyed by root display name whose key order is the taxonomy order.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub name: String,
    pub handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootCategory {
    pub name: String,
    pub handle: String,
    #[serde(default)]
    pub subcategories: Vec<SubCategory>,
}

/// Ordered list of root categories, each with its ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
    pub roots: Vec<RootCategory>,
}

/// Shape of one root entry inside `category_tree.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub handle: String,
    #[serde(default)]
    pub subcategories: Vec<SubCategory>,
}

impl CategoryTree {
    /// Every category handle in flattening order: each root followed by its
    /// children. This is the fixed set of collections fetched from the store.
    #[must_use]
    pub fn handles(&self) -> Vec<&str> {
        self.roots
            .iter()
            .flat_map(|root| {
                std::iter::once(root.handle.as_str())
                    .chain(root.subcategories.iter().map(|s| s.handle.as_str()))
            })
            .collect()
    }

    /// Flattens the tree into [`Category`] rows.
    ///
    /// Ids are assigned 1, 2, 3, ... in emission order (root, then its
    /// children). A root's `sort_order` is its emission id; a child's
    /// `sort_order` is its 1-based position under its parent.
    #[must_use]
    pub fn flatten(&self) -> Vec<Category> {
        let mut categories = Vec::new();
        let mut next_id: u32 = 1;

        for root in &self.roots {
            let root_id = next_id;
            categories.push(Category {
                id: root_id,
                name: root.name.clone(),
                slug: root.handle.clone(),
                parent_id: None,
                level: 1,
                sort_order: root_id,
            });
            next_id += 1;

            for (position, sub) in (1u32..).zip(&root.subcategories) {
                categories.push(Category {
                    id: next_id,
                    name: sub.name.clone(),
                    slug: sub.handle.clone(),
                    parent_id: Some(root_id),
                    level: 2,
                    sort_order: position,
                });
                next_id += 1;
            }
        }

        categories
    }

    /// The `category_tree.json` representation, keyed by root display name.
    #[must_use]
    pub fn to_nested(&self) -> IndexMap<String, TreeNode> {
        self.roots
            .iter()
            .map(|root| {
                (
                    root.name.clone(),
                    TreeNode {
                        handle: root.handle.clone(),
                        subcategories: root.subcategories.clone(),
                    },
                )
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    categories: Vec<RootCategory>,
}

/// Load and validate the taxonomy from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_taxonomy(path: &Path) -> Result<CategoryTree, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TaxonomyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_taxonomy(&content)
}

/// Parse and validate taxonomy YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_taxonomy(content: &str) -> Result<CategoryTree, ConfigError> {
    let file: TaxonomyFile =
        serde_yaml::from_str(content).map_err(ConfigError::TaxonomyFileParse)?;
    let tree = CategoryTree {
        roots: file.categories,
    };
    validate_taxonomy(&tree)?;
    Ok(tree)
}

fn validate_taxonomy(tree: &CategoryTree) -> Result<(), ConfigError> {
    let mut seen_handles = HashSet::new();

    let entries = tree.roots.iter().flat_map(|root| {
        std::iter::once((root.name.as_str(), root.handle.as_str())).chain(
            root.subcategories
                .iter()
                .map(|s| (s.name.as_str(), s.handle.as_str())),
        )
    });

    for (name, handle) in entries {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category with handle '{handle}' has an empty name"
            )));
        }
        if handle.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{name}' has an empty handle"
            )));
        }
        if !seen_handles.insert(handle) {
            return Err(ConfigError::Validation(format!(
                "duplicate category handle: '{handle}' (from category '{name}')"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "taxonomy_test.rs"]
mod tests;
