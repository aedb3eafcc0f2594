//! Artifact keys, relative to the output root.

pub const RAW_PRODUCTS: &str = "raw/all_products.json";
pub const RAW_COLLECTIONS: &str = "raw/all_collections.json";
pub const ANALYSIS: &str = "analysis.json";
pub const SUMMARY: &str = "summary.txt";
pub const CATEGORY_TREE: &str = "category_tree.json";
pub const IMAGES_SUMMARY: &str = "images_summary.json";
pub const IMPORT_CATEGORIES: &str = "import_ready/categories.json";
pub const IMPORT_PRODUCTS: &str = "import_ready/products.json";
pub const IMPORT_SUMMARY: &str = "import_ready/import_summary.json";
pub const SQL_DIR: &str = "sql";

/// `raw/collections/{handle}.json`
#[must_use]
pub fn raw_collection(handle: &str) -> String {
    format!("raw/collections/{handle}.json")
}

/// `sql/{file_name}`
#[must_use]
pub fn sql_file(file_name: &str) -> String {
    format!("{SQL_DIR}/{file_name}")
}
