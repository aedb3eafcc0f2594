//! Typed intermediate documents written between stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopsql_scraper::{RawCollection, RawProduct};

/// `raw/all_products.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProductsFile {
    pub scraped_at: DateTime<Utc>,
    pub source: String,
    pub total_products: usize,
    pub products: Vec<RawProduct>,
}

impl RawProductsFile {
    #[must_use]
    pub fn new(source: impl Into<String>, products: Vec<RawProduct>) -> Self {
        Self {
            scraped_at: Utc::now(),
            source: source.into(),
            total_products: products.len(),
            products,
        }
    }
}

/// `raw/all_collections.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCollectionsFile {
    pub scraped_at: DateTime<Utc>,
    pub source: String,
    pub total_collections: usize,
    pub collections: Vec<RawCollection>,
}

impl RawCollectionsFile {
    #[must_use]
    pub fn new(source: impl Into<String>, collections: Vec<RawCollection>) -> Self {
        Self {
            scraped_at: Utc::now(),
            source: source.into(),
            total_collections: collections.len(),
            collections,
        }
    }
}

/// `images_summary.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesSummary {
    pub downloaded_at: DateTime<Utc>,
    pub total_products: usize,
    pub products_with_images: usize,
    pub total_images_downloaded: usize,
    pub images_directory: String,
}

/// `import_ready/import_summary.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub prepared_at: DateTime<Utc>,
    pub source: String,
    pub total_categories: usize,
    pub total_products: usize,
    pub total_variants: usize,
    pub total_images: usize,
    /// Artifact keys written by the prepare stage.
    pub files: Vec<String>,
}
