//! Catalog statistics written next to the raw product file.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::normalize::split_tags;
use crate::types::RawProduct;

/// Placeholder for a vendor or product type the storefront did not report.
pub const UNKNOWN: &str = "Unknown";

/// Contents of `analysis.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAnalysis {
    pub total_products: usize,
    pub total_variants: usize,
    pub total_images: usize,
    /// Unique tags, sorted. Joined tag strings are split first.
    pub tags: Vec<String>,
    pub vendors: Vec<String>,
    pub product_types: Vec<String>,
}

impl CatalogAnalysis {
    #[must_use]
    pub fn from_products(products: &[RawProduct]) -> Self {
        let mut tags = BTreeSet::new();
        let mut vendors = BTreeSet::new();
        let mut product_types = BTreeSet::new();
        let mut total_variants = 0;
        let mut total_images = 0;

        for product in products {
            tags.extend(split_tags(&product.tags));
            vendors.insert(product.vendor.clone().unwrap_or_else(|| UNKNOWN.to_owned()));
            product_types.insert(
                product
                    .product_type
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_owned()),
            );
            total_variants += product.variants.len();
            total_images += product.images.len();
        }

        Self {
            total_products: products.len(),
            total_variants,
            total_images,
            tags: tags.into_iter().collect(),
            vendors: vendors.into_iter().collect(),
            product_types: product_types.into_iter().collect(),
        }
    }
}

/// Plain-text listing of every fetched product, one `title (ID: id)` per line.
#[must_use]
pub fn summary_text(source: &str, scraped_at: &str, products: &[RawProduct]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Product scrape summary for {source}");
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "Scraped at: {scraped_at}");
    let _ = writeln!(out, "Total products: {}", products.len());
    let _ = writeln!(out);
    let _ = writeln!(out, "Products:");
    for product in products {
        let _ = writeln!(out, "  - {} (ID: {})", product.title, product.id);
    }
    out
}
