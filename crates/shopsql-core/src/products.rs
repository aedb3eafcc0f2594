use serde::{Deserialize, Serialize};

/// Derived publication state. A product is `Active` iff the storefront
/// reported a non-empty publication timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Draft,
}

impl ProductStatus {
    #[must_use]
    pub fn from_published_at(published_at: Option<&str>) -> Self {
        match published_at {
            Some(ts) if !ts.trim().is_empty() => ProductStatus::Active,
            _ => ProductStatus::Draft,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    pub title: String,
    /// First 160 characters of the cleaned description. May end mid-word.
    pub description: String,
}

/// A storefront product in the source-independent form that is loaded into
/// the target database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Storefront numeric product id, stored as a string to avoid precision loss.
    pub source_id: String,
    pub title: String,
    /// Storefront URL slug, e.g. `"elite-carbon-harness"`.
    pub handle: String,
    pub vendor: String,
    pub product_type: String,
    pub description_html: String,
    /// `description_html` with tags removed and whitespace collapsed.
    pub description_text: String,
    /// Tags in source order; not deduplicated.
    pub tags: Vec<String>,
    pub status: ProductStatus,
    /// Slugs of the categories whose collection listing contains this product.
    pub collection_handles: Vec<String>,
    pub variants: Vec<CanonicalVariant>,
    pub images: Vec<CanonicalImage>,
    pub seo: Seo,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl CanonicalProduct {
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// A purchasable variant. `sku` is the catalog-wide conflict key on upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalVariant {
    pub source_id: String,
    pub title: String,
    /// Price as a decimal string in the storefront currency, e.g. `"19.99"`.
    pub price: String,
    pub compare_at_price: Option<String>,
    pub sku: String,
    pub barcode: String,
    pub inventory_quantity: i64,
    pub weight: Option<f64>,
    pub weight_unit: String,
    pub requires_shipping: bool,
    pub taxable: bool,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
}

impl CanonicalVariant {
    /// Non-empty option values in `option1..option3` order, keyed by option name.
    #[must_use]
    pub fn option_values(&self) -> Vec<(&'static str, &str)> {
        [
            ("option1", self.option1.as_deref()),
            ("option2", self.option2.as_deref()),
            ("option3", self.option3.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalImage {
    pub source_id: String,
    pub url: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub alt: String,
    /// 1-based gallery position.
    pub position: i64,
    /// Where the image materializer stores this asset, relative to the output root.
    pub local_path: String,
}
