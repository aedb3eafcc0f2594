//! Normalization from raw storefront records to the canonical catalog.
//!
//! Every function here is total: a missing or malformed field becomes an
//! empty string, an empty list, zero, or a documented default. Nothing in
//! this module returns an error.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use shopsql_core::{
    CanonicalImage, CanonicalProduct, CanonicalVariant, Category, CategoryTree, ProductStatus, Seo,
};

use crate::images::local_image_path;
use crate::types::{RawCollection, RawImage, RawProduct, RawTags, RawVariant};

/// Length of the SEO description, in characters.
pub const SEO_DESCRIPTION_CHARS: usize = 160;

/// Unit assumed when a variant reports a weight without one.
pub const DEFAULT_WEIGHT_UNIT: &str = "kg";

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid html tag regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Vendor used when a product does not name one.
    pub default_vendor: String,
}

/// The Normalizer's output: flattened categories and one canonical product
/// per raw product, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCatalog {
    pub categories: Vec<Category>,
    pub products: Vec<CanonicalProduct>,
}

impl NormalizedCatalog {
    #[must_use]
    pub fn total_variants(&self) -> usize {
        self.products.iter().map(CanonicalProduct::variant_count).sum()
    }

    #[must_use]
    pub fn total_images(&self) -> usize {
        self.products.iter().map(CanonicalProduct::image_count).sum()
    }
}

/// Merges raw products, collection listings and the taxonomy.
#[must_use]
pub fn normalize_catalog(
    products: &[RawProduct],
    collections: &[RawCollection],
    tree: &CategoryTree,
    options: &NormalizeOptions,
) -> NormalizedCatalog {
    let membership = collection_index(collections);

    let products = products
        .iter()
        .map(|raw| {
            let handles = membership.get(&raw.handle).cloned().unwrap_or_default();
            normalize_product(raw, handles, options)
        })
        .collect();

    NormalizedCatalog {
        categories: tree.flatten(),
        products,
    }
}

/// Maps each product handle to the handles of the collections listing it.
///
/// Collections are scanned once, in order. A collection that lists the same
/// product twice is recorded once. Products in no collection are simply
/// absent from the map.
#[must_use]
pub fn collection_index(collections: &[RawCollection]) -> HashMap<String, Vec<String>> {
    let mut index: HashMap<String, Vec<String>> = HashMap::new();

    for collection in collections {
        for product in &collection.products {
            let entry = index.entry(product.handle.clone()).or_default();
            if !entry.contains(&collection.handle) {
                entry.push(collection.handle.clone());
            }
        }
    }

    index
}

/// Builds a [`CanonicalProduct`] from one raw product and its collection
/// membership.
#[must_use]
pub fn normalize_product(
    raw: &RawProduct,
    collection_handles: Vec<String>,
    options: &NormalizeOptions,
) -> CanonicalProduct {
    let description_html = raw.body_html.clone().unwrap_or_default();
    let description_text = clean_html(&description_html);

    let variants = raw.variants.iter().map(normalize_variant).collect();
    let images = raw
        .images
        .iter()
        .enumerate()
        .map(|(index, image)| normalize_image(raw, index, image))
        .collect();

    CanonicalProduct {
        source_id: raw.id.clone(),
        title: raw.title.clone(),
        handle: raw.handle.clone(),
        vendor: raw
            .vendor
            .clone()
            .unwrap_or_else(|| options.default_vendor.clone()),
        product_type: raw.product_type.clone().unwrap_or_default(),
        seo: Seo {
            title: raw.title.clone(),
            description: seo_description(&description_text),
        },
        description_html,
        description_text,
        tags: split_tags(&raw.tags),
        status: ProductStatus::from_published_at(raw.published_at.as_deref()),
        collection_handles,
        variants,
        images,
        published_at: raw.published_at.clone(),
        created_at: raw.created_at.clone(),
        updated_at: raw.updated_at.clone(),
    }
}

fn normalize_variant(raw: &RawVariant) -> CanonicalVariant {
    CanonicalVariant {
        source_id: raw.id.clone(),
        title: raw.title.clone(),
        price: if raw.price.trim().is_empty() {
            "0".to_owned()
        } else {
            raw.price.clone()
        },
        compare_at_price: raw.compare_at_price.clone(),
        sku: raw.sku.clone().unwrap_or_default(),
        barcode: raw.barcode.clone().unwrap_or_default(),
        inventory_quantity: raw.inventory_quantity.unwrap_or(0),
        weight: raw.weight,
        weight_unit: raw
            .weight_unit
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WEIGHT_UNIT.to_owned()),
        requires_shipping: raw.requires_shipping.unwrap_or(true),
        taxable: raw.taxable.unwrap_or(true),
        option1: raw.option1.clone(),
        option2: raw.option2.clone(),
        option3: raw.option3.clone(),
    }
}

fn normalize_image(product: &RawProduct, index: usize, raw: &RawImage) -> CanonicalImage {
    CanonicalImage {
        source_id: raw.id.clone(),
        url: raw.src.clone(),
        width: raw.width,
        height: raw.height,
        alt: raw.alt.clone().unwrap_or_else(|| product.title.clone()),
        position: raw
            .position
            .unwrap_or_else(|| i64::try_from(index + 1).unwrap_or(i64::MAX)),
        local_path: local_image_path(&product.handle, index, &raw.src),
    }
}

/// Strips anything shaped like `<...>`, collapses whitespace runs to one
/// space, and trims. Entities such as `&amp;` are left as they are.
#[must_use]
pub fn clean_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let stripped = TAG_RE.replace_all(html, "");
    WHITESPACE_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_owned()
}

/// A joined tag string is split on commas and each segment trimmed, dropping
/// empty segments. A list is returned unchanged. Case and duplicates are kept.
#[must_use]
pub fn split_tags(tags: &RawTags) -> Vec<String> {
    match tags {
        RawTags::List(list) => list.clone(),
        RawTags::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

/// First [`SEO_DESCRIPTION_CHARS`] characters of `text`. May end mid-word.
#[must_use]
pub fn seo_description(text: &str) -> String {
    text.chars().take(SEO_DESCRIPTION_CHARS).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
