use serde_json::json;
use shopsql_core::{RootCategory, SubCategory};

use super::*;

fn options() -> NormalizeOptions {
    NormalizeOptions {
        default_vendor: "Ride Engine".to_owned(),
    }
}

fn raw_product(value: serde_json::Value) -> RawProduct {
    serde_json::from_value(value).expect("fixture must deserialize")
}

fn collection(handle: &str, product_handles: &[&str]) -> RawCollection {
    let products = product_handles
        .iter()
        .map(|h| RawProduct {
            handle: (*h).to_owned(),
            ..RawProduct::default()
        })
        .collect();
    RawCollection::new(handle, format!("https://rideengine.com/collections/{handle}"), products)
}

fn published_product() -> RawProduct {
    raw_product(json!({
        "id": 7_012_345_678_901_i64,
        "title": "Elite Carbon Harness",
        "handle": "elite-carbon-harness",
        "vendor": "Ride Engine",
        "product_type": "Harness",
        "body_html": "<p>Stiff <b>carbon</b> shell.</p>\n<p>Hyperlock ready.</p>",
        "tags": ["kite", "harness"],
        "published_at": "2024-03-01T10:00:00-05:00",
        "variants": [
            {"id": 1, "title": "S", "price": "549.00", "sku": "RE-ECH-S", "option1": "S"},
            {"id": 2, "title": "M", "price": "549.00", "sku": "RE-ECH-M", "option1": "M",
             "compare_at_price": "599.00", "weight": 1.4, "weight_unit": "kg"}
        ],
        "images": [
            {"id": 11, "src": "https://cdn.shopify.com/s/files/1/elite.jpg?v=17", "width": 2000,
             "height": 2000, "alt": null, "position": 1}
        ]
    }))
}

fn draft_product() -> RawProduct {
    raw_product(json!({
        "id": 7_012_345_678_902_i64,
        "title": "Spare Pin",
        "handle": "spare-pin",
        "published_at": null,
        "variants": [],
        "images": []
    }))
}

// -----------------------------------------------------------------------
// clean_html / split_tags / seo_description
// -----------------------------------------------------------------------

#[test]
fn clean_html_strips_tags() {
    assert_eq!(clean_html("<p>Hello <b>world</b></p>"), "Hello world");
}

#[test]
fn clean_html_collapses_whitespace() {
    assert_eq!(clean_html("Hello   world\n"), "Hello world");
}

#[test]
fn clean_html_keeps_entities() {
    assert_eq!(clean_html("<p>Bits &amp; pieces</p>"), "Bits &amp; pieces");
}

#[test]
fn clean_html_empty() {
    assert_eq!(clean_html(""), "");
}

#[test]
fn split_tags_joined_string() {
    let tags = RawTags::Joined("a, b ,c".to_owned());
    assert_eq!(split_tags(&tags), vec!["a", "b", "c"]);
}

#[test]
fn split_tags_drops_empty_segments() {
    assert_eq!(split_tags(&RawTags::Joined("a,, ,b,".to_owned())), vec!["a", "b"]);
    assert!(split_tags(&RawTags::Joined("   ".to_owned())).is_empty());
}

#[test]
fn split_tags_list_unchanged() {
    let tags = RawTags::List(vec!["a".to_owned(), "a".to_owned()]);
    assert_eq!(split_tags(&tags), vec!["a", "a"]);
}

#[test]
fn seo_description_cuts_at_160_chars() {
    let text = "x".repeat(200);
    assert_eq!(seo_description(&text).chars().count(), 160);
    assert_eq!(seo_description("short"), "short");
}

#[test]
fn seo_description_counts_characters_not_bytes() {
    let text = "é".repeat(170);
    let seo = seo_description(&text);
    assert_eq!(seo.chars().count(), 160);
    assert_eq!(seo.len(), 320);
}

// -----------------------------------------------------------------------
// collection_index
// -----------------------------------------------------------------------

#[test]
fn collection_index_records_every_listing() {
    let collections = vec![
        collection("harnesses", &["elite-carbon-harness", "saber-harness"]),
        collection("hyperlock-system", &["elite-carbon-harness"]),
    ];
    let index = collection_index(&collections);
    assert_eq!(
        index["elite-carbon-harness"],
        vec!["harnesses", "hyperlock-system"]
    );
    assert_eq!(index["saber-harness"], vec!["harnesses"]);
    assert!(!index.contains_key("spare-pin"));
}

#[test]
fn collection_index_ignores_repeat_listing_in_same_collection() {
    let collections = vec![collection("bags", &["day-bag", "day-bag"])];
    assert_eq!(collection_index(&collections)["day-bag"], vec!["bags"]);
}

// -----------------------------------------------------------------------
// normalize_product
// -----------------------------------------------------------------------

#[test]
fn status_follows_publication_timestamp() {
    let active = normalize_product(&published_product(), vec![], &options());
    let draft = normalize_product(&draft_product(), vec![], &options());
    assert_eq!(active.status, ProductStatus::Active);
    assert_eq!(draft.status, ProductStatus::Draft);
}

#[test]
fn text_fields_are_cleaned_and_seo_filled() {
    let product = normalize_product(&published_product(), vec![], &options());
    assert_eq!(product.source_id, "7012345678901");
    assert_eq!(
        product.description_text,
        "Stiff carbon shell. Hyperlock ready."
    );
    assert_eq!(product.seo.title, "Elite Carbon Harness");
    assert_eq!(product.seo.description, product.description_text);
    assert_eq!(product.tags, vec!["kite", "harness"]);
}

#[test]
fn variant_defaults_apply_only_when_absent() {
    let product = normalize_product(&published_product(), vec![], &options());
    let small = &product.variants[0];
    assert_eq!(small.weight_unit, DEFAULT_WEIGHT_UNIT);
    assert!(small.requires_shipping);
    assert!(small.taxable);
    assert_eq!(small.barcode, "");
    assert_eq!(small.inventory_quantity, 0);
    assert_eq!(small.compare_at_price, None);

    let medium = &product.variants[1];
    assert_eq!(medium.compare_at_price.as_deref(), Some("599.00"));
    assert_eq!(medium.weight, Some(1.4));
}

#[test]
fn image_fields_fall_back_to_title_and_index() {
    let mut raw = published_product();
    raw.images[0].position = None;
    let product = normalize_product(&raw, vec![], &options());
    let image = &product.images[0];
    assert_eq!(image.alt, "Elite Carbon Harness");
    assert_eq!(image.position, 1);
    assert_eq!(image.local_path, "images/elite-carbon-harness/00_elite.jpg");
}

#[test]
fn missing_fields_become_defaults() {
    let raw = raw_product(json!({"title": 42, "variants": [{"price": null}, "junk"]}));
    let product = normalize_product(&raw, vec![], &options());
    assert_eq!(product.title, "42");
    assert_eq!(product.handle, "");
    assert_eq!(product.vendor, "Ride Engine");
    assert_eq!(product.product_type, "");
    assert_eq!(product.description_text, "");
    assert!(product.tags.is_empty());
    assert_eq!(product.status, ProductStatus::Draft);
    assert_eq!(product.variants.len(), 1);
    assert_eq!(product.variants[0].price, "0");
    assert_eq!(product.variants[0].sku, "");
}

#[test]
fn comma_joined_tags_from_source_are_split() {
    let raw = raw_product(json!({"handle": "x", "tags": "Wing, Foil ,Harness"}));
    let product = normalize_product(&raw, vec![], &options());
    assert_eq!(product.tags, vec!["Wing", "Foil", "Harness"]);
}

// -----------------------------------------------------------------------
// normalize_catalog
// -----------------------------------------------------------------------

#[test]
fn normalize_catalog_two_product_scenario() {
    let tree = CategoryTree {
        roots: vec![RootCategory {
            name: "Harnesses".to_owned(),
            handle: "harnesses".to_owned(),
            subcategories: vec![SubCategory {
                name: "Hyperlock System".to_owned(),
                handle: "hyperlock-system".to_owned(),
            }],
        }],
    };
    let collections = vec![collection("harnesses", &["elite-carbon-harness"])];

    let catalog = normalize_catalog(
        &[published_product(), draft_product()],
        &collections,
        &tree,
        &options(),
    );

    assert_eq!(catalog.categories.len(), 2);
    assert_eq!(catalog.products.len(), 2);

    let first = &catalog.products[0];
    assert_eq!(first.status, ProductStatus::Active);
    assert_eq!(first.collection_handles, vec!["harnesses"]);
    assert_eq!(first.variants.len(), 2);
    assert_eq!(first.images.len(), 1);

    let second = &catalog.products[1];
    assert_eq!(second.status, ProductStatus::Draft);
    assert!(second.collection_handles.is_empty());
    assert!(second.variants.is_empty());
    assert!(second.images.is_empty());

    assert_eq!(catalog.total_variants(), 2);
    assert_eq!(catalog.total_images(), 1);
}

#[test]
fn normalize_catalog_keeps_source_order() {
    let catalog = normalize_catalog(
        &[draft_product(), published_product()],
        &[],
        &CategoryTree::default(),
        &options(),
    );
    let handles: Vec<&str> = catalog.products.iter().map(|p| p.handle.as_str()).collect();
    assert_eq!(handles, vec!["spare-pin", "elite-carbon-harness"]);
    assert!(catalog.categories.is_empty());
}
