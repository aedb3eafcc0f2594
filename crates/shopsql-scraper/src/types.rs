//! Storefront response types for the public `products.json` endpoints.
//!
//! ## Observed shape
//!
//! ### Tags
//! Current storefronts return a JSON array of strings; older themes and some
//! proxies return one comma-joined string. [`RawTags`] keeps whichever form
//! arrived so the raw file round-trips unchanged.
//!
//! ### Ids
//! Numeric (`7012345678901`), but some mirrors quote them. Both forms are
//! accepted and stored as text; they are written back as numbers.
//!
//! ### `compare_at_price`
//! `null` when the variant is not on sale, otherwise a decimal string such as
//! `"249.00"`. Occasionally `""`.
//!
//! ### `published_at`
//! An ISO-8601 timestamp, or `null` for unpublished products that still leak
//! into the listing.
//!
//! Every field is optional and leniently typed; see [`crate::lenient`].
//! Unrecognised fields are kept in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;

/// Response body of `GET /products.json` and
/// `GET /collections/{handle}/products.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsPage {
    #[serde(default, deserialize_with = "lenient::records")]
    pub products: Vec<RawProduct>,
}

/// A product exactly as the storefront reported it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        serialize_with = "lenient::serialize_id"
    )]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,

    /// URL slug, e.g. `"elite-carbon-harness"`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub handle: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub vendor: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub product_type: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub body_html: Option<String>,

    #[serde(default, deserialize_with = "lenient::tags")]
    pub tags: RawTags,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub published_at: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "lenient::records")]
    pub variants: Vec<RawVariant>,

    #[serde(default, deserialize_with = "lenient::records")]
    pub images: Vec<RawImage>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The tag field in either of its two observed encodings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<String>),
    /// `"kite, harness , 2024"`
    Joined(String),
}

impl Default for RawTags {
    fn default() -> Self {
        RawTags::List(Vec::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVariant {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        serialize_with = "lenient::serialize_id"
    )]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,

    /// Decimal string in the storefront currency. Empty when absent.
    #[serde(default, deserialize_with = "lenient::string")]
    pub price: String,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub compare_at_price: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sku: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub barcode: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub inventory_quantity: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub weight: Option<f64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub weight_unit: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub requires_shipping: Option<bool>,

    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub taxable: Option<bool>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub option1: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub option2: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub option3: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(
        default,
        deserialize_with = "lenient::string",
        serialize_with = "lenient::serialize_id"
    )]
    pub id: String,

    /// CDN URL. Images with an empty `src` are never downloaded.
    #[serde(default, deserialize_with = "lenient::string")]
    pub src: String,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub width: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub height: Option<i64>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub alt: Option<String>,

    /// 1-based gallery position.
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub position: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One fetched collection listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCollection {
    pub handle: String,
    /// Storefront page of the collection, e.g. `https://shop.example/collections/bags`.
    pub url: String,
    pub product_count: usize,
    #[serde(default, deserialize_with = "lenient::records")]
    pub products: Vec<RawProduct>,
}

impl RawCollection {
    #[must_use]
    pub fn new(handle: &str, url: String, products: Vec<RawProduct>) -> Self {
        Self {
            handle: handle.to_owned(),
            url,
            product_count: products.len(),
            products,
        }
    }
}
