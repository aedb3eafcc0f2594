use super::*;

fn client(base_url: &str) -> CatalogClient {
    CatalogClient::new(base_url, 5, "shopsql-test/0.1").expect("client must build")
}

#[test]
fn new_keeps_only_the_origin() {
    let c = client("https://rideengine.com/collections/all");
    assert_eq!(c.origin(), "https://rideengine.com");
}

#[test]
fn new_rejects_relative_url() {
    let result = CatalogClient::new("rideengine.com", 5, "ua");
    assert!(
        matches!(result, Err(ScraperError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}

#[test]
fn products_url_carries_limit_and_page() {
    let url = client("https://rideengine.com").products_url(250, 3).unwrap();
    assert_eq!(
        url.as_str(),
        "https://rideengine.com/products.json?limit=250&page=3"
    );
}

#[test]
fn products_url_ignores_trailing_slash() {
    let url = client("https://rideengine.com/").products_url(50, 1).unwrap();
    assert_eq!(
        url.as_str(),
        "https://rideengine.com/products.json?limit=50&page=1"
    );
}

#[test]
fn collection_products_url_nests_handle() {
    let url = client("https://rideengine.com")
        .collection_products_url("spreader-bars", 250)
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://rideengine.com/collections/spreader-bars/products.json?limit=250"
    );
}

#[test]
fn collection_products_url_encodes_handle() {
    let url = client("https://rideengine.com")
        .collection_products_url("robes & ponchos", 250)
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://rideengine.com/collections/robes%20&%20ponchos/products.json?limit=250"
    );
}

#[test]
fn collection_page_url_has_no_json_suffix() {
    assert_eq!(
        client("https://rideengine.com/").collection_page_url("bags"),
        "https://rideengine.com/collections/bags"
    );
}

#[test]
fn extract_store_origin_strips_path() {
    assert_eq!(
        extract_store_origin(&Url::parse("https://rideengine.com/collections/all").unwrap()),
        "https://rideengine.com"
    );
}

#[test]
fn extract_store_origin_keeps_port() {
    assert_eq!(
        extract_store_origin(&Url::parse("http://127.0.0.1:8080/products.json").unwrap()),
        "http://127.0.0.1:8080"
    );
}

#[test]
fn extract_domain_strips_scheme_and_path() {
    assert_eq!(
        extract_domain("https://rideengine.com/products.json?page=2"),
        "rideengine.com"
    );
}

#[test]
fn extract_domain_fallback_no_scheme() {
    assert_eq!(extract_domain("rideengine.com"), "rideengine.com");
}
