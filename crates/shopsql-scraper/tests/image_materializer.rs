//! Integration tests for `ImageMaterializer` against a local `wiremock` server
//! and a temporary output directory.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopsql_scraper::images::{ProductImagesMetadata, METADATA_FILE};
use shopsql_scraper::{CatalogClient, ImageMaterializer, RawProduct};

fn product_with_images(server: &MockServer, handle: &str, files: &[&str]) -> RawProduct {
    let images: Vec<serde_json::Value> = files
        .iter()
        .enumerate()
        .map(|(i, f)| {
            json!({
                "id": i + 1,
                "src": format!("{}/cdn/{f}?v=123", server.uri()),
                "width": 800,
                "height": 600,
                "alt": null
            })
        })
        .collect();
    serde_json::from_value(json!({
        "id": 1,
        "title": "Elite Harness",
        "handle": handle,
        "images": images
    }))
    .expect("fixture must deserialize")
}

async fn mount_image(server: &MockServer, file: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/cdn/{file}")))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(format!("bytes of {file}")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn downloads_images_and_writes_sidecar() {
    let server = MockServer::start().await;
    mount_image(&server, "front.jpg", 200).await;
    mount_image(&server, "back.jpg", 200).await;

    let dir = TempDir::new().unwrap();
    let client = CatalogClient::new(&server.uri(), 5, "shopsql-test/0.1").unwrap();
    let materializer = ImageMaterializer::new(&client, dir.path(), Duration::ZERO);

    let product = product_with_images(&server, "elite harness", &["front.jpg", "back.jpg"]);
    let report = materializer.materialize_all(&[product]).await.unwrap();

    assert_eq!(report.total_products, 1);
    assert_eq!(report.products_with_images, 1);
    assert_eq!(report.images_downloaded, 2);
    assert_eq!(report.images_failed, 0);

    let product_dir = dir.path().join("images").join("elite_harness");
    let front = std::fs::read_to_string(product_dir.join("00_front.jpg")).unwrap();
    assert_eq!(front, "bytes of front.jpg");
    assert!(product_dir.join("01_back.jpg").exists());
    assert!(!product_dir.join("00_front.jpg.part").exists());

    let sidecar: ProductImagesMetadata = serde_json::from_str(
        &std::fs::read_to_string(product_dir.join(METADATA_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(sidecar.product_handle, "elite harness");
    assert_eq!(sidecar.images.len(), 2);
    assert_eq!(sidecar.images[1].filename, "01_back.jpg");
    assert_eq!(sidecar.images[1].alt, "Elite Harness");
    assert_eq!(sidecar.images[1].position, 2);
    assert_eq!(sidecar.images[0].width, Some(800));
}

#[tokio::test]
async fn existing_files_are_not_fetched_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdn/front.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes("new"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let product_dir = dir.path().join("images").join("harness");
    std::fs::create_dir_all(&product_dir).unwrap();
    std::fs::write(product_dir.join("00_front.jpg"), "old").unwrap();

    let client = CatalogClient::new(&server.uri(), 5, "shopsql-test/0.1").unwrap();
    let materializer = ImageMaterializer::new(&client, dir.path(), Duration::ZERO);
    let outcome = materializer
        .materialize_product(&product_with_images(&server, "harness", &["front.jpg"]))
        .await
        .unwrap();

    assert_eq!(outcome.downloaded, 1);
    assert_eq!(outcome.already_present, 1);
    assert_eq!(
        std::fs::read_to_string(product_dir.join("00_front.jpg")).unwrap(),
        "old"
    );
}

#[tokio::test]
async fn failed_download_is_counted_and_skipped() {
    let server = MockServer::start().await;
    mount_image(&server, "gone.jpg", 404).await;
    mount_image(&server, "ok.jpg", 200).await;

    let dir = TempDir::new().unwrap();
    let client = CatalogClient::new(&server.uri(), 5, "shopsql-test/0.1").unwrap();
    let materializer = ImageMaterializer::new(&client, dir.path(), Duration::ZERO);

    let outcome = materializer
        .materialize_product(&product_with_images(&server, "bag", &["gone.jpg", "ok.jpg"]))
        .await
        .unwrap();

    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.downloaded, 1);
    let product_dir = dir.path().join("images").join("bag");
    assert!(!product_dir.join("00_gone.jpg").exists());
    assert!(!product_dir.join("00_gone.jpg.part").exists());
    assert!(product_dir.join("01_ok.jpg").exists());
}

#[tokio::test]
async fn products_without_images_create_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let client = CatalogClient::new(&server.uri(), 5, "shopsql-test/0.1").unwrap();
    let materializer = ImageMaterializer::new(&client, dir.path(), Duration::ZERO);

    let product: RawProduct =
        serde_json::from_value(json!({"id": 2, "handle": "pin", "images": []})).unwrap();
    let report = materializer.materialize_all(&[product]).await.unwrap();

    assert_eq!(report.total_products, 1);
    assert_eq!(report.products_with_images, 0);
    assert!(!dir.path().join("images").join("pin").exists());
}
