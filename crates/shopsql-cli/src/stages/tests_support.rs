//! Fixtures shared by the stage tests.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use shopsql_core::{AppConfig, BrandIdentity, ClassificationMode};
use shopsql_store::{ArtifactStore, MemoryStore, StoreError};

pub(crate) const TAXONOMY: &str = "\
categories:
  - name: Harnesses
    handle: harnesses
    subcategories:
      - { name: Kite Harnesses, handle: kite-harnesses }
";

/// Writes [`TAXONOMY`] into `dir` and returns its path.
pub(crate) fn write_taxonomy(dir: &Path) -> PathBuf {
    let path = dir.join("taxonomy.yaml");
    std::fs::write(&path, TAXONOMY).expect("failed to write taxonomy fixture");
    path
}

pub(crate) fn config(output_dir: &Path) -> AppConfig {
    AppConfig {
        source_base_url: "https://rideengine.com".to_owned(),
        output_dir: output_dir.to_path_buf(),
        taxonomy_path: output_dir.join("taxonomy.yaml"),
        page_size: 250,
        request_timeout_secs: 5,
        user_agent: "shopsql-test/0.1".to_owned(),
        image_delay_ms: 0,
        exchange_rate: Decimal::new(92, 2),
        classification: ClassificationMode::TagRules,
        brand: BrandIdentity {
            name: "Ride Engine".to_owned(),
            slug: "ride-engine".to_owned(),
            description: "Harnesses and accessories".to_owned(),
        },
        sample_size: 1,
        low_stock_threshold: 3,
        log_level: "info".to_owned(),
        database_url: None,
    }
}

/// A [`MemoryStore`] whose writes to one key fail, as a full disk would.
#[derive(Debug)]
pub(crate) struct FailingStore {
    pub(crate) inner: MemoryStore,
    fail_key: String,
}

impl FailingStore {
    pub(crate) fn failing_on(key: impl Into<String>) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_key: key.into(),
        }
    }
}

impl ArtifactStore for FailingStore {
    fn write(&self, key: &str, contents: &[u8]) -> Result<(), StoreError> {
        if key == self.fail_key {
            return Err(StoreError::Io {
                path: key.to_owned(),
                source: std::io::Error::other("no space left on device"),
            });
        }
        self.inner.write(key, contents)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.inner.read(key)
    }

    fn exists(&self, key: &str) -> bool {
        self.inner.exists(key)
    }

    fn describe(&self, key: &str) -> String {
        self.inner.describe(key)
    }
}
