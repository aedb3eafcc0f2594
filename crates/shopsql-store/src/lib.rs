//! Persistence for pipeline artifacts.
//!
//! Stages exchange typed documents through an [`ArtifactStore`]. A stage that
//! needs its predecessor's output reads it through the store and fails with
//! [`StoreError::Missing`] when it is absent, so "stage did not run" is always
//! detectable. The filesystem store is used by the binary; the in-memory store
//! lets pipeline tests run without touching disk.

use thiserror::Error;

pub mod apply;
pub mod artifacts;
pub mod documents;
pub mod layout;

pub use apply::{apply_scripts, connect_pool, ping, PoolConfig, ScriptUnit};
pub use artifacts::{json_bytes, load_json, save_json, ArtifactStore, FsStore, MemoryStore};
pub use documents::{
    ImagesSummary, ImportSummary, RawCollectionsFile, RawProductsFile,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("required artifact {key} is missing; run the stage that produces it first")]
    Missing { key: String },

    #[error("artifact key '{key}' must be a relative path without '..'")]
    InvalidKey { key: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {key} is not valid JSON for its document type: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("script {script} failed: {source}")]
    Script {
        script: String,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
