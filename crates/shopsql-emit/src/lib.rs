//! SQL generation for the normalized catalog.
//!
//! Produces PostgreSQL scripts that upsert categories, products, variants and
//! images by natural key, so the full script can be re-run safely.

pub mod block;
pub mod bundle;
pub mod emitter;
pub mod error;
pub mod money;
pub mod schema;
pub mod statement;

pub use block::DoBlock;
pub use bundle::{SqlBundle, SqlFile};
pub use emitter::{EmitConfig, SqlEmitter};
pub use error::EmitError;
pub use statement::{SqlValue, Statement};
