//! Running generated scripts against a live Postgres database.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::StoreError;

const DEFAULT_MAX_CONNECTIONS: u32 = 2;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// One generated `.sql` file.
#[derive(Debug, Clone, Copy)]
pub struct ScriptUnit<'a> {
    pub name: &'a str,
    pub sql: &'a str,
}

/// Executes `units` in order inside a single transaction, the way the master
/// script does under `psql`. Either every unit commits or none does.
///
/// Returns the total number of rows affected.
///
/// # Errors
///
/// Returns [`StoreError::Script`] naming the first unit that fails; the
/// transaction is rolled back.
pub async fn apply_scripts(pool: &PgPool, units: &[ScriptUnit<'_>]) -> Result<u64, StoreError> {
    let mut tx = pool.begin().await?;
    let mut rows_affected = 0;

    for unit in units {
        let result = sqlx::raw_sql(unit.sql)
            .execute(&mut *tx)
            .await
            .map_err(|source| StoreError::Script {
                script: unit.name.to_owned(),
                source,
            })?;
        tracing::info!(
            script = unit.name,
            rows = result.rows_affected(),
            "script applied"
        );
        rows_affected += result.rows_affected();
    }

    tx.commit().await?;
    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }
}
