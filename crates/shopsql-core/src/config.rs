use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, BrandIdentity};
use crate::classify::{ClassificationMode, Sport};
use crate::ConfigError;

/// Largest page size the storefront listing endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values are rejected.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(raw)
    };

    let parse_num = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let source_base_url = parse("SHOPSQL_SOURCE_BASE_URL", "https://rideengine.com")?;
    let output_dir = PathBuf::from(parse("SHOPSQL_OUTPUT_DIR", "./catalog_data")?);
    let taxonomy_path = PathBuf::from(parse("SHOPSQL_TAXONOMY_PATH", "./config/taxonomy.yaml")?);

    let page_size = parse_page_size(&or_default("SHOPSQL_PAGE_SIZE", "250"))?;
    let request_timeout_secs = parse_num("SHOPSQL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHOPSQL_USER_AGENT", "shopsql/0.1 (catalog-import)");
    let image_delay_ms = parse_num("SHOPSQL_IMAGE_DELAY_MS", "100")?;

    let exchange_rate = parse_exchange_rate(&or_default("SHOPSQL_EXCHANGE_RATE", "0.92"))?;
    let default_sport = or_default("SHOPSQL_DEFAULT_SPORT", "WATERSPORTS")
        .parse::<Sport>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "SHOPSQL_DEFAULT_SPORT".to_string(),
            reason,
        })?;
    let classification = parse_classification_mode(
        &or_default("SHOPSQL_CLASSIFICATION_MODE", "fixed"),
        default_sport,
    )?;

    let brand = BrandIdentity {
        name: parse("SHOPSQL_BRAND_NAME", "Ride Engine")?,
        slug: parse("SHOPSQL_BRAND_SLUG", "ride-engine")?,
        description: or_default(
            "SHOPSQL_BRAND_DESCRIPTION",
            "Ride Engine - Premium watersports apparel, harnesses, wetsuits, and accessories",
        ),
    };

    let sample_size = usize::try_from(parse_num("SHOPSQL_SAMPLE_SIZE", "10")?).map_err(|e| {
        ConfigError::InvalidEnvVar {
            var: "SHOPSQL_SAMPLE_SIZE".to_string(),
            reason: e.to_string(),
        }
    })?;
    let low_stock_threshold =
        i64::try_from(parse_num("SHOPSQL_LOW_STOCK_THRESHOLD", "3")?).map_err(|e| {
            ConfigError::InvalidEnvVar {
                var: "SHOPSQL_LOW_STOCK_THRESHOLD".to_string(),
                reason: e.to_string(),
            }
        })?;

    let log_level = or_default("SHOPSQL_LOG_LEVEL", "info");
    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());

    Ok(AppConfig {
        source_base_url,
        output_dir,
        taxonomy_path,
        page_size,
        request_timeout_secs,
        user_agent,
        image_delay_ms,
        exchange_rate,
        classification,
        brand,
        sample_size,
        low_stock_threshold,
        log_level,
        database_url,
    })
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "SHOPSQL_PAGE_SIZE".to_string(),
        reason,
    };
    let size = raw.trim().parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(invalid(format!("must be between 1 and {MAX_PAGE_SIZE}")));
    }
    Ok(size)
}

fn parse_exchange_rate(raw: &str) -> Result<Decimal, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "SHOPSQL_EXCHANGE_RATE".to_string(),
        reason,
    };
    let rate = Decimal::from_str(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if rate <= Decimal::ZERO {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(rate)
}

/// Parse `tags` / `fixed` into a [`ClassificationMode`].
fn parse_classification_mode(
    raw: &str,
    default_sport: Sport,
) -> Result<ClassificationMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "tags" => Ok(ClassificationMode::TagRules),
        "fixed" => Ok(ClassificationMode::Fixed(default_sport)),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPSQL_CLASSIFICATION_MODE".to_string(),
            reason: format!("unknown mode '{other}'; expected 'tags' or 'fixed'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
