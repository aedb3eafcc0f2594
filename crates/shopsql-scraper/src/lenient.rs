//! Field-level deserializers that never fail.
//!
//! Storefront payloads are loosely typed: ids arrive as numbers or strings,
//! prices as strings or floats, and any field may be `null`. Every helper here
//! accepts an arbitrary JSON value and maps anything it does not understand to
//! the field's default, so one odd record never rejects a whole page.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::types::RawTags;

/// Scalar rendered as text. Objects, arrays and `null` become `""`.
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Like [`string`] but keeps `null` and non-scalars as `None`.
pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

pub(crate) fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(float_to_i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

pub(crate) fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}

pub(crate) fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Tags as either a comma-joined string or a list. Non-string list entries
/// are rendered as text; anything else is an empty list.
pub(crate) fn tags<'de, D>(deserializer: D) -> Result<RawTags, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => RawTags::Joined(s),
        Value::Array(items) => RawTags::List(items.iter().filter_map(scalar_text).collect()),
        _ => RawTags::default(),
    })
}

/// A list of nested records. Elements that do not deserialize (for example a
/// bare string where an object is expected) are dropped with a warning.
pub(crate) fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed nested record");
                None
            }
        })
        .collect())
}

/// Writes an id back as a JSON number when it is one, so raw files keep the
/// storefront's shape.
pub(crate) fn serialize_id<S>(id: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id.parse::<i64>() {
        Ok(n) => serializer.serialize_i64(n),
        Err(_) => serializer.serialize_str(id),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up, so compare with strict upper bound
    (f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f.trunc() as i64)
}
