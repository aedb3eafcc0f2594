//! Price and weight conversion to integer units.
//!
//! Arithmetic is exact decimal and truncates toward zero. Inputs that do not
//! parse never fail the emitter: prices become `0`, compare-at prices become
//! `None` and weights become `0`.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const GRAMS_PER_POUND: Decimal = Decimal::from_parts(45_359_237, 0, 0, false, 5);
const GRAMS_PER_OUNCE: Decimal = Decimal::from_parts(28_349_523, 0, 0, false, 6);

/// `price × rate × 100`, truncated. A price that does not parse gives `0`.
#[must_use]
pub fn to_minor_units(price: &str, rate: Decimal) -> i64 {
    convert(price, rate).unwrap_or(0)
}

/// Like [`to_minor_units`] but absent, blank or malformed input gives `None`.
#[must_use]
pub fn optional_minor_units(price: Option<&str>, rate: Decimal) -> Option<i64> {
    convert(price?, rate)
}

fn convert(price: &str, rate: Decimal) -> Option<i64> {
    let amount = Decimal::from_str(price.trim()).ok()?;
    amount
        .checked_mul(rate)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .trunc()
        .to_i64()
}

/// Weight in whole grams. Unknown units are taken as grams.
#[must_use]
pub fn weight_grams(weight: Option<f64>, unit: &str) -> i64 {
    let Some(weight) = weight.filter(|w| w.is_finite()) else {
        return 0;
    };
    // Shortest round-trip text keeps 1.4 as 1.4 rather than its binary expansion.
    let Ok(amount) = Decimal::from_str(&weight.to_string()) else {
        return 0;
    };
    let factor = match unit.trim().to_ascii_lowercase().as_str() {
        "kg" => Decimal::ONE_THOUSAND,
        "lb" | "lbs" => GRAMS_PER_POUND,
        "oz" => GRAMS_PER_OUNCE,
        _ => Decimal::ONE,
    };
    amount
        .checked_mul(factor)
        .and_then(|g| g.trunc().to_i64())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn truncates_after_multiplication() {
        assert_eq!(to_minor_units("19.99", rate("0.92")), 1839);
    }

    #[test]
    fn identity_rate_keeps_cents() {
        assert_eq!(to_minor_units("449.00", Decimal::ONE), 44900);
        assert_eq!(to_minor_units(" 0.01 ", Decimal::ONE), 1);
    }

    #[test]
    fn malformed_price_is_zero() {
        assert_eq!(to_minor_units("", rate("0.92")), 0);
        assert_eq!(to_minor_units("free", rate("0.92")), 0);
    }

    #[test]
    fn compare_at_price_is_optional() {
        assert_eq!(optional_minor_units(None, Decimal::ONE), None);
        assert_eq!(optional_minor_units(Some(""), Decimal::ONE), None);
        assert_eq!(optional_minor_units(Some("n/a"), Decimal::ONE), None);
        assert_eq!(optional_minor_units(Some("25.50"), rate("0.92")), Some(2346));
    }

    #[test]
    fn weights_by_unit() {
        assert_eq!(weight_grams(Some(1.4), "kg"), 1400);
        assert_eq!(weight_grams(Some(350.0), "g"), 350);
        assert_eq!(weight_grams(Some(2.0), "lb"), 907);
        assert_eq!(weight_grams(Some(3.0), "OZ"), 85);
        assert_eq!(weight_grams(Some(12.9), "stone-ish"), 12);
    }

    #[test]
    fn missing_weight_is_zero() {
        assert_eq!(weight_grams(None, "kg"), 0);
        assert_eq!(weight_grams(Some(f64::NAN), "kg"), 0);
    }
}
