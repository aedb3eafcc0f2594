//! Sport classification for the target schema's `sport` column.
//!
//! Two modes exist because the target schema changed over time: the earlier
//! generation inferred a sport from product tags, the later one writes a
//! single constant for every product of a multi-sport brand.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sport {
    Kite,
    Wing,
    Foil,
    Wake,
    Sup,
    Watersports,
}

impl Sport {
    /// Enum label as written into SQL.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Kite => "KITE",
            Sport::Wing => "WING",
            Sport::Foil => "FOIL",
            Sport::Wake => "WAKE",
            Sport::Sup => "SUP",
            Sport::Watersports => "WATERSPORTS",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KITE" => Ok(Sport::Kite),
            "WING" => Ok(Sport::Wing),
            "FOIL" => Ok(Sport::Foil),
            "WAKE" => Ok(Sport::Wake),
            "SUP" => Ok(Sport::Sup),
            "WATERSPORTS" => Ok(Sport::Watersports),
            other => Err(format!(
                "unknown sport '{other}'; expected KITE, WING, FOIL, WAKE, SUP or WATERSPORTS"
            )),
        }
    }
}

/// How the `sport` column is filled for each product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMode {
    /// Ordered keyword rules over tags, then a product-type fallback.
    TagRules,
    /// The same sport for every product.
    Fixed(Sport),
}

impl ClassificationMode {
    #[must_use]
    pub fn classify(self, tags: &[String], product_type: &str) -> Sport {
        match self {
            ClassificationMode::TagRules => classify_by_tags(tags, product_type),
            ClassificationMode::Fixed(sport) => sport,
        }
    }
}

/// Keyword rules checked top to bottom; the first rule with a matching tag wins.
/// The order is significant: a product tagged both `wing` and `kite` is WING.
pub const TAG_RULES: &[(&[&str], Sport)] = &[
    (&["wing", "wingfoil", "wingharness"], Sport::Wing),
    (&["kite", "kitesurf"], Sport::Kite),
    (&["foil", "wing foil"], Sport::Foil),
    (&["wake", "wakeboard"], Sport::Wake),
    (&["sup", "paddle"], Sport::Sup),
];

/// Sport used when neither a tag rule nor the product-type fallback applies.
pub const FALLBACK_SPORT: Sport = Sport::Wake;

/// Infers a sport from tags (exact, case-insensitive keyword match), then from
/// the product type (`"harness"` substring means KITE), then [`FALLBACK_SPORT`].
#[must_use]
pub fn classify_by_tags(tags: &[String], product_type: &str) -> Sport {
    let lowered: Vec<String> = tags.iter().map(|t| t.trim().to_lowercase()).collect();

    for (keywords, sport) in TAG_RULES {
        if lowered.iter().any(|tag| keywords.contains(&tag.as_str())) {
            return *sport;
        }
    }

    if product_type.to_lowercase().contains("harness") {
        return Sport::Kite;
    }

    FALLBACK_SPORT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn first_matching_rule_wins() {
        assert_eq!(classify_by_tags(&tags(&["Kite", "Wing"]), ""), Sport::Wing);
    }

    #[test]
    fn kite_before_foil() {
        assert_eq!(classify_by_tags(&tags(&["foil", "kitesurf"]), ""), Sport::Kite);
    }

    #[test]
    fn multi_word_keyword_matches_whole_tag() {
        assert_eq!(classify_by_tags(&tags(&["Wing Foil"]), ""), Sport::Foil);
    }

    #[test]
    fn keywords_do_not_match_substrings() {
        assert_eq!(classify_by_tags(&tags(&["winged"]), "Apparel"), Sport::Wake);
    }

    #[test]
    fn sup_rule_is_last_tag_rule() {
        assert_eq!(classify_by_tags(&tags(&["paddle"]), "Harness"), Sport::Sup);
    }

    #[test]
    fn harness_type_falls_back_to_kite() {
        assert_eq!(classify_by_tags(&[], "Seat Harness"), Sport::Kite);
    }

    #[test]
    fn unmatched_product_uses_fallback() {
        assert_eq!(classify_by_tags(&tags(&["apparel"]), "Wetsuit"), FALLBACK_SPORT);
    }

    #[test]
    fn fixed_mode_ignores_tags() {
        let mode = ClassificationMode::Fixed(Sport::Watersports);
        assert_eq!(mode.classify(&tags(&["kite"]), "Harness"), Sport::Watersports);
    }

    #[test]
    fn sport_parses_case_insensitively() {
        assert_eq!("watersports".parse::<Sport>().unwrap(), Sport::Watersports);
        assert!("snow".parse::<Sport>().is_err());
    }
}
