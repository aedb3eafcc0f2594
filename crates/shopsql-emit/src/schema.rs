//! Natural keys for the target schema.

/// Product `"canonicalSlug"`: `{brand_slug}-{handle}`.
#[must_use]
pub fn canonical_slug(brand_slug: &str, handle: &str) -> String {
    format!("{brand_slug}-{handle}")
}

/// Variant conflict key. Blank SKUs become `{handle}-{index}`.
#[must_use]
pub fn variant_sku(handle: &str, index: usize, sku: &str) -> String {
    let sku = sku.trim();
    if sku.is_empty() {
        format!("{handle}-{index}")
    } else {
        sku.to_owned()
    }
}

/// `LIKE` pattern matching every canonical slug under `brand_slug`.
#[must_use]
pub fn brand_slug_pattern(brand_slug: &str) -> String {
    let mut pattern = String::with_capacity(brand_slug.len() + 2);
    for c in brand_slug.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push_str("-%");
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_joins_brand_and_handle() {
        assert_eq!(canonical_slug("ride-engine", "elite-harness"), "ride-engine-elite-harness");
    }

    #[test]
    fn blank_sku_falls_back_to_handle_and_index() {
        assert_eq!(variant_sku("elite-harness", 1, "  "), "elite-harness-1");
        assert_eq!(variant_sku("elite-harness", 1, "RE-100"), "RE-100");
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(brand_slug_pattern("ride-engine"), "ride-engine-%");
        assert_eq!(brand_slug_pattern("a_b%"), "a\\_b\\%-%");
    }
}
