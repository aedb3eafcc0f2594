use rust_decimal::Decimal;
use serde_json::{Map, Value};

use shopsql_core::category::parent_slug;
use shopsql_core::{BrandIdentity, CanonicalProduct, CanonicalVariant, Category, ClassificationMode};

use crate::block::{sql_comment, DoBlock};
use crate::bundle::{SqlBundle, SqlFile};
use crate::error::EmitError;
use crate::money::{optional_minor_units, to_minor_units, weight_grams};
use crate::schema::{brand_slug_pattern, canonical_slug, variant_sku};
use crate::statement::Statement;

const UPSERT_ROOT_CATEGORY: &str = r#"INSERT INTO "Category" (id, name, slug, "parentId", level, "sortOrder", "createdAt", "updatedAt")
VALUES (gen_random_uuid(), $1, $2, NULL, $3, $4, NOW(), NOW())
ON CONFLICT (slug) DO UPDATE SET
  name = EXCLUDED.name,
  "parentId" = EXCLUDED."parentId",
  level = EXCLUDED.level,
  "sortOrder" = EXCLUDED."sortOrder",
  "updatedAt" = NOW()"#;

const UPSERT_CHILD_CATEGORY: &str = r#"INSERT INTO "Category" (id, name, slug, "parentId", level, "sortOrder", "createdAt", "updatedAt")
SELECT gen_random_uuid(), $1, $2, p.id, $3, $4, NOW(), NOW()
FROM "Category" p
WHERE p.slug = $5
ON CONFLICT (slug) DO UPDATE SET
  name = EXCLUDED.name,
  "parentId" = EXCLUDED."parentId",
  level = EXCLUDED.level,
  "sortOrder" = EXCLUDED."sortOrder",
  "updatedAt" = NOW()"#;

const INSERT_BRAND_COLLECTION: &str = r#"INSERT INTO "Collection" (id, title, "canonicalSlug", description, "heroImageUrl", "createdAt", "updatedAt")
VALUES (gen_random_uuid(), $1, $2, $3, NULL, NOW(), NOW())
ON CONFLICT ("canonicalSlug") DO NOTHING"#;

const UPSERT_PRODUCT: &str = r#"INSERT INTO "Product" (id, title, subtitle, "canonicalSlug", sport, "productType", status, "descriptionRich", "seoMetaTitle", "seoMetaDescription", "createdAt", "updatedAt")
VALUES (gen_random_uuid(), $1, NULL, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
ON CONFLICT ("canonicalSlug") DO UPDATE SET
  title = EXCLUDED.title,
  sport = EXCLUDED.sport,
  "productType" = EXCLUDED."productType",
  status = EXCLUDED.status,
  "descriptionRich" = EXCLUDED."descriptionRich",
  "seoMetaTitle" = EXCLUDED."seoMetaTitle",
  "seoMetaDescription" = EXCLUDED."seoMetaDescription",
  "updatedAt" = NOW()
RETURNING id INTO v_product_id"#;

const SELECT_BRAND_COLLECTION: &str =
    r#"SELECT id INTO v_collection_id FROM "Collection" WHERE "canonicalSlug" = $1"#;

const LINK_BRAND_COLLECTION: &str = r#"INSERT INTO "CollectionProduct" ("collectionId", "productId", "sortOrder", pinned)
VALUES (v_collection_id, v_product_id, 0, false)
ON CONFLICT DO NOTHING"#;

const LINK_CATEGORY: &str = r#"INSERT INTO "ProductCategory" ("productId", "categoryId", "sortOrder")
SELECT v_product_id, c.id, $1
FROM "Category" c
WHERE c.slug = $2
ON CONFLICT DO NOTHING"#;

const UPSERT_VARIANT: &str = r#"INSERT INTO "ProductVariant" (id, "productId", sku, "optionValues", "priceEurCents", "compareAtEurCents", "weightGrams", barcode, "lowStockThreshold", "createdAt", "updatedAt")
VALUES (gen_random_uuid(), v_product_id, $1, $2, $3, $4, $5, $6, $7, NOW(), NOW())
ON CONFLICT (sku) DO UPDATE SET
  "productId" = EXCLUDED."productId",
  "optionValues" = EXCLUDED."optionValues",
  "priceEurCents" = EXCLUDED."priceEurCents",
  "compareAtEurCents" = EXCLUDED."compareAtEurCents",
  "weightGrams" = EXCLUDED."weightGrams",
  barcode = EXCLUDED.barcode,
  "updatedAt" = NOW()"#;

const UPSERT_IMAGE: &str = r#"INSERT INTO "ProductImage" (id, "productId", "variantId", url, alt, "sortOrder")
VALUES (gen_random_uuid(), v_product_id, NULL, $1, $2, $3)
ON CONFLICT ("productId", url) DO UPDATE SET
  alt = EXCLUDED.alt,
  "sortOrder" = EXCLUDED."sortOrder""#;

const VERIFY_PRODUCT_COUNT: &str = r#"SELECT COUNT(*) AS total_products
FROM "Product"
WHERE "canonicalSlug" LIKE $1"#;

const VERIFY_BY_TYPE: &str = r#"SELECT "productType", COUNT(*) AS products
FROM "Product"
WHERE "canonicalSlug" LIKE $1
GROUP BY "productType"
ORDER BY products DESC"#;

const VERIFY_BY_SPORT: &str = r#"SELECT sport, COUNT(*) AS products
FROM "Product"
WHERE "canonicalSlug" LIKE $1
GROUP BY sport
ORDER BY products DESC"#;

const VERIFY_COLLECTION_SIZE: &str = r#"SELECT c.title, COUNT(cp."productId") AS products
FROM "Collection" c
LEFT JOIN "CollectionProduct" cp ON cp."collectionId" = c.id
WHERE c."canonicalSlug" = $1
GROUP BY c.title"#;

const VERIFY_CATEGORY_LEVELS: &str = r#"SELECT level, COUNT(*) AS categories
FROM "Category"
GROUP BY level
ORDER BY level"#;

const VERIFY_VARIANTS_PER_PRODUCT: &str = r#"SELECT p.title, COUNT(v.id) AS variants
FROM "Product" p
LEFT JOIN "ProductVariant" v ON v."productId" = p.id
WHERE p."canonicalSlug" LIKE $1
GROUP BY p.title
ORDER BY variants DESC
LIMIT 10"#;

/// Inputs to SQL generation that do not come from the catalog itself.
#[derive(Debug, Clone)]
pub struct EmitConfig {
    pub brand: BrandIdentity,
    pub exchange_rate: Decimal,
    pub classification: ClassificationMode,
    pub low_stock_threshold: i64,
}

/// Turns normalized categories and products into idempotent upsert scripts.
///
/// Foreign keys are never precomputed: categories resolve their parent, and
/// products resolve categories and the brand collection, by natural key when
/// the script runs.
#[derive(Debug, Clone)]
pub struct SqlEmitter {
    config: EmitConfig,
}

impl SqlEmitter {
    #[must_use]
    pub fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    /// `01_brand_collection.sql`.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Placeholder`] if the statement does not render.
    pub fn brand_collection_script(&self) -> Result<String, EmitError> {
        let brand = &self.config.brand;
        let insert = Statement::new(INSERT_BRAND_COLLECTION)
            .bind(&brand.name)
            .bind(&brand.slug)
            .bind(&brand.description);

        let mut out = script_header(&format!("Brand collection: {}", brand.name));
        out.push_str(&insert.render()?);
        out.push_str(";\n");
        Ok(out)
    }

    /// One upsert per category, in list order.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::OrphanCategory`] when a child's parent is not in
    /// `categories`.
    pub fn category_statements(&self, categories: &[Category]) -> Result<Vec<Statement>, EmitError> {
        categories
            .iter()
            .map(|category| match category.parent_id {
                None => Ok(Statement::new(UPSERT_ROOT_CATEGORY)
                    .bind(&category.name)
                    .bind(&category.slug)
                    .bind(category.level)
                    .bind(category.sort_order)),
                Some(parent_id) => {
                    let parent = parent_slug(categories, parent_id).ok_or_else(|| {
                        EmitError::OrphanCategory {
                            slug: category.slug.clone(),
                            parent_id,
                        }
                    })?;
                    Ok(Statement::new(UPSERT_CHILD_CATEGORY)
                        .bind(&category.name)
                        .bind(&category.slug)
                        .bind(category.level)
                        .bind(category.sort_order)
                        .bind(parent))
                }
            })
            .collect()
    }

    /// `02_categories.sql`.
    ///
    /// # Errors
    ///
    /// See [`SqlEmitter::category_statements`].
    pub fn categories_script(&self, categories: &[Category]) -> Result<String, EmitError> {
        let statements = self.category_statements(categories)?;
        let mut out = script_header(&format!("Categories ({})", categories.len()));
        for (category, statement) in categories.iter().zip(&statements) {
            out.push('\n');
            out.push_str(&sql_comment(&format!(
                "{} (level {})",
                category.name, category.level
            )));
            out.push('\n');
            out.push_str(&statement.render()?);
            out.push_str(";\n");
        }
        Ok(out)
    }

    /// The self-contained `DO` block for one product. `ordinal` is 1-based and
    /// only used in the header comment.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Placeholder`] if a statement does not render.
    pub fn product_block(&self, ordinal: usize, product: &CanonicalProduct) -> Result<String, EmitError> {
        let brand_slug = &self.config.brand.slug;
        let sport = self
            .config
            .classification
            .classify(&product.tags, &product.product_type);

        let mut block = DoBlock::new();
        block
            .comment(&format!("Product {ordinal}: {}", product.title))
            .comment(&format!(
                "Type: {} | Variants: {} | Images: {}",
                product.product_type,
                product.variant_count(),
                product.image_count()
            ))
            .declare("v_product_id", "UUID")
            .declare("v_collection_id", "UUID");

        block.push(
            &Statement::new(UPSERT_PRODUCT)
                .bind(&product.title)
                .bind(canonical_slug(brand_slug, &product.handle))
                .bind(sport.as_str())
                .bind(&product.product_type)
                .bind(product.status.as_str())
                .bind(&product.description_html)
                .bind(&product.seo.title)
                .bind(&product.seo.description),
        )?;

        block.push(&Statement::new(SELECT_BRAND_COLLECTION).bind(brand_slug.as_str()))?;
        block.push_guarded(
            "v_collection_id IS NOT NULL",
            &[Statement::new(LINK_BRAND_COLLECTION)],
        )?;

        for (position, handle) in product.collection_handles.iter().enumerate() {
            block.push(
                &Statement::new(LINK_CATEGORY)
                    .bind(i64::try_from(position).unwrap_or(i64::MAX))
                    .bind(handle),
            )?;
        }

        if !product.variants.is_empty() {
            block.note(&format!("Variants ({})", product.variants.len()));
        }
        for (index, variant) in product.variants.iter().enumerate() {
            block.push(&self.variant_statement(&product.handle, index, variant))?;
        }

        if !product.images.is_empty() {
            block.note(&format!("Images ({})", product.images.len()));
        }
        for image in &product.images {
            block.push(
                &Statement::new(UPSERT_IMAGE)
                    .bind(&image.url)
                    .bind(&image.alt)
                    .bind(image.position),
            )?;
        }

        Ok(block.render())
    }

    fn variant_statement(&self, handle: &str, index: usize, variant: &CanonicalVariant) -> Statement {
        let rate = self.config.exchange_rate;
        let options: Map<String, Value> = variant
            .option_values()
            .into_iter()
            .map(|(name, value)| (name.to_owned(), Value::String(value.to_owned())))
            .collect();
        let barcode = Some(variant.barcode.as_str()).filter(|b| !b.is_empty());

        Statement::new(UPSERT_VARIANT)
            .bind(variant_sku(handle, index, &variant.sku))
            .bind(Value::Object(options))
            .bind(to_minor_units(&variant.price, rate))
            .bind(optional_minor_units(variant.compare_at_price.as_deref(), rate))
            .bind(weight_grams(variant.weight, &variant.weight_unit))
            .bind(barcode)
            .bind(self.config.low_stock_threshold)
    }

    /// Product blocks in source order, optionally only the first `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Placeholder`] if a statement does not render.
    pub fn products_script(
        &self,
        products: &[CanonicalProduct],
        limit: Option<usize>,
    ) -> Result<String, EmitError> {
        let selected = &products[..limit.map_or(products.len(), |n| n.min(products.len()))];
        let title = match limit {
            Some(_) => format!("Products (sample of {} of {})", selected.len(), products.len()),
            None => format!("Products ({})", products.len()),
        };

        let mut out = script_header(&title);
        for (i, product) in selected.iter().enumerate() {
            out.push('\n');
            out.push_str(&self.product_block(i + 1, product)?);
        }
        Ok(out)
    }

    /// `04_verify.sql`: read-only aggregate queries for operators.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Placeholder`] if a statement does not render.
    pub fn verification_script(&self) -> Result<String, EmitError> {
        let brand = &self.config.brand;
        let pattern = brand_slug_pattern(&brand.slug);
        let queries = [
            ("Products imported for this brand", Statement::new(VERIFY_PRODUCT_COUNT).bind(&pattern)),
            ("Products by type", Statement::new(VERIFY_BY_TYPE).bind(&pattern)),
            ("Products by sport", Statement::new(VERIFY_BY_SPORT).bind(&pattern)),
            (
                "Brand collection size",
                Statement::new(VERIFY_COLLECTION_SIZE).bind(&brand.slug),
            ),
            ("Categories by level", Statement::new(VERIFY_CATEGORY_LEVELS)),
            (
                "Products with the most variants",
                Statement::new(VERIFY_VARIANTS_PER_PRODUCT).bind(&pattern),
            ),
        ];

        let mut out = script_header(&format!("Verification queries for {}", brand.name));
        for (label, query) in &queries {
            out.push('\n');
            out.push_str(&sql_comment(label));
            out.push('\n');
            out.push_str(&query.render()?);
            out.push_str(";\n");
        }
        Ok(out)
    }

    /// Every generated file, including the sample subset and master script.
    ///
    /// # Errors
    ///
    /// Propagates the first [`EmitError`] from any script.
    pub fn bundle(
        &self,
        categories: &[Category],
        products: &[CanonicalProduct],
        sample_size: usize,
    ) -> Result<SqlBundle, EmitError> {
        let bundle = SqlBundle {
            brand_collection: SqlFile::new(
                SqlBundle::BRAND_COLLECTION,
                self.brand_collection_script()?,
            ),
            categories: SqlFile::new(SqlBundle::CATEGORIES, self.categories_script(categories)?),
            products_all: SqlFile::new(
                SqlBundle::PRODUCTS_ALL,
                self.products_script(products, None)?,
            ),
            products_sample: SqlFile::new(
                SqlBundle::PRODUCTS_SAMPLE,
                self.products_script(products, Some(sample_size))?,
            ),
            verify: SqlFile::new(SqlBundle::VERIFY, self.verification_script()?),
            brand_name: self.config.brand.name.clone(),
        };

        tracing::debug!(
            categories = categories.len(),
            products = products.len(),
            sample_size,
            "rendered sql bundle"
        );
        Ok(bundle)
    }
}

fn script_header(title: &str) -> String {
    format!("{}\n-- Generated by shopsql; safe to re-run.\n", sql_comment(title))
}

#[cfg(test)]
#[path = "emitter_test.rs"]
mod tests;
