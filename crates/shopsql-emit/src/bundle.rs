//! The set of generated `.sql` files and the master script that includes them.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFile {
    pub name: &'static str,
    pub contents: String,
}

impl SqlFile {
    #[must_use]
    pub fn new(name: &'static str, contents: String) -> Self {
        Self { name, contents }
    }
}

#[derive(Debug, Clone)]
pub struct SqlBundle {
    pub brand_collection: SqlFile,
    pub categories: SqlFile,
    pub products_all: SqlFile,
    pub products_sample: SqlFile,
    pub verify: SqlFile,
    pub brand_name: String,
}

impl SqlBundle {
    pub const MASTER: &'static str = "00_IMPORT_ALL.sql";
    pub const BRAND_COLLECTION: &'static str = "01_brand_collection.sql";
    pub const CATEGORIES: &'static str = "02_categories.sql";
    pub const PRODUCTS_ALL: &'static str = "03_products_all.sql";
    pub const PRODUCTS_SAMPLE: &'static str = "03_products_sample.sql";
    pub const VERIFY: &'static str = "04_verify.sql";

    /// File names the master script includes, in execution order.
    pub const IMPORT_ORDER: [&'static str; 4] = [
        Self::BRAND_COLLECTION,
        Self::CATEGORIES,
        Self::PRODUCTS_ALL,
        Self::VERIFY,
    ];

    /// The files named by [`SqlBundle::IMPORT_ORDER`].
    #[must_use]
    pub fn import_units(&self) -> [&SqlFile; 4] {
        [
            &self.brand_collection,
            &self.categories,
            &self.products_all,
            &self.verify,
        ]
    }

    /// `00_IMPORT_ALL.sql`: every import unit inside one transaction.
    /// `\i` paths are relative, so psql must run from the `sql` directory.
    #[must_use]
    pub fn master_script(&self) -> SqlFile {
        let mut out = format!(
            "-- Complete catalog import: {}\n-- Usage (from this directory): psql \"$DATABASE_URL\" -f {}\n\nBEGIN;\n\n",
            self.brand_name.replace(['\r', '\n'], " "),
            Self::MASTER
        );
        for unit in self.import_units() {
            out.push_str(&format!("\\i {}\n", unit.name));
        }
        out.push_str("\nCOMMIT;\n");
        SqlFile::new(Self::MASTER, out)
    }

    /// All six files, master first.
    #[must_use]
    pub fn files(&self) -> Vec<SqlFile> {
        vec![
            self.master_script(),
            self.brand_collection.clone(),
            self.categories.clone(),
            self.products_all.clone(),
            self.products_sample.clone(),
            self.verify.clone(),
        ]
    }
}
