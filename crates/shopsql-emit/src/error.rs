use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("placeholder mismatch ({reason}) in statement: {sql}")]
    Placeholder { reason: String, sql: String },

    #[error("category '{slug}' references parent id {parent_id}, which is not in the category list")]
    OrphanCategory { slug: String, parent_id: u32 },
}
