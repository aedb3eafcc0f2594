//! Anonymous `DO` blocks and generated comments.

use crate::error::EmitError;
use crate::statement::Statement;

const INDENT: &str = "  ";

/// A PL/pgSQL `DO` block assembled from rendered statements.
#[derive(Debug, Default, Clone)]
pub struct DoBlock {
    header: Vec<String>,
    declarations: Vec<String>,
    body: Vec<String>,
}

impl DoBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a comment line above the block.
    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.header.push(sql_comment(text));
        self
    }

    pub fn declare(&mut self, name: &str, sql_type: &str) -> &mut Self {
        self.declarations.push(format!("{INDENT}{name} {sql_type};"));
        self
    }

    /// Adds a comment line inside the block body.
    pub fn note(&mut self, text: &str) -> &mut Self {
        self.body.push(format!("{INDENT}{}", sql_comment(text)));
        self
    }

    /// Renders `statement` and appends it to the body.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Placeholder`] if the statement does not render.
    pub fn push(&mut self, statement: &Statement) -> Result<&mut Self, EmitError> {
        let rendered = statement.indented(INDENT).render()?;
        self.body.push(rendered + ";");
        Ok(self)
    }

    /// Appends `statements` wrapped in `IF condition THEN ... END IF;`.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Placeholder`] if any statement does not render.
    pub fn push_guarded(
        &mut self,
        condition: &str,
        statements: &[Statement],
    ) -> Result<&mut Self, EmitError> {
        self.body.push(format!("{INDENT}IF {condition} THEN"));
        let pad = INDENT.repeat(2);
        for statement in statements {
            let rendered = statement.indented(&pad).render()?;
            self.body.push(rendered + ";");
        }
        self.body.push(format!("{INDENT}END IF;"));
        Ok(self)
    }

    /// The complete block, terminated by `;` and a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let body = self.body.join("\n");
        let tag = dollar_tag(&body);

        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&format!("DO {tag}\n"));
        if !self.declarations.is_empty() {
            out.push_str("DECLARE\n");
            for line in &self.declarations {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("BEGIN\n");
        if !body.is_empty() {
            out.push_str(&body);
            out.push('\n');
        }
        out.push_str(&format!("END {tag};\n"));
        out
    }
}

/// A dollar-quote tag that does not occur anywhere in `body`.
#[must_use]
pub fn dollar_tag(body: &str) -> String {
    if !body.contains("$$") {
        return "$$".to_owned();
    }
    if !body.contains("$shopsql$") {
        return "$shopsql$".to_owned();
    }
    (1_u32..)
        .map(|n| format!("$shopsql{n}$"))
        .find(|tag| !body.contains(tag.as_str()))
        .unwrap_or_else(|| "$shopsql$".to_owned())
}

/// A one-line `--` comment; line breaks in `text` become spaces.
#[must_use]
pub fn sql_comment(text: &str) -> String {
    let flat: Vec<&str> = text.split(['\r', '\n']).filter(|s| !s.is_empty()).collect();
    format!("-- {}", flat.join(" "))
}
