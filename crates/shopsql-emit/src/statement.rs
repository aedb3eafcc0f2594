//! Parameterised SQL statements rendered to literal text.
//!
//! Generated scripts are plain `.sql` files, so bound values cannot travel to
//! the server separately. Instead each [`Statement`] keeps its SQL with
//! `$1..$n` placeholders apart from its values until [`Statement::render`],
//! which substitutes literals in one left-to-right pass. Substituted text is
//! never rescanned, so a value containing `$2` or a quote cannot alter the
//! statement around it.

use crate::error::EmitError;

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int(i64),
    Bool(bool),
    /// Rendered as a `jsonb` literal.
    Json(serde_json::Value),
}

impl SqlValue {
    /// The SQL literal for this value.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            SqlValue::Null => "NULL".to_owned(),
            SqlValue::Text(s) => quote_text(s),
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Bool(true) => "TRUE".to_owned(),
            SqlValue::Bool(false) => "FALSE".to_owned(),
            SqlValue::Json(v) => format!("{}::jsonb", quote_text(&v.to_string())),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_owned())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(value.clone())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<u8> for SqlValue {
    fn from(value: u8) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(value: serde_json::Value) -> Self {
        SqlValue::Json(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

/// Single-quoted literal with quotes doubled and NUL bytes removed.
/// Assumes `standard_conforming_strings = on`, so backslashes are literal.
#[must_use]
pub fn quote_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\0' => {}
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

/// SQL text plus the values for its `$n` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlValue>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Binds the next placeholder, `$1` first.
    #[must_use]
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Prefixes every template line with `pad`. Bound values are untouched,
    /// so multi-line text literals keep their exact content.
    #[must_use]
    pub fn indented(&self, pad: &str) -> Self {
        let sql = self
            .sql
            .lines()
            .map(|line| format!("{pad}{line}"))
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            sql,
            params: self.params.clone(),
        }
    }

    /// Substitutes every placeholder with its literal.
    ///
    /// A placeholder may appear more than once.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Placeholder`] when a placeholder has no bound
    /// value, is `$0`, or when a bound value is never referenced.
    pub fn render(&self) -> Result<String, EmitError> {
        let mut out = String::with_capacity(self.sql.len() + 64);
        let mut used = vec![false; self.params.len()];
        let mut chars = self.sql.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }

            let mut end = start + 1;
            while let Some(&(i, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + d.len_utf8();
                chars.next();
            }

            let digits = &self.sql[start + 1..end];
            if digits.is_empty() {
                out.push('$');
                continue;
            }

            let index = digits.parse::<usize>().unwrap_or(0);
            let Some(value) = index.checked_sub(1).and_then(|i| self.params.get(i)) else {
                return Err(self.placeholder_error(format!(
                    "${digits} has no bound value; {} bound",
                    self.params.len()
                )));
            };
            used[index - 1] = true;
            out.push_str(&value.to_literal());
        }

        if let Some(unused) = used.iter().position(|u| !u) {
            return Err(self.placeholder_error(format!(
                "bound value {} is never referenced",
                unused + 1
            )));
        }

        Ok(out)
    }

    fn placeholder_error(&self, reason: String) -> EmitError {
        EmitError::Placeholder {
            reason,
            sql: self.sql.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renders_each_value_kind() {
        let rendered = Statement::new("VALUES ($1, $2, $3, $4, $5)")
            .bind("Elite")
            .bind(1839_i64)
            .bind(true)
            .bind(None::<String>)
            .bind(json!({"option1": "M"}))
            .render()
            .unwrap();
        assert_eq!(
            rendered,
            r#"VALUES ('Elite', 1839, TRUE, NULL, '{"option1":"M"}'::jsonb)"#
        );
    }

    #[test]
    fn quotes_are_doubled() {
        let rendered = Statement::new("SELECT $1").bind("Kid's 'Pro'").render().unwrap();
        assert_eq!(rendered, "SELECT 'Kid''s ''Pro'''");
    }

    #[test]
    fn nul_bytes_are_stripped() {
        assert_eq!(quote_text("a\0b"), "'ab'");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let rendered = Statement::new("VALUES ($1, $2)")
            .bind("costs $2")
            .bind("x")
            .render()
            .unwrap();
        assert_eq!(rendered, "VALUES ('costs $2', 'x')");
    }

    #[test]
    fn placeholder_may_repeat() {
        let rendered = Statement::new("$1 = $1").bind(3_i64).render().unwrap();
        assert_eq!(rendered, "3 = 3");
    }

    #[test]
    fn double_digit_placeholders() {
        let mut statement = Statement::new("$10,$1");
        for n in 1..=10_i64 {
            statement = statement.bind(n);
        }
        let err = statement.render().unwrap_err();
        // $2..$9 are bound but unused
        assert!(matches!(err, EmitError::Placeholder { .. }));

        let sql = (1..=10).map(|n| format!("${n}")).collect::<Vec<_>>().join(",");
        let mut statement = Statement::new(sql);
        for n in 1..=10_i64 {
            statement = statement.bind(n * 10);
        }
        assert_eq!(
            statement.render().unwrap(),
            "10,20,30,40,50,60,70,80,90,100"
        );
    }

    #[test]
    fn unbound_placeholder_is_an_error() {
        let err = Statement::new("VALUES ($1, $2)").bind("a").render().unwrap_err();
        assert!(err.to_string().contains("$2 has no bound value"));
    }

    #[test]
    fn dollar_zero_is_an_error() {
        assert!(Statement::new("SELECT $0").render().is_err());
    }

    #[test]
    fn unused_value_is_an_error() {
        let err = Statement::new("SELECT 1").bind("a").render().unwrap_err();
        assert!(err.to_string().contains("never referenced"));
    }

    #[test]
    fn lone_dollar_is_kept() {
        let rendered = Statement::new("SELECT '$' || $1").bind("x").render().unwrap();
        assert_eq!(rendered, "SELECT '$' || 'x'");
    }

    #[test]
    fn indentation_does_not_touch_values() {
        let rendered = Statement::new("SELECT\n$1")
            .bind("line one\nline two")
            .indented("  ")
            .render()
            .unwrap();
        assert_eq!(rendered, "  SELECT\n  'line one\nline two'");
    }

    #[test]
    fn json_quotes_are_escaped() {
        let literal = SqlValue::Json(json!({"option1": "Kid's"})).to_literal();
        assert_eq!(literal, r#"'{"option1":"Kid''s"}'::jsonb"#);
    }
}
