//! Template loading and custom filters

use aws_terraform_generator_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("dot_escape", dot_escape_filter);

    tera.add_raw_template("diagram.dot", include_str!("../templates/diagram.dot.tera"))
        .map_err(|e| {
            GeneratorError::Generation(format!("Failed to load diagram.dot template: {}", e))
        })?;

    Ok(tera)
}

/// Escape a value for use inside a double-quoted DOT string
fn dot_escape_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("dot_escape filter expects a string"))?;

    Ok(Value::String(dot_escape(s)))
}

fn dot_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let tera = load_templates().unwrap();
        assert!(tera.get_template_names().any(|name| name == "diagram.dot"));
    }

    #[test]
    fn test_dot_escape() {
        assert_eq!(dot_escape("POST /v1/examples"), "POST /v1/examples");
        assert_eq!(dot_escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(dot_escape(r"C:\path"), r"C:\\path");
        assert_eq!(dot_escape("a\nb"), r"a\nb");
    }

    #[test]
    fn test_dot_escape_filter_rejects_non_strings() {
        let result = dot_escape_filter(&Value::Bool(true), &HashMap::new());
        assert!(result.is_err());
    }
}
