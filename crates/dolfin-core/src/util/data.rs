//! YAML and JSON document handling utilities.

use dolfin_types::Result;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Structured document formats understood by the loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON document
    Json,
    /// YAML document
    Yaml,
}

impl DocumentFormat {
    /// Pick a format from a file extension. Anything that is not
    /// `.yml`/`.yaml` is read as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a document into a plain value.
///
/// Blank content yields an empty object rather than an error.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    let value = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(value)
}

/// Load a document from file, picking the format from its extension.
pub fn load_document_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_document(&content, DocumentFormat::from_path(path))
}

/// Short name of a value's kind, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dolfin_types::DolfinError;
    use serde_json::json;

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path("app.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path("app.YAML"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path("app.yml"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path("app"), DocumentFormat::Json);
    }

    #[test]
    fn test_blank_document_is_empty_object() {
        assert_eq!(parse_document("", DocumentFormat::Json).unwrap(), json!({}));
        assert_eq!(parse_document("  \n", DocumentFormat::Yaml).unwrap(), json!({}));
    }

    #[test]
    fn test_parse_errors_surface_unmodified() {
        let err = parse_document("{\"foo\": ", DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, DolfinError::Json(_)));

        let err = parse_document("foo: [bar", DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, DolfinError::Yaml(_)));
    }

    #[test]
    fn test_yaml_parses_to_plain_value() {
        let value = parse_document("foo: bar\nnested:\n  n: 1\n", DocumentFormat::Yaml).unwrap();
        assert_eq!(value, json!({"foo": "bar", "nested": {"n": 1}}));
    }
}
