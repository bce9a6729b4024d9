mod lenient;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod ref_resolve;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod spec;

use serde_json::Value;

use crate::error::ParseError;
use ref_resolve::PathResolver;
use spec::OpenApiSpec;

/// A loaded OpenAPI document: the raw tree `$ref` pointers resolve against,
/// and the typed view the walkers iterate.
#[derive(Debug, Clone)]
pub struct Document {
    pub root: Value,
    pub spec: OpenApiSpec,
}

impl Document {
    /// Build a document from an already-parsed JSON tree.
    pub fn from_value(root: Value) -> Result<Self, ParseError> {
        validate_version(&root)?;
        let spec: OpenApiSpec = serde_json::from_value(root.clone())?;
        Ok(Self { root, spec })
    }

    pub fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.root)
    }
}

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    let root: Value = serde_yaml_ng::from_str(input)?;
    Document::from_value(root)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    let root: Value = serde_json::from_str(input)?;
    Document::from_value(root)
}

fn validate_version(root: &Value) -> Result<(), ParseError> {
    let version = root
        .get("openapi")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField("openapi".to_string()))?;
    if !version.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_swagger_2() {
        let err = from_yaml("swagger: '2.0'\ninfo: {title: t, version: '1'}\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingField(f) if f == "openapi"));

        let err = from_yaml("openapi: 2.0.0\npaths: {}\n").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "2.0.0"));
    }

    #[test]
    fn test_json_and_yaml_agree() {
        let yaml = from_yaml("openapi: 3.0.3\ninfo:\n  title: T\n  version: '1'\npaths: {}\n")
            .unwrap();
        let json =
            from_json(r#"{"openapi":"3.0.3","info":{"title":"T","version":"1"},"paths":{}}"#)
                .unwrap();
        assert_eq!(yaml.root, json.root);
        assert_eq!(yaml.spec, json.spec);
    }

    #[test]
    fn test_keeps_path_order() {
        let doc = from_yaml(
            "openapi: 3.0.0\npaths:\n  /zebra: {}\n  /apple: {}\n  /mango: {}\n",
        )
        .unwrap();
        let paths: Vec<&str> = doc.spec.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, ["/zebra", "/apple", "/mango"]);
    }
}
