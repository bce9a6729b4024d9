use indexmap::IndexMap;

use super::normalizer::{SchemaItem, SchemaNormalizer};
use crate::ir::FieldNode;
use crate::parse::parameter::ParameterOrRef;
use crate::parse::ref_resolve::Reference;

impl SchemaNormalizer<'_> {
    /// Collect query/path/cookie parameters into field nodes.
    ///
    /// Header parameters are dropped. Names are deduplicated first-seen-wins,
    /// which covers generators that emit the same parameter twice.
    pub fn parse_parameters(&mut self, parameters: Option<&[ParameterOrRef]>) -> Vec<FieldNode> {
        let Some(parameters) = parameters else {
            log::warn!("parse_parameters: parameters is absent.");
            return Vec::new();
        };

        let mut collected: IndexMap<String, FieldNode> = IndexMap::new();
        for entry in parameters {
            let Some(param) = self.resolver.dereference(Some(entry)) else {
                continue;
            };
            if param.is_header() {
                log::debug!("parse_parameters: skipping header parameter {:?}", param.name);
                continue;
            }
            if collected.contains_key(&param.name) {
                log::debug!("parse_parameters: dropping duplicate parameter {:?}", param.name);
                continue;
            }

            let mut schema = self
                .resolver
                .dereference(param.schema.as_ref())
                .map(|s| s.into_owned())
                .unwrap_or_default();
            if schema.description.is_none() {
                schema.description = param.description.clone();
            }

            let mut item = SchemaItem::named(schema, &param.name, None);
            item.required = param.required;

            let reference = param.schema.as_ref().and_then(|s| s.ref_path());
            let node = self.guarded(reference, item, Self::dispatch);
            collected.insert(param.name.clone(), node);
        }

        collected.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::config::ParserConfig;
    use crate::ir::FieldType;
    use crate::parse::ref_resolve::PathResolver;

    const DOC: &str = r##"
components:
  parameters:
    Limit:
      name: limit
      in: query
      description: page size
      schema:
        type: integer
  schemas:
    Ids:
      type: array
      items:
        type: string
"##;

    fn params(yaml: &str) -> Vec<ParameterOrRef> {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_collects_dedupes_and_skips_headers() {
        let root: Value = serde_yaml_ng::from_str(DOC).unwrap();
        let config = ParserConfig::default();
        let mut n = SchemaNormalizer::new(PathResolver::new(&root), &config);
        let list = params(
            r##"
- name: id
  in: path
  required: true
  schema: {type: integer}
- name: id
  in: query
  schema: {type: string}
- name: X-Trace
  in: header
  schema: {type: string}
- $ref: '#/components/parameters/Limit'
- name: ids
  in: query
  required: true
  schema:
    $ref: '#/components/schemas/Ids'
- name: filter
  in: query
  schema:
    type: object
    required: [field]
    properties:
      field: {type: string}
      op: {type: string}
- $ref: '#/components/parameters/Missing'
"##,
        );

        let fields = n.parse_parameters(Some(&list));
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "limit", "ids", "filter"]);

        assert_eq!(fields[0].field_type, FieldType::Integer);
        assert!(fields[0].required);

        assert!(!fields[1].required);
        assert_eq!(fields[1].description.as_deref(), Some("page size"));

        assert_eq!(fields[2].field_type, FieldType::Array);
        assert_eq!(fields[2].items_type, Some(FieldType::String));
        assert!(fields[2].required);

        assert!(fields[3].child("field").unwrap().required);
        assert!(!fields[3].child("op").unwrap().required);
    }

    #[test]
    fn test_headers_never_appear() {
        let root = Value::Null;
        let config = ParserConfig::default();
        let mut n = SchemaNormalizer::new(PathResolver::new(&root), &config);
        let list = params(
            r#"
- {name: Authorization, in: header, required: true}
- {name: X-Request-Id, in: header}
- {name: Accept-Language, in: header}
"#,
        );
        assert!(n.parse_parameters(Some(&list)).is_empty());
    }

    #[test]
    fn test_missing_schema_defaults_to_empty() {
        let root = Value::Null;
        let config = ParserConfig::default();
        let mut n = SchemaNormalizer::new(PathResolver::new(&root), &config);
        let list = params("- {name: q, in: query, description: search text}\n");
        let fields = n.parse_parameters(Some(&list));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Unresolved);
        assert_eq!(fields[0].description.as_deref(), Some("search text"));
        assert!(fields[0].is_leaf());
    }

    #[test]
    fn test_absent_list_is_empty() {
        let root = Value::Null;
        let config = ParserConfig::default();
        let mut n = SchemaNormalizer::new(PathResolver::new(&root), &config);
        assert!(n.parse_parameters(None).is_empty());
    }
}
