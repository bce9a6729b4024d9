use std::borrow::Cow;
use std::collections::HashSet;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::parameter::{Parameter, ParameterOrRef};
use super::request_body::{RequestBody, RequestBodyOrRef};
use super::response::{Response, ResponseOrRef};
use super::schema::{Schema, SchemaOrRef};
use crate::error::ResolveError;

/// A node that is either inline or a `$ref` pointer to one.
pub trait Reference: DeserializeOwned + Clone {
    type Target: Clone;

    /// The inline node, or the pointer it carries.
    fn as_inline(&self) -> Result<&Self::Target, &str>;

    fn into_inline(self) -> Result<Self::Target, String>;

    fn ref_path(&self) -> Option<&str> {
        self.as_inline().err()
    }
}

impl Reference for SchemaOrRef {
    type Target = Schema;

    fn as_inline(&self) -> Result<&Schema, &str> {
        match self {
            SchemaOrRef::Schema(schema) => Ok(schema.as_ref()),
            SchemaOrRef::Ref { ref_path } => Err(ref_path.as_str()),
        }
    }

    fn into_inline(self) -> Result<Schema, String> {
        match self {
            SchemaOrRef::Schema(schema) => Ok(*schema),
            SchemaOrRef::Ref { ref_path } => Err(ref_path),
        }
    }
}

macro_rules! impl_reference {
    ($or_ref:ident, $variant:ident, $target:ty) => {
        impl Reference for $or_ref {
            type Target = $target;

            fn as_inline(&self) -> Result<&$target, &str> {
                match self {
                    $or_ref::$variant(inner) => Ok(inner),
                    $or_ref::Ref { ref_path } => Err(ref_path.as_str()),
                }
            }

            fn into_inline(self) -> Result<$target, String> {
                match self {
                    $or_ref::$variant(inner) => Ok(inner),
                    $or_ref::Ref { ref_path } => Err(ref_path),
                }
            }
        }
    };
}

impl_reference!(ParameterOrRef, Parameter, Parameter);
impl_reference!(RequestBodyOrRef, RequestBody, RequestBody);
impl_reference!(ResponseOrRef, Response, Response);

/// Resolves `$ref` pointers of the form `#/a/b/c` against a document root.
///
/// Lookups never mutate the document; resolved nodes are deserialized into
/// fresh values.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    root: &'a Value,
}

impl<'a> PathResolver<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Tolerant lookup: any failure is reported as absence.
    pub fn lookup(&self, reference: &str) -> Option<&'a Value> {
        self.lookup_strict(reference).ok()
    }

    /// Strict lookup: a missing key or a non-local reference is an error.
    pub fn lookup_strict(&self, reference: &str) -> Result<&'a Value, ResolveError> {
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| ResolveError::InvalidRefFormat(reference.to_string()))?;

        let mut node = self.root;
        for segment in pointer_segments(pointer) {
            let next = match node {
                Value::Object(map) => map.get(&segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            node = next.ok_or_else(|| ResolveError::RefTargetNotFound(reference.to_string()))?;
        }
        Ok(node)
    }

    /// Resolve one pointer into a typed node. The result may itself be a
    /// reference.
    pub fn resolve_ref<T: DeserializeOwned>(&self, reference: &str) -> Option<T> {
        let value = match self.lookup_strict(reference) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("{err}");
                return None;
            }
        };
        match T::deserialize(value) {
            Ok(node) => Some(node),
            Err(err) => {
                log::warn!("reference {reference} points at an unusable node: {err}");
                None
            }
        }
    }

    /// Single hop: inline nodes are returned as-is, references are replaced
    /// by whatever they point at.
    pub fn dereference_once<'n, R: Reference>(&self, node: Option<&'n R>) -> Option<Cow<'n, R>> {
        let node = node?;
        match node.ref_path() {
            None => Some(Cow::Borrowed(node)),
            Some(reference) => self.resolve_ref::<R>(reference).map(Cow::Owned),
        }
    }

    /// Follow references until an inline node is reached. A chain that comes
    /// back to a pointer it already visited resolves to nothing.
    pub fn dereference<'n, R: Reference>(&self, node: Option<&'n R>) -> Option<Cow<'n, R::Target>> {
        let mut reference = match node?.as_inline() {
            Ok(inline) => return Some(Cow::Borrowed(inline)),
            Err(reference) => reference.to_string(),
        };

        let mut visited = HashSet::new();
        loop {
            if !visited.insert(reference.clone()) {
                log::warn!("circular $ref chain through {reference}");
                return None;
            }
            match self.resolve_ref::<R>(&reference)?.into_inline() {
                Ok(inline) => return Some(Cow::Owned(inline)),
                Err(next) => reference = next,
            }
        }
    }
}

/// Split a JSON pointer (without its leading `#`) into decoded keys.
/// `a/b[0]/c` yields `a`, `b`, `0`, `c`.
fn pointer_segments(pointer: &str) -> Vec<String> {
    let pointer = pointer.strip_prefix('/').unwrap_or(pointer);
    if pointer.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for raw in pointer.split('/') {
        let (head, indices) = split_indices(raw);
        if !head.is_empty() || indices.is_empty() {
            segments.push(decode_pointer_segment(head));
        }
        segments.extend(indices);
    }
    segments
}

/// Peel trailing `[n]` index suffixes off a segment.
fn split_indices(raw: &str) -> (&str, Vec<String>) {
    let mut rest = raw;
    let mut indices = Vec::new();
    while let Some(stripped) = rest.strip_suffix(']') {
        let Some(open) = stripped.rfind('[') else {
            break;
        };
        let inner = &stripped[open + 1..];
        if inner.is_empty() || !inner.chars().all(|c| c.is_alphanumeric() || c == '_') {
            break;
        }
        indices.push(inner.to_string());
        rest = &stripped[..open];
    }
    indices.reverse();
    (rest, indices)
}

fn decode_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "components": {
                "schemas": {
                    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
                    "Alias": { "$ref": "#/components/schemas/Pet" },
                    "AliasOfAlias": { "$ref": "#/components/schemas/Alias" },
                    "LoopA": { "$ref": "#/components/schemas/LoopB" },
                    "LoopB": { "$ref": "#/components/schemas/LoopA" },
                    "a/b": { "type": "integer" }
                },
                "parameters": {
                    "Limit": { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                }
            },
            "servers": [ { "url": "https://one" }, { "url": "https://two" } ]
        })
    }

    #[test]
    fn test_inline_schema_is_identity() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        let inline = SchemaOrRef::Schema(Box::new(Schema {
            description: Some("inline".into()),
            ..Default::default()
        }));
        let once = resolver.dereference_once(Some(&inline)).unwrap();
        assert!(matches!(once, Cow::Borrowed(_)));
        assert_eq!(*once, inline);

        let deep = resolver.dereference(Some(&inline)).unwrap();
        assert_eq!(deep.description.as_deref(), Some("inline"));
    }

    #[test]
    fn test_absent_node_propagates() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        assert!(resolver.dereference::<SchemaOrRef>(None).is_none());
        assert!(resolver.dereference_once::<SchemaOrRef>(None).is_none());
    }

    #[test]
    fn test_resolves_ref() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        let r = SchemaOrRef::Ref {
            ref_path: "#/components/schemas/Pet".into(),
        };
        let pet = resolver.dereference(Some(&r)).unwrap();
        assert!(pet.properties.contains_key("name"));
    }

    #[test]
    fn test_unresolvable_ref_is_none() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        let r = SchemaOrRef::Ref {
            ref_path: "#/components/schemas/Missing".into(),
        };
        assert!(resolver.dereference(Some(&r)).is_none());
        assert!(resolver.dereference_once(Some(&r)).is_none());
    }

    #[test]
    fn test_single_hop_stops_at_next_ref() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        let r = SchemaOrRef::Ref {
            ref_path: "#/components/schemas/AliasOfAlias".into(),
        };
        let once = resolver.dereference_once(Some(&r)).unwrap();
        assert_eq!(once.ref_path(), Some("#/components/schemas/Alias"));

        let deep = resolver.dereference(Some(&r)).unwrap();
        assert!(deep.properties.contains_key("name"));
    }

    #[test]
    fn test_circular_chain_is_none() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        let r = SchemaOrRef::Ref {
            ref_path: "#/components/schemas/LoopA".into(),
        };
        assert!(resolver.dereference(Some(&r)).is_none());
    }

    #[test]
    fn test_parameter_ref() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        let r = ParameterOrRef::Ref {
            ref_path: "#/components/parameters/Limit".into(),
        };
        let p = resolver.dereference(Some(&r)).unwrap();
        assert_eq!(p.name, "limit");
    }

    #[test]
    fn test_strict_lookup_errors() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        assert!(matches!(
            resolver.lookup_strict("#/components/nothing"),
            Err(ResolveError::RefTargetNotFound(_))
        ));
        assert!(matches!(
            resolver.lookup_strict("other.yaml#/Pet"),
            Err(ResolveError::InvalidRefFormat(_))
        ));
        assert!(resolver.lookup("#/components/nothing").is_none());
        assert!(resolver.lookup("other.yaml#/Pet").is_none());
    }

    #[test]
    fn test_array_indexing() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        assert_eq!(resolver.lookup("#/servers/1/url"), Some(&json!("https://two")));
        assert_eq!(resolver.lookup("#/servers[0]/url"), Some(&json!("https://one")));
        assert!(resolver.lookup("#/servers/7").is_none());
    }

    #[test]
    fn test_escaped_segments() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        assert_eq!(
            resolver.lookup("#/components/schemas/a~1b/type"),
            Some(&json!("integer"))
        );
    }

    #[test]
    fn test_root_pointer() {
        let root = doc();
        let resolver = PathResolver::new(&root);
        assert_eq!(resolver.lookup("#"), Some(&root));
        assert_eq!(resolver.lookup("#/"), Some(&root));
    }

    #[test]
    fn test_pointer_segments() {
        assert_eq!(pointer_segments("/a/b[0][1]/c"), ["a", "b", "0", "1", "c"]);
        assert_eq!(pointer_segments("/odd[x-y]"), ["odd[x-y]"]);
    }
}
