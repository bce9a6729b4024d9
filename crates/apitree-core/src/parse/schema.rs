use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    /// Anything else a generator decided to put there (`file`, typos, ...).
    #[serde(other)]
    Unknown,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    /// The type the schema is primarily about: the single type, or the first
    /// non-null entry of a type list.
    pub fn primary(&self) -> SchemaType {
        match self {
            TypeSet::Single(t) => *t,
            TypeSet::Multiple(types) => types
                .iter()
                .copied()
                .find(|t| *t != SchemaType::Null)
                .unwrap_or(SchemaType::Null),
        }
    }
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// What may stand where a schema is expected. OpenAPI 3.1 also allows the
/// boolean schemas `true` (anything) and `false` (nothing).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
    Boolean(bool),
}

impl<'de> Deserialize<'de> for SchemaOrRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawSchemaOrRef::deserialize(deserializer)? {
            RawSchemaOrRef::Ref { ref_path } => SchemaOrRef::Ref { ref_path },
            RawSchemaOrRef::Schema(schema) => SchemaOrRef::Schema(schema),
            // Neither carries a type; both read as an untyped leaf.
            RawSchemaOrRef::Boolean(_) => SchemaOrRef::Schema(Box::default()),
        })
    }
}

/// The subset of a JSON Schema object the normalizer reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Object properties
    #[serde(
        default,
        deserialize_with = "lenient::map",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(
        default,
        deserialize_with = "lenient_required",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub required: Vec<String>,

    // Array items
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Box<SchemaOrRef>>,

    // Composition
    #[serde(
        rename = "allOf",
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(
        rename = "oneOf",
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(
        rename = "anyOf",
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub any_of: Vec<SchemaOrRef>,

    // Enum values
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl Schema {
    pub fn primary_type(&self) -> Option<SchemaType> {
        self.schema_type.as_ref().map(TypeSet::primary)
    }

    pub fn is_array(&self) -> bool {
        self.primary_type() == Some(SchemaType::Array)
    }

    pub fn has_composition(&self) -> bool {
        !self.all_of.is_empty() || !self.one_of.is_empty() || !self.any_of.is_empty()
    }
}

/// Swagger 2 style documents put `required: true` on properties. Treat any
/// non-list value as "no required names" rather than rejecting the document.
fn lenient_required<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(names) => names
            .into_iter()
            .filter_map(|n| n.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    })
}
