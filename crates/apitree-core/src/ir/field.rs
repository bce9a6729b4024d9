use serde::Serialize;

use crate::parse::schema::{Schema, SchemaType};

/// The type tag carried by a normalized field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    /// No usable `type` keyword on the source schema.
    #[default]
    Unresolved,
}

impl FieldType {
    pub fn of(schema: &Schema) -> Self {
        schema.primary_type().into()
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, FieldType::Array | FieldType::Object)
    }
}

impl From<Option<SchemaType>> for FieldType {
    fn from(t: Option<SchemaType>) -> Self {
        match t {
            Some(SchemaType::String) => FieldType::String,
            Some(SchemaType::Number) => FieldType::Number,
            Some(SchemaType::Integer) => FieldType::Integer,
            Some(SchemaType::Boolean) => FieldType::Boolean,
            Some(SchemaType::Array) => FieldType::Array,
            Some(SchemaType::Object) => FieldType::Object,
            Some(SchemaType::Null) => FieldType::Null,
            Some(SchemaType::Unknown) | None => FieldType::Unresolved,
        }
    }
}

/// Canonical normalized form of one schema or property.
///
/// `required` describes the relationship with the parent: it is true when the
/// parent lists this field's name as required. `items_required` is the list
/// that governs this node's own children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    pub name: String,

    pub required: bool,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Element type, set on array nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_type: Option<FieldType>,

    #[serde(
        rename = "itemsRequiredNamesList",
        skip_serializing_if = "Option::is_none"
    )]
    pub items_required: Option<Vec<String>>,

    /// Child fields; `None` for leaves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Vec<FieldNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The source schema's `title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tit_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
}

impl FieldNode {
    pub fn is_leaf(&self) -> bool {
        self.item.is_none()
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&FieldNode> {
        self.item.as_ref()?.iter().find(|f| f.name == name)
    }
}

/// What a composition branch contributes: structured fields, or just a bare
/// type when the branch has no children.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Members {
    Fields(Vec<FieldNode>),
    Bare(FieldType),
}

impl From<FieldNode> for Members {
    fn from(node: FieldNode) -> Self {
        match node.item {
            Some(fields) => Members::Fields(fields),
            None => Members::Bare(node.field_type),
        }
    }
}
