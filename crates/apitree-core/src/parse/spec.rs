use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::operation::PathItem;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Top-level OpenAPI 3.x document, typed view.
///
/// Reusable definitions under `components` are not modelled here: they are
/// only ever reached through `$ref` pointers, which resolve against the raw
/// document root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub info: Info,

    #[serde(
        default,
        deserialize_with = "lenient::extensible_map",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub paths: IndexMap<String, PathItem>,

    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<Tag>,
}
