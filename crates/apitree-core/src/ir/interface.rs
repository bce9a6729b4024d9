use serde::Serialize;

use super::field::{FieldNode, FieldType};
use crate::parse::operation::HttpMethod;

/// The input side of an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Params {
    /// Neither source produced anything usable.
    #[default]
    Empty,
    /// Deduplicated query/path parameters.
    Parameters(Vec<FieldNode>),
    /// The normalized request body schema.
    Body(FieldNode),
}

impl Params {
    pub fn as_parameters(&self) -> Option<&[FieldNode]> {
        match self {
            Params::Parameters(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_body(&self) -> Option<&FieldNode> {
        match self {
            Params::Body(node) => Some(node),
            _ => None,
        }
    }
}

/// The output side of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseType {
    Tree(FieldNode),
    Bare(FieldType),
}

impl Default for ResponseType {
    fn default() -> Self {
        ResponseType::Bare(FieldType::Unresolved)
    }
}

/// One normalized HTTP operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRecord {
    pub group_name: String,
    pub base_path: String,
    pub method: HttpMethod,
    pub path: String,
    pub path_name: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub params: Params,
    pub response: ResponseType,
    pub title: String,
    pub sub_title: String,
    pub key: String,
    /// Key of the group this record sits in; filled when grouping finishes.
    pub parent_key: String,
}
