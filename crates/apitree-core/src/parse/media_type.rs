use serde::{Deserialize, Serialize};

use super::lenient;
use super::schema::SchemaOrRef;

/// A media type object. Only the schema matters for normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema: Option<SchemaOrRef>,
}
