pub mod compose;
pub mod name_normalizer;
pub mod normalizer;
pub mod parameters;
pub mod request_body;
pub mod response;
pub mod walker;

pub use compose::merge_all_of;
pub use normalizer::{SchemaItem, SchemaNormalizer, SchemaShape};
pub use walker::{OperationSite, walk_document, walk_operation};
