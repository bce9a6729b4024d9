pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

use config::ParserConfig;
use ir::GroupRecord;
use parse::Document;

/// Trait for renderers that turn the grouped tree into text.
pub trait TreeRenderer {
    type Error: std::error::Error;
    fn render(&self, groups: &[GroupRecord]) -> Result<String, Self::Error>;
}

/// Normalize every operation of `doc` and group the records by tag.
pub fn build_tree(doc: &Document, config: &ParserConfig) -> Vec<GroupRecord> {
    transform::walk_document(doc, config)
}
