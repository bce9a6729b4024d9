use super::normalizer::{SchemaItem, SchemaNormalizer};
use crate::ir::FieldNode;
use crate::parse::ref_resolve::Reference;
use crate::parse::request_body::RequestBodyOrRef;

impl SchemaNormalizer<'_> {
    /// Normalize the schema of the first media type in a request body.
    ///
    /// The first entry of `content` wins whatever its media type is, so a
    /// body listing `multipart/form-data` before `application/json` is read
    /// from the multipart schema.
    pub fn parse_request_body(&mut self, body: Option<&RequestBodyOrRef>) -> Option<FieldNode> {
        let Some(body) = self.resolver.dereference(body) else {
            log::warn!("parse_request_body: request body is absent.");
            return None;
        };

        let Some((media_type, content)) = body.content.first() else {
            log::warn!("parse_request_body: request body content is empty.");
            return None;
        };

        let Some(schema) = self.resolver.dereference(content.schema.as_ref()) else {
            log::warn!("parse_request_body: schema for {media_type} is absent.");
            return None;
        };

        let item = SchemaItem::named(schema.into_owned(), "", None);
        let reference = content.schema.as_ref().and_then(|s| s.ref_path());
        Some(self.guarded(reference, item, Self::dispatch))
    }
}
