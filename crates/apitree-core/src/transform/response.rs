use indexmap::IndexMap;

use super::normalizer::{SchemaItem, SchemaNormalizer, SchemaShape};
use crate::ir::{FieldType, ResponseType};
use crate::parse::ref_resolve::Reference;
use crate::parse::response::ResponseOrRef;

impl SchemaNormalizer<'_> {
    /// Describe what an operation returns. Schemas without structure come
    /// back as their bare type; anything missing is `unresolved`.
    pub fn parse_response(&mut self, responses: &IndexMap<String, ResponseOrRef>) -> ResponseType {
        let Some(response) = self.pick_response(responses) else {
            log::debug!("parse_response: no success response declared.");
            return ResponseType::default();
        };
        let Some(response) = self.resolver.dereference(Some(response)) else {
            return ResponseType::default();
        };
        let Some((_, content)) = response.content.first() else {
            return ResponseType::default();
        };
        let Some(schema) = self.resolver.dereference(content.schema.as_ref()) else {
            log::warn!("parse_response: response schema is absent.");
            return ResponseType::default();
        };

        let structured = match SchemaShape::classify(&schema) {
            SchemaShape::Array | SchemaShape::Object => true,
            SchemaShape::Composition => self.config.compose_all_of && !schema.all_of.is_empty(),
            SchemaShape::Primitive => false,
        };
        if !structured {
            return ResponseType::Bare(FieldType::of(&schema));
        }

        let item = SchemaItem::named(schema.into_owned(), "", None);
        let reference = content.schema.as_ref().and_then(|s| s.ref_path());
        ResponseType::Tree(self.guarded(reference, item, Self::dispatch))
    }

    /// The configured status, else the first `2xx`, else `default`.
    fn pick_response<'r>(
        &self,
        responses: &'r IndexMap<String, ResponseOrRef>,
    ) -> Option<&'r ResponseOrRef> {
        responses
            .get(&self.config.response_status)
            .or_else(|| {
                responses
                    .iter()
                    .find(|(status, _)| status.starts_with('2'))
                    .map(|(_, response)| response)
            })
            .or_else(|| responses.get("default"))
    }
}
