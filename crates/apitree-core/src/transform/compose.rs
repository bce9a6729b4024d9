use indexmap::IndexMap;

use super::normalizer::{SchemaItem, SchemaNormalizer};
use crate::ir::{FieldNode, Members};
use crate::parse::ref_resolve::Reference;
use crate::parse::schema::SchemaOrRef;

/// Merge two branch results keyed by field name. On collision the entry
/// from `a` is kept; order is first-encounter order. A bare type carries no
/// fields, so merging with one yields the other side unchanged.
pub fn merge_all_of(a: Option<Members>, b: Option<Members>) -> Option<Members> {
    match (a, b) {
        (None | Some(Members::Bare(_)), b) => b,
        (a, None | Some(Members::Bare(_))) => a,
        (Some(Members::Fields(a)), Some(Members::Fields(b))) => {
            let mut merged: IndexMap<String, FieldNode> = IndexMap::new();
            for field in a.into_iter().chain(b) {
                merged.entry(field.name.clone()).or_insert(field);
            }
            Some(Members::Fields(merged.into_values().collect()))
        }
    }
}

impl SchemaNormalizer<'_> {
    /// Normalize every `allOf` branch and fold the results left to right.
    pub fn compose_all_of(&mut self, branches: &[SchemaOrRef]) -> Option<Members> {
        let mut merged = None;
        for branch in branches {
            let Some(schema) = self.resolver.dereference(Some(branch)) else {
                log::warn!("compose_all_of: branch {:?} could not be resolved.", branch.ref_path());
                continue;
            };
            let item = SchemaItem::named(schema.into_owned(), "", None);
            let node = self.guarded(branch.ref_path(), item, Self::dispatch);
            merged = merge_all_of(merged, Some(Members::from(node)));
        }
        merged
    }
}
