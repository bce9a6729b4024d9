use std::collections::HashSet;

use indexmap::IndexMap;

use super::compose::merge_all_of;
use crate::config::ParserConfig;
use crate::ir::{FieldNode, FieldType, Members};
use crate::parse::ref_resolve::{PathResolver, Reference};
use crate::parse::schema::{Schema, SchemaOrRef};

/// The concrete shape a dereferenced schema takes. References never reach
/// this point: `SchemaOrRef` already separates them and the resolver
/// replaces them before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    Array,
    Object,
    /// `allOf`/`oneOf`/`anyOf` without direct properties.
    Composition,
    Primitive,
}

impl SchemaShape {
    pub fn classify(schema: &Schema) -> Self {
        if schema.is_array() {
            SchemaShape::Array
        } else if !schema.properties.is_empty() {
            SchemaShape::Object
        } else if schema.has_composition() {
            SchemaShape::Composition
        } else {
            SchemaShape::Primitive
        }
    }
}

/// A schema on its way to becoming a [`FieldNode`]: the schema itself plus
/// what is known about its place in the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaItem {
    pub name: String,
    /// Whether the parent lists `name` as required.
    pub required: bool,
    /// Required names governing this item's own children.
    pub items_required: Option<Vec<String>>,
    /// Element type, once an array's items have been looked at.
    pub items_type: Option<FieldType>,
    pub schema: Schema,
}

impl SchemaItem {
    /// Wrap `schema` as the child `name` of a parent whose required list is
    /// `parent_required`. The schema's own `required` list moves to
    /// `items_required`.
    pub fn named(mut schema: Schema, name: &str, parent_required: Option<&[String]>) -> Self {
        let own_required = std::mem::take(&mut schema.required);
        Self {
            name: name.to_string(),
            required: parent_required.is_some_and(|list| list.iter().any(|n| n == name)),
            items_required: (!own_required.is_empty()).then_some(own_required),
            items_type: None,
            schema,
        }
    }

    pub fn into_node(self, item: Option<Vec<FieldNode>>) -> FieldNode {
        FieldNode {
            field_type: FieldType::of(&self.schema),
            name: self.name,
            required: self.required,
            items_type: self.items_type,
            items_required: self.items_required,
            item,
            description: self.schema.description,
            tit_ref: self.schema.title,
            format: self.schema.format,
            enum_values: self.schema.enum_values,
        }
    }
}

/// Turns schemas of a loaded document into [`FieldNode`] trees.
///
/// References currently being expanded are tracked so that a schema which
/// contains itself, directly or through other schemas, ends in a leaf
/// instead of recursing forever.
pub struct SchemaNormalizer<'a> {
    pub(super) resolver: PathResolver<'a>,
    pub(super) config: &'a ParserConfig,
    expanding: HashSet<String>,
}

impl<'a> SchemaNormalizer<'a> {
    pub fn new(resolver: PathResolver<'a>, config: &'a ParserConfig) -> Self {
        Self {
            resolver,
            config,
            expanding: HashSet::new(),
        }
    }

    pub fn resolver(&self) -> PathResolver<'a> {
        self.resolver
    }

    /// Normalize an already dereferenced schema as the child `name` of a
    /// parent whose required list is `parent_required`.
    pub fn parse_schema_object(
        &mut self,
        schema: &Schema,
        name: &str,
        parent_required: Option<&[String]>,
    ) -> FieldNode {
        self.dispatch(SchemaItem::named(schema.clone(), name, parent_required))
    }

    pub(super) fn dispatch(&mut self, item: SchemaItem) -> FieldNode {
        match SchemaShape::classify(&item.schema) {
            SchemaShape::Array => self.parse_array(item),
            SchemaShape::Object | SchemaShape::Composition | SchemaShape::Primitive => {
                self.parse_object(item)
            }
        }
    }

    /// Run `parse` on `item` with `reference` marked as in progress. If the
    /// reference is already being expanded further up, `item` becomes a leaf.
    pub(super) fn guarded(
        &mut self,
        reference: Option<&str>,
        item: SchemaItem,
        parse: fn(&mut Self, SchemaItem) -> FieldNode,
    ) -> FieldNode {
        let Some(reference) = reference else {
            return parse(self, item);
        };
        if !self.expanding.insert(reference.to_string()) {
            log::debug!("{reference} refers back to itself, leaving {:?} unexpanded", item.name);
            return item.into_node(None);
        }
        let node = parse(self, item);
        self.expanding.remove(reference);
        node
    }

    /// Normalize an array. The element schema takes over the node: its
    /// fields are spread onto an item that keeps the array's name, and its
    /// type becomes `items_type`.
    pub fn parse_array(&mut self, array: SchemaItem) -> FieldNode {
        let items_ref = array.schema.items.as_deref();
        let mut element: Schema = self
            .resolver
            .dereference(items_ref)
            .map(|s| s.into_owned())
            .unwrap_or_default();

        let items_type = FieldType::of(&element);
        let element_required = std::mem::take(&mut element.required);
        let description = element
            .description
            .take()
            .or_else(|| array.schema.description.clone());

        let mut next = SchemaItem {
            name: array.name.clone(),
            required: array.required,
            items_required: None,
            items_type: Some(items_type),
            schema: Schema {
                schema_type: array.schema.schema_type.clone(),
                description,
                ..element
            },
        };

        // Malformed input: nothing marks this as an array, stop here.
        if array.schema.schema_type.is_none() {
            return next.into_node(None);
        }

        next.items_required = if element_required.is_empty() {
            array.items_required.clone()
        } else {
            Some(element_required)
        };

        let reference = items_ref.and_then(|r| r.ref_path());
        if items_type == FieldType::Array {
            self.guarded(reference, next, Self::parse_array)
        } else {
            self.guarded(reference, next, Self::parse_object)
        }
    }

    /// Normalize an object or leaf. Direct properties become `item`; `allOf`
    /// branches are folded in after them when composition is enabled.
    pub fn parse_object(&mut self, object: SchemaItem) -> FieldNode {
        let mut members = None;
        if !object.schema.properties.is_empty() {
            members = Some(Members::Fields(self.parse_properties(
                &object.schema.properties,
                object.items_required.as_deref(),
            )));
        }

        if !object.schema.all_of.is_empty() && self.config.compose_all_of {
            let composed = self.compose_all_of(&object.schema.all_of);
            members = merge_all_of(members, composed);
        }
        if !object.schema.one_of.is_empty() || !object.schema.any_of.is_empty() {
            log::debug!("union composition on {:?} is not expanded", object.name);
        }

        match members {
            Some(Members::Fields(mut fields)) => {
                if let Some(required) = &object.items_required {
                    for field in &mut fields {
                        field.required |= required.contains(&field.name);
                    }
                }
                let mut node = object.into_node(Some(fields));
                // Children make it structured whatever `type` said.
                if node.field_type.is_primitive() {
                    node.field_type = FieldType::Object;
                }
                node
            }
            Some(Members::Bare(bare)) => {
                let mut node = object.into_node(None);
                if node.field_type == FieldType::Unresolved {
                    node.field_type = bare;
                }
                node
            }
            None => object.into_node(None),
        }
    }

    /// Normalize each property in declaration order. Properties whose
    /// reference cannot be resolved are skipped.
    pub fn parse_properties(
        &mut self,
        properties: &IndexMap<String, SchemaOrRef>,
        required: Option<&[String]>,
    ) -> Vec<FieldNode> {
        let mut fields = Vec::with_capacity(properties.len());
        for (name, property) in properties {
            let Some(schema) = self.resolver.dereference(Some(property)) else {
                continue;
            };
            let item = SchemaItem::named(schema.into_owned(), name, required);
            fields.push(self.guarded(property.ref_path(), item, Self::dispatch));
        }
        fields
    }
}
