use crate::config::ParserConfig;
use crate::ir::{GroupAccumulator, GroupRecord, InterfaceRecord, KeyGenerator, Params};
use crate::parse::Document;
use crate::parse::operation::{HttpMethod, Operation, PathItem};
use crate::parse::parameter::ParameterOrRef;
use crate::parse::request_body::RequestBodyOrRef;

use super::name_normalizer::{camel_name_by_kebab, file_name};
use super::normalizer::SchemaNormalizer;

/// Where an operation sits in the document.
#[derive(Debug, Clone, Copy)]
pub struct OperationSite<'s> {
    pub path: &'s str,
    pub method: HttpMethod,
    pub path_item: &'s PathItem,
    /// More than one method is declared on this path.
    pub shares_path: bool,
}

/// Walk every path and method of `doc` and group the resulting records by
/// tag.
pub fn walk_document(doc: &Document, config: &ParserConfig) -> Vec<GroupRecord> {
    let mut normalizer = SchemaNormalizer::new(doc.resolver(), config);
    let mut groups = GroupAccumulator::new(config.default_group.clone());

    for (path, path_item) in &doc.spec.paths {
        let operations = path_item.operations();
        let shares_path = operations.len() > 1;
        for (method, operation) in operations {
            let site = OperationSite {
                path,
                method,
                path_item,
                shares_path,
            };
            let record = walk_operation(&mut normalizer, groups.keys(), site, operation);
            groups.push(&operation.tags, record);
        }
    }

    groups.finish()
}

/// Build the record for one operation. `parent_key` stays empty until the
/// record is grouped.
pub fn walk_operation(
    normalizer: &mut SchemaNormalizer<'_>,
    keys: &mut KeyGenerator,
    site: OperationSite<'_>,
    operation: &Operation,
) -> InterfaceRecord {
    let file_name = file_name(site.path, site.method, site.shares_path);
    let path_name = camel_name_by_kebab(&file_name);
    let title = operation
        .description
        .clone()
        .or_else(|| operation.summary.clone())
        .unwrap_or_else(|| path_name.clone());

    let declared = declared_parameters(operation, site.path_item);
    let params = select_params(
        normalizer,
        site.method,
        declared.as_deref(),
        operation.request_body.as_ref(),
    );
    let response = normalizer.parse_response(&operation.responses);

    let key = keys.generate(&title, &format!("{} {}", site.method.as_str(), site.path));
    let config = normalizer.config;

    InterfaceRecord {
        group_name: config.title.clone(),
        base_path: config.base_path.clone(),
        method: site.method,
        path: site.path.to_string(),
        path_name,
        file_name,
        operation_id: operation.operation_id.clone(),
        params,
        response,
        title,
        sub_title: site.path.to_string(),
        key,
        parent_key: String::new(),
    }
}

/// Operation-level parameters followed by path-level ones, or `None` when
/// neither level declares any.
fn declared_parameters(operation: &Operation, path_item: &PathItem) -> Option<Vec<ParameterOrRef>> {
    match (&operation.parameters, path_item.parameters.is_empty()) {
        (None, true) => None,
        (None, false) => Some(path_item.parameters.clone()),
        (Some(own), _) => Some(own.iter().chain(&path_item.parameters).cloned().collect()),
    }
}

/// GET reads declared parameters first and falls back to the body; every
/// other method reads the body first.
fn select_params(
    normalizer: &mut SchemaNormalizer<'_>,
    method: HttpMethod,
    declared: Option<&[ParameterOrRef]>,
    body: Option<&RequestBodyOrRef>,
) -> Params {
    match (method.prefers_parameters(), declared, body) {
        (true, Some(parameters), _) | (false, Some(parameters), None) => {
            Params::Parameters(normalizer.parse_parameters(Some(parameters)))
        }
        (true, None, Some(body)) | (false, _, Some(body)) => normalizer
            .parse_request_body(Some(body))
            .map_or(Params::Empty, Params::Body),
        (_, None, None) => Params::Parameters(Vec::new()),
    }
}
