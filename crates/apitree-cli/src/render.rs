use apitree_core::TreeRenderer;
use apitree_core::ir::GroupRecord;

/// Pretty-printed JSON, the shape downstream templates consume.
pub struct JsonRenderer;

impl TreeRenderer for JsonRenderer {
    type Error = serde_json::Error;

    fn render(&self, groups: &[GroupRecord]) -> Result<String, Self::Error> {
        let mut out = serde_json::to_string_pretty(groups)?;
        out.push('\n');
        Ok(out)
    }
}

pub struct YamlRenderer;

impl TreeRenderer for YamlRenderer {
    type Error = serde_yaml_ng::Error;

    fn render(&self, groups: &[GroupRecord]) -> Result<String, Self::Error> {
        serde_yaml_ng::to_string(groups)
    }
}
