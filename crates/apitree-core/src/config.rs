use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Project configuration loaded from `.apitree.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApitreeConfig {
    pub input: String,
    pub parser: ParserConfig,
}

impl Default for ApitreeConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            parser: ParserConfig::default(),
        }
    }
}

/// Options that shape the normalized tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Source title, copied to every record's `groupName`.
    pub title: String,
    /// Copied to every record's `basePath`.
    pub base_path: String,
    /// Group for operations that declare no tags.
    pub default_group: String,
    /// Fold `allOf` branches into the fields of the composed object.
    pub compose_all_of: bool,
    /// Status code whose response describes the operation's result.
    pub response_status: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            base_path: String::new(),
            default_group: "default".to_string(),
            compose_all_of: true,
            response_status: "200".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apitree.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ApitreeConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: ApitreeConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apitree configuration
input: openapi.yaml

parser:
  title: ""                 # copied to every record's groupName
  base_path: ""             # copied to every record's basePath
  default_group: default    # group for operations without tags
  compose_all_of: true      # merge allOf branches into one field list
  response_status: "200"    # response used for the result type
"#
}
