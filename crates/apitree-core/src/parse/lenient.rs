//! `deserialize_with` helpers that drop unusable nodes instead of failing the
//! whole document. Each field is read as raw JSON first and converted one
//! entry at a time; entries that don't fit are logged and skipped.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn convert<T: DeserializeOwned>(value: &Value, at: &str) -> Option<T> {
    match T::deserialize(value) {
        Ok(node) => Some(node),
        Err(err) => {
            log::warn!("skipping unusable node at {at}: {err}");
            None
        }
    }
}

/// An optional node; a malformed one reads as absent.
pub(crate) fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| convert(&v, "optional field")))
}

/// A required-looking node that falls back to its default when malformed.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(option(deserializer)?.unwrap_or_default())
}

/// A list whose malformed entries are dropped. A non-list reads as empty.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(option_list(deserializer)?.unwrap_or_default())
}

/// Like [`list`], but keeps "not declared" apart from "declared empty".
pub(crate) fn option_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            log::warn!("expected a list, found {other}");
            return Ok(Some(Vec::new()));
        }
    };
    Ok(Some(
        entries
            .iter()
            .enumerate()
            .filter_map(|(i, v)| convert(v, &format!("[{i}]")))
            .collect(),
    ))
}

/// A keyed mapping whose malformed values are dropped, in document order.
pub(crate) fn map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    entries(deserializer, false)
}

/// Like [`map`], for objects that allow `x-` extension keys next to their
/// entries (paths, responses, content). Extensions are ignored.
pub(crate) fn extensible_map<'de, D, T>(
    deserializer: D,
) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    entries(deserializer, true)
}

fn entries<'de, D, T>(
    deserializer: D,
    skip_extensions: bool,
) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        None => return Ok(IndexMap::new()),
        Some(Value::Object(raw)) => raw,
        Some(other) => {
            log::warn!("expected a mapping, found {other}");
            return Ok(IndexMap::new());
        }
    };
    Ok(raw
        .iter()
        .filter(|(key, _)| !(skip_extensions && key.starts_with("x-")))
        .filter_map(|(key, value)| convert(value, key).map(|node| (key.clone(), node)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "option")]
        one: Option<u32>,
        #[serde(default, deserialize_with = "list")]
        many: Vec<u32>,
        #[serde(default, deserialize_with = "option_list")]
        maybe: Option<Vec<u32>>,
        #[serde(default, deserialize_with = "extensible_map")]
        keyed: IndexMap<String, u32>,
    }

    #[test]
    fn test_bad_entries_are_dropped() {
        let h: Holder = serde_json::from_str(
            r#"{"one": "x", "many": [1, "two", 3], "keyed": {"b": 2, "a": "no", "x-note": 9, "c": 1}}"#,
        )
        .unwrap();
        assert_eq!(h.one, None);
        assert_eq!(h.many, [1, 3]);
        assert_eq!(h.maybe, None);
        assert_eq!(h.keyed.keys().collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn test_wrong_container_reads_as_empty() {
        let h: Holder =
            serde_json::from_str(r#"{"one": 4, "many": 7, "maybe": {}, "keyed": []}"#).unwrap();
        assert_eq!(h.one, Some(4));
        assert!(h.many.is_empty());
        assert_eq!(h.maybe, Some(Vec::new()));
        assert!(h.keyed.is_empty());
    }
}
