use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::Serialize;

use super::interface::InterfaceRecord;

/// A tag-named bucket of interface records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub title: String,
    pub key: String,
    pub children: Vec<InterfaceRecord>,
}

/// Hands out `<label>-<6 hex>` keys that are unique within one walk.
#[derive(Debug, Default)]
pub struct KeyGenerator {
    used: HashSet<String>,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a key from `seed`; the same seed yields the same key until it
    /// is taken, after which a salted variant is used.
    pub fn generate(&mut self, label: &str, seed: &str) -> String {
        let mut salt: u32 = 0;
        loop {
            let mut hasher = DefaultHasher::new();
            seed.hash(&mut hasher);
            salt.hash(&mut hasher);
            let key = format!("{label}-{:06x}", hasher.finish() & 0xff_ffff);
            if self.used.insert(key.clone()) {
                return key;
            }
            salt += 1;
        }
    }
}

/// Collects records by tag during one document walk and turns them into
/// ordered group records. Groups appear in first-seen order.
#[derive(Debug)]
pub struct GroupAccumulator {
    default_group: String,
    groups: IndexMap<String, Vec<InterfaceRecord>>,
    keys: KeyGenerator,
}

impl GroupAccumulator {
    pub fn new(default_group: impl Into<String>) -> Self {
        Self {
            default_group: default_group.into(),
            groups: IndexMap::new(),
            keys: KeyGenerator::new(),
        }
    }

    pub fn keys(&mut self) -> &mut KeyGenerator {
        &mut self.keys
    }

    /// File `record` under each of `tags`, or the default group when there
    /// are none. Copies placed in additional groups get their own key.
    pub fn push(&mut self, tags: &[String], record: InterfaceRecord) {
        let Some((first, rest)) = tags.split_first() else {
            let group = self.default_group.clone();
            self.groups.entry(group).or_default().push(record);
            return;
        };

        let copies: Vec<InterfaceRecord> = rest
            .iter()
            .map(|tag| {
                let mut copy = record.clone();
                copy.key = self
                    .keys
                    .generate(&copy.title, &format!("{}|{tag}", record.key));
                copy
            })
            .collect();

        self.groups.entry(first.clone()).or_default().push(record);
        for (tag, copy) in rest.iter().zip(copies) {
            self.groups.entry(tag.clone()).or_default().push(copy);
        }
    }

    pub fn finish(mut self) -> Vec<GroupRecord> {
        let groups = std::mem::take(&mut self.groups);
        groups
            .into_iter()
            .map(|(title, mut children)| {
                let key = self.keys.generate(&title, &format!("group|{title}"));
                for child in &mut children {
                    child.parent_key = key.clone();
                }
                GroupRecord {
                    title,
                    key,
                    children,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Params, ResponseType};
    use crate::parse::operation::HttpMethod;

    fn record(title: &str, key: &str) -> InterfaceRecord {
        InterfaceRecord {
            group_name: String::new(),
            base_path: String::new(),
            method: HttpMethod::Get,
            path: "/x".into(),
            path_name: "x".into(),
            file_name: "x".into(),
            operation_id: None,
            params: Params::Empty,
            response: ResponseType::default(),
            title: title.into(),
            sub_title: "/x".into(),
            key: key.into(),
            parent_key: String::new(),
        }
    }

    #[test]
    fn test_keys_are_unique_and_labelled() {
        let mut keys = KeyGenerator::new();
        let a = keys.generate("list", "GET /pets");
        let b = keys.generate("list", "GET /pets");
        assert_ne!(a, b);
        assert!(a.starts_with("list-"));
        assert_eq!(a.len(), "list-".len() + 6);
    }

    #[test]
    fn test_untagged_records_use_default_group() {
        let mut acc = GroupAccumulator::new("default");
        acc.push(&[], record("a", "a-1"));
        let groups = acc.finish();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "default");
        assert_eq!(groups[0].children[0].parent_key, groups[0].key);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let mut acc = GroupAccumulator::new("default");
        acc.push(&["pets".into()], record("a", "a-1"));
        acc.push(&["store".into()], record("b", "b-1"));
        acc.push(&["pets".into()], record("c", "c-1"));
        let groups = acc.finish();
        let titles: Vec<&str> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["pets", "store"]);
        assert_eq!(groups[0].children.len(), 2);
    }

    #[test]
    fn test_multi_tag_record_lands_in_each_group() {
        let mut acc = GroupAccumulator::new("default");
        acc.push(&["pets".into(), "admin".into()], record("a", "a-1"));
        let groups = acc.finish();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title, "pets");
        assert_eq!(groups[1].title, "admin");
        assert_eq!(groups[0].children[0].key, "a-1");
        assert_ne!(groups[1].children[0].key, "a-1");
        assert_ne!(groups[0].key, groups[1].key);
    }
}
