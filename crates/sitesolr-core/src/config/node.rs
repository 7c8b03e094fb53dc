use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Result, SiteSolrError};

/// One node of the configuration tree.
///
/// The host's raw representation disambiguates "subtree at key K" from "leaf
/// at key K" by suffixing non-leaf keys with a trailing dot; both forms can
/// exist at the same conceptual path. In memory the marker is gone: a node
/// carries an optional leaf value and an ordered child map side by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigNode {
    value: Option<Value>,
    children: IndexMap<String, ConfigNode>,
}

impl ConfigNode {
    /// A node holding only a leaf value.
    pub fn leaf(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            children: IndexMap::new(),
        }
    }

    /// Build a tree from the host's raw nested value. Object keys carrying
    /// the trailing-dot marker are stripped and merged into the same child
    /// as their unsuffixed sibling, so `"index"` and `"index."` end up as
    /// one node with both a value and children.
    pub fn from_value(raw: Value) -> Self {
        match raw {
            Value::Object(map) => {
                let mut node = ConfigNode::default();
                for (key, val) in map {
                    let (stem, is_marked_branch) = match key.strip_suffix('.') {
                        Some(stem) => (stem.to_string(), true),
                        None => (key, false),
                    };
                    let parsed = if is_marked_branch || val.is_object() {
                        Self::from_value(val)
                    } else {
                        Self::leaf(val)
                    };
                    match node.children.entry(stem) {
                        Entry::Occupied(mut entry) => entry.get_mut().absorb(parsed),
                        Entry::Vacant(entry) => {
                            entry.insert(parsed);
                        }
                    }
                }
                node
            }
            other => Self::leaf(other),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(value))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let value: toml::Value =
            toml::from_str(raw).map_err(|e| SiteSolrError::Parse(e.to_string()))?;
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    /// The leaf value stored at this node, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = Some(value.into());
    }

    /// True when this node carries a subtree.
    pub fn is_branch(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut ConfigNode> {
        self.children.get_mut(name)
    }

    /// The child named `name`, created empty if absent.
    pub fn child_or_default(&mut self, name: &str) -> &mut ConfigNode {
        self.children.entry(name.to_string()).or_default()
    }

    pub fn insert_child(&mut self, name: impl Into<String>, child: ConfigNode) {
        self.children.insert(name.into(), child);
    }

    pub fn remove_child(&mut self, name: &str) -> Option<ConfigNode> {
        self.children.shift_remove(name)
    }

    /// Child entries in source order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Deep-merge `other` into this node. The override wins on leaf
    /// conflicts; nested mappings combine recursively.
    pub fn merge_from(&mut self, other: &ConfigNode) {
        self.absorb(other.clone());
    }

    fn absorb(&mut self, other: ConfigNode) {
        if let Some(value) = other.value {
            self.value = Some(value);
        }
        for (name, child) in other.children {
            match self.children.entry(name) {
                Entry::Occupied(mut entry) => entry.get_mut().absorb(child),
                Entry::Vacant(entry) => {
                    entry.insert(child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_nested_objects() {
        let node = ConfigNode::from_value(json!({
            "search": {
                "results": { "resultsPerPage": 25 }
            }
        }));
        let leaf = node
            .child("search")
            .and_then(|n| n.child("results"))
            .and_then(|n| n.child("resultsPerPage"))
            .and_then(ConfigNode::value);
        assert_eq!(leaf, Some(&json!(25)));
    }

    #[test]
    fn test_trailing_dot_keys_merge_with_plain_sibling() {
        let node = ConfigNode::from_value(json!({
            "faceting": "1",
            "faceting.": { "limit": 10 }
        }));
        let faceting = node.child("faceting").unwrap();
        assert_eq!(faceting.value(), Some(&json!("1")));
        assert!(faceting.is_branch());
        assert_eq!(
            faceting.child("limit").and_then(ConfigNode::value),
            Some(&json!(10))
        );
    }

    #[test]
    fn test_trailing_dot_order_does_not_matter() {
        let a = ConfigNode::from_value(json!({ "k": 1, "k.": { "x": 2 } }));
        let b = ConfigNode::from_value(json!({ "k.": { "x": 2 }, "k": 1 }));
        assert_eq!(a.child("k"), b.child("k"));
    }

    #[test]
    fn test_merge_from_override_wins_on_leaves() {
        let mut base = ConfigNode::from_value(json!({
            "solr": { "host": "localhost", "port": 8983 }
        }));
        let overrides = ConfigNode::from_value(json!({
            "solr": { "host": "search.example.org" }
        }));
        base.merge_from(&overrides);
        let solr = base.child("solr").unwrap();
        assert_eq!(
            solr.child("host").and_then(ConfigNode::value),
            Some(&json!("search.example.org"))
        );
        assert_eq!(
            solr.child("port").and_then(ConfigNode::value),
            Some(&json!(8983))
        );
    }

    #[test]
    fn test_merge_from_combines_disjoint_subtrees() {
        let mut base = ConfigNode::from_value(json!({ "index": { "queue": { "enable": "1" } } }));
        let overrides = ConfigNode::from_value(json!({ "search": { "enabled": true } }));
        base.merge_from(&overrides);
        assert!(base.child("index").is_some());
        assert!(base.child("search").is_some());
    }

    #[test]
    fn test_from_toml_str() {
        let node = ConfigNode::from_toml_str(
            r#"
            enabled = true

            [solr]
            host = "solr.local"
            port = 8983
            "#,
        )
        .unwrap();
        assert_eq!(node.child("enabled").and_then(ConfigNode::value), Some(&json!(true)));
        assert_eq!(
            node.child("solr")
                .and_then(|n| n.child("host"))
                .and_then(ConfigNode::value),
            Some(&json!("solr.local"))
        );
    }

    #[test]
    fn test_from_toml_str_rejects_garbage() {
        assert!(matches!(
            ConfigNode::from_toml_str("= nope"),
            Err(SiteSolrError::Parse(_))
        ));
    }

    #[test]
    fn test_children_preserve_source_order() {
        let node = ConfigNode::from_json_str(r#"{ "z": 1, "a": 2, "m": 3 }"#).unwrap();
        let order: Vec<&str> = node.children().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }
}
