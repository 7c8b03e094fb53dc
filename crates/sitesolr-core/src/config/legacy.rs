use serde_json::Value;
use tracing::warn;

use super::reader::SearchConfiguration;
use crate::error::{Result, SiteSolrError};

/// Compatibility wrapper for call sites written against the old plain
/// nested-map convention. Reads forward to [`SearchConfiguration`]; writes
/// were never supported through this surface and fail.
#[deprecated(note = "access configuration through SearchConfiguration path accessors")]
pub struct LegacyConfigMap<'a> {
    inner: &'a SearchConfiguration,
}

#[allow(deprecated)]
impl<'a> LegacyConfigMap<'a> {
    pub fn new(inner: &'a SearchConfiguration) -> Self {
        Self { inner }
    }

    /// Old-style existence probe.
    pub fn has(&self, path: &str) -> bool {
        warn!(
            "legacy configuration access for '{}', use SearchConfiguration instead",
            path
        );
        self.inner.is_valid_path(path)
    }

    /// Old-style read. Clones because the legacy convention handed out owned
    /// values.
    pub fn get(&self, path: &str) -> Option<Value> {
        warn!(
            "legacy configuration access for '{}', use SearchConfiguration instead",
            path
        );
        self.inner.value_by_path(path).ok().flatten().cloned()
    }

    pub fn set(&self, path: &str, _value: Value) -> Result<()> {
        Err(SiteSolrError::ReadOnly(format!(
            "configuration path '{}'",
            path
        )))
    }

    pub fn unset(&self, path: &str) -> Result<()> {
        Err(SiteSolrError::ReadOnly(format!(
            "configuration path '{}'",
            path
        )))
    }
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> SearchConfiguration {
        SearchConfiguration::from_json_value(json!({ "solr": { "host": "legacyhost" } }), 1)
    }

    #[test]
    fn test_reads_forward_to_primary_accessor() {
        let cfg = fixture();
        let legacy = LegacyConfigMap::new(&cfg);
        assert!(legacy.has("solr.host"));
        assert!(!legacy.has("solr.port"));
        assert_eq!(legacy.get("solr.host"), Some(json!("legacyhost")));
        assert_eq!(legacy.get("solr.port"), None);
    }

    #[test]
    fn test_writes_always_fail_read_only() {
        let cfg = fixture();
        let legacy = LegacyConfigMap::new(&cfg);
        assert!(matches!(
            legacy.set("solr.host", json!("other")),
            Err(SiteSolrError::ReadOnly(_))
        ));
        assert!(matches!(
            legacy.unset("solr.host"),
            Err(SiteSolrError::ReadOnly(_))
        ));
        // the underlying configuration is untouched
        assert_eq!(legacy.get("solr.host"), Some(json!("legacyhost")));
    }
}
