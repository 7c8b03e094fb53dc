use serde_json::Value;
use tracing::debug;

use super::node::ConfigNode;
use crate::error::{Result, SiteSolrError};
use crate::types::RecordId;

/// Permissive truthy parsing for configuration flags. The literal `true`,
/// non-zero numbers and the tokens `1`, `true`, `yes`, `on` (case
/// insensitive) read as `true`; everything else reads as `false`.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        _ => false,
    }
}

pub fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A list value is either a real array or a comma separated string.
pub fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(coerce_string).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        other => coerce_string(other).map(|s| vec![s]).unwrap_or_default(),
    }
}

/// Generates the named convenience accessors from a (path, type, default)
/// table. The wrappers carry no logic of their own; they are compositions of
/// `value_by_path` with one coercion and one literal default.
macro_rules! path_accessors {
    () => {};
    ($(#[$meta:meta])* $name:ident: bool = $path:literal, $default:literal; $($rest:tt)*) => {
        $(#[$meta])*
        pub fn $name(&self) -> bool {
            match self.value_by_path($path) {
                Ok(Some(value)) => coerce_bool(value),
                _ => $default,
            }
        }
        path_accessors!($($rest)*);
    };
    ($(#[$meta:meta])* $name:ident: u64 = $path:literal, $default:expr; $($rest:tt)*) => {
        $(#[$meta])*
        pub fn $name(&self) -> u64 {
            match self.value_by_path($path) {
                Ok(Some(value)) => coerce_u64(value).unwrap_or($default),
                _ => $default,
            }
        }
        path_accessors!($($rest)*);
    };
    ($(#[$meta:meta])* $name:ident: f64 = $path:literal, $default:expr; $($rest:tt)*) => {
        $(#[$meta])*
        pub fn $name(&self) -> f64 {
            match self.value_by_path($path) {
                Ok(Some(value)) => coerce_f64(value).unwrap_or($default),
                _ => $default,
            }
        }
        path_accessors!($($rest)*);
    };
    ($(#[$meta:meta])* $name:ident: String = $path:literal, $default:expr; $($rest:tt)*) => {
        $(#[$meta])*
        pub fn $name(&self) -> String {
            match self.value_by_path($path) {
                Ok(Some(value)) => coerce_string(value).unwrap_or_else(|| $default.to_string()),
                _ => $default.to_string(),
            }
        }
        path_accessors!($($rest)*);
    };
    ($(#[$meta:meta])* $name:ident: list = $path:literal; $($rest:tt)*) => {
        $(#[$meta])*
        pub fn $name(&self) -> Vec<String> {
            match self.value_by_path($path) {
                Ok(Some(value)) => coerce_list(value),
                _ => Vec::new(),
            }
        }
        path_accessors!($($rest)*);
    };
}

/// Typed, defaulted, read-mostly access to the extension's configuration
/// tree. Constructed once per request from the host's merged configuration;
/// the mutating methods are setup-time escape hatches, not general API.
#[derive(Debug, Clone)]
pub struct SearchConfiguration {
    root: ConfigNode,
    context_page_id: RecordId,
}

impl SearchConfiguration {
    pub fn new(root: ConfigNode, context_page_id: RecordId) -> Self {
        Self {
            root,
            context_page_id,
        }
    }

    pub fn from_json_value(raw: Value, context_page_id: RecordId) -> Self {
        Self::new(ConfigNode::from_value(raw), context_page_id)
    }

    pub fn from_toml_str(raw: &str, context_page_id: RecordId) -> Result<Self> {
        Ok(Self::new(ConfigNode::from_toml_str(raw)?, context_page_id))
    }

    pub fn from_toml_file(path: &std::path::Path, context_page_id: RecordId) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        debug!("loaded search configuration from {:?}", path);
        Self::from_toml_str(&raw, context_page_id)
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// The page the configuration was resolved for, supplied explicitly by
    /// the caller.
    pub fn context_page_id(&self) -> RecordId {
        self.context_page_id
    }

    fn split_path<'p>(path: &'p str) -> Result<Vec<&'p str>> {
        if path.is_empty() {
            return Err(SiteSolrError::InvalidPath(path.to_string()));
        }
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(SiteSolrError::InvalidPath(path.to_string()));
        }
        Ok(segments)
    }

    /// The leaf value stored at `path`, or `Ok(None)` when any segment along
    /// the way is missing. Only an unusable path (empty, or with an empty
    /// segment) is an error.
    pub fn value_by_path(&self, path: &str) -> Result<Option<&Value>> {
        let segments = Self::split_path(path)?;
        let mut node = &self.root;
        for segment in &segments[..segments.len() - 1] {
            match node.child(segment) {
                Some(next) if next.is_branch() => node = next,
                _ => return Ok(None),
            }
        }
        Ok(node
            .child(segments[segments.len() - 1])
            .and_then(ConfigNode::value))
    }

    /// Non-failing variant: `default` whenever `path` does not resolve to a
    /// leaf value.
    pub fn value_by_path_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
        match self.value_by_path(path) {
            Ok(Some(value)) => value,
            _ => default,
        }
    }

    /// The subtree rooted at `path`; every segment, the final one included,
    /// must resolve to a mapping.
    pub fn object_by_path(&self, path: &str) -> Result<&ConfigNode> {
        let segments = Self::split_path(path)?;
        let mut node = &self.root;
        for segment in &segments {
            node = match node.child(segment) {
                Some(next) if next.is_branch() => next,
                _ => return Err(SiteSolrError::PathNotFound(path.to_string())),
            };
        }
        Ok(node)
    }

    /// Non-failing variant of [`object_by_path`](Self::object_by_path).
    pub fn object_by_path_or<'a>(&'a self, path: &str, default: &'a ConfigNode) -> &'a ConfigNode {
        match self.object_by_path(path) {
            Ok(node) => node,
            Err(_) => default,
        }
    }

    pub fn is_valid_path(&self, path: &str) -> bool {
        matches!(self.value_by_path(path), Ok(Some(_)))
    }

    /// Deep-merge `overrides` into the configuration root. The override wins
    /// on leaf conflicts; nested mappings combine recursively.
    pub fn merge_overrides(&mut self, overrides: &ConfigNode) -> &mut Self {
        self.root.merge_from(overrides);
        self
    }

    /// Replaces the `search.query.filter` subtree. Legacy escape hatch used
    /// during request setup.
    pub fn set_search_query_filter_configuration(&mut self, filters: ConfigNode) {
        self.root
            .child_or_default("search")
            .child_or_default("query")
            .insert_child("filter", filters);
    }

    /// Drops the page-sections entry from the query filters. Legacy escape
    /// hatch used during request setup.
    pub fn remove_search_query_filter_for_page_sections(&mut self) {
        if let Some(filter) = self
            .root
            .child_mut("search")
            .and_then(|node| node.child_mut("query"))
            .and_then(|node| node.child_mut("filter"))
        {
            filter.remove_child("pageSections");
        }
    }

    /// Target page for search results; falls back to the context page the
    /// configuration was constructed with.
    pub fn search_target_page(&self) -> RecordId {
        match self.value_by_path("search.targetPage") {
            Ok(Some(value)) => coerce_u64(value).unwrap_or(self.context_page_id),
            _ => self.context_page_id,
        }
    }

    path_accessors! {
        /// Whether the extension is enabled for the current site.
        enabled: bool = "enabled", false;
        /// Solr server host.
        solr_host: String = "solr.host", "localhost";
        /// Solr server port.
        solr_port: u64 = "solr.port", 8983;
        /// Scheme used to reach the Solr server.
        solr_scheme: String = "solr.scheme", "http";
        /// Path prefix of the Solr endpoint.
        solr_path: String = "solr.path", "/";
        /// Core queried and written to.
        solr_core: String = "solr.core", "core_en";
        /// Read timeout for Solr requests, in seconds.
        solr_timeout_seconds: f64 = "solr.timeout", 30.0;
        index_queue_enabled: bool = "index.queue.enable", false;
        /// Additional page uids queued although outside the site root.
        index_additional_page_ids: list = "index.queue.pages.additionalPageIds";
        index_allowed_page_types: list = "index.queue.pages.allowedPageTypes";
        logging_indexing: bool = "logging.indexing", false;
        logging_indexing_queue: bool = "logging.indexing.queue", false;
        logging_query_filters: bool = "logging.query.filters", false;
        search_results_per_page: u64 = "search.results.resultsPerPage", 10;
        search_allow_empty_query: bool = "search.query.allowEmptyQuery", false;
        /// Fields whose content is rendered without escaping.
        search_trusted_fields: list = "search.query.trustedFields";
        search_boost_function: String = "search.query.boostFunction", "";
        search_boost_query: String = "search.query.boostQuery", "";
        search_highlighting: bool = "search.results.highlighting", false;
        search_highlighting_fragment_size: u64 = "search.results.highlighting.fragmentSize", 200;
        faceting: bool = "search.faceting", false;
        faceting_limit: u64 = "search.faceting.limit", 10;
        suggest: bool = "search.suggest", false;
        suggest_number_of_suggestions: u64 = "search.suggest.numberOfSuggestions", 10;
    }
}
