use serde_json::Value;
use std::collections::HashMap;

/// Numeric uid of a record inside the host framework.
pub type RecordId = u64;

/// Field name to value mapping for one record, as handed over by the host.
pub type FieldMap = HashMap<String, Value>;

/// Visibility constraints applied when resolving descendant pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityFilter {
    /// Include pages that are hidden in the frontend.
    pub include_hidden: bool,
    /// Honor per-record enable columns (start/stop times, group access).
    pub respect_enable_columns: bool,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            include_hidden: false,
            respect_enable_columns: true,
        }
    }
}
