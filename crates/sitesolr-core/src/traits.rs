use crate::{FieldMap, RecordId, Result, TriggerRule, VisibilityFilter};

/// Read access to the host framework's record storage.
pub trait RecordStore {
    /// Fetch one record restricted to `fields`. `Ok(None)` when the record
    /// does not exist.
    fn record(&self, table: &str, uid: RecordId, fields: &[String]) -> Result<Option<FieldMap>>;
}

/// Access to the host framework's page-tree listing facility.
pub trait PageTreeLister {
    /// Ids of the pages below `root`, bounded by `max_depth` and filtered by
    /// `visibility`. The listing may include `root`; callers filter it out.
    /// Order is deterministic for a fixed tree state.
    fn descendant_ids(
        &self,
        root: RecordId,
        max_depth: usize,
        visibility: &VisibilityFilter,
    ) -> Result<Vec<RecordId>>;
}

/// Extension point implemented by each concrete change listener: the rule set
/// deciding when a record change must be propagated to its sub pages.
pub trait RecursiveTriggerSource {
    fn trigger_rules(&self) -> &[TriggerRule];
}
