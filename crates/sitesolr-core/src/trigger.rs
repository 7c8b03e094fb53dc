use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::traits::{PageTreeLister, RecordStore, RecursiveTriggerSource};
use crate::types::{FieldMap, RecordId, VisibilityFilter};

/// Depth bound applied when resolving descendant pages.
pub const DEFAULT_SUB_PAGE_DEPTH: usize = 20;

/// One declarative trigger condition. A rule matches a change when every
/// entry of `current_state` equals the record's persisted value AND every
/// entry of `change_set` equals a value in the changed-field map. A missing
/// sub-map is vacuously satisfied on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<HashMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_set: Option<HashMap<String, Value>>,
}

impl TriggerRule {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn require_current(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.current_state
            .get_or_insert_with(HashMap::new)
            .insert(field.into(), value.into());
        self
    }

    pub fn require_change(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.change_set
            .get_or_insert_with(HashMap::new)
            .insert(field.into(), value.into());
        self
    }
}

/// True when every `current_state` entry of `rule` is present in `record`
/// with an equal value. Absence of a field fails the match like any value
/// mismatch; it is never an error.
pub fn all_current_state_fields_match(rule: &TriggerRule, record: &FieldMap) -> bool {
    match &rule.current_state {
        None => true,
        Some(required) => required
            .iter()
            .all(|(field, value)| record.get(field) == Some(value)),
    }
}

/// Same contract applied to `change_set` against the changed-field map.
pub fn all_change_set_values_match(rule: &TriggerRule, changed_fields: &FieldMap) -> bool {
    match &rule.change_set {
        None => true,
        Some(required) => required
            .iter()
            .all(|(field, value)| changed_fields.get(field) == Some(value)),
    }
}

/// The deduplicated union of field names referenced by any rule's
/// `current_state`. These are the only fields worth fetching from the record
/// store. Order carries no meaning.
pub fn monitored_fields(rules: &[TriggerRule]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for rule in rules {
        if let Some(required) = &rule.current_state {
            for field in required.keys() {
                if !fields.iter().any(|known| known == field) {
                    fields.push(field.clone());
                }
            }
        }
    }
    fields
}

/// Decides whether a change to one record requires reprocessing its
/// dependent records. The rule set arrives through a
/// [`RecursiveTriggerSource`], supplied by each concrete change listener;
/// record retrieval and tree listing stay behind the host traits.
pub struct RecursiveUpdateEvaluator<S, L> {
    store: S,
    lister: L,
    table: String,
    max_depth: usize,
    visibility: VisibilityFilter,
}

impl<S: RecordStore, L: PageTreeLister> RecursiveUpdateEvaluator<S, L> {
    pub fn new(store: S, lister: L, table: impl Into<String>) -> Self {
        Self {
            store,
            lister,
            table: table.into(),
            max_depth: DEFAULT_SUB_PAGE_DEPTH,
            visibility: VisibilityFilter::default(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_visibility(mut self, visibility: VisibilityFilter) -> Self {
        self.visibility = visibility;
        self
    }

    /// Whether `changed_fields` on record `uid` matches any of the
    /// listener's trigger rules. Rules are checked in order and the first
    /// match wins; the record is fetched once, restricted to the monitored
    /// field union.
    pub fn is_recursive_update_required(
        &self,
        source: &dyn RecursiveTriggerSource,
        uid: RecordId,
        changed_fields: &FieldMap,
    ) -> Result<bool> {
        let rules = source.trigger_rules();
        if rules.is_empty() {
            return Ok(false);
        }

        let fields = monitored_fields(rules);
        let record = if fields.is_empty() {
            FieldMap::new()
        } else {
            self.store
                .record(&self.table, uid, &fields)?
                .unwrap_or_default()
        };

        for rule in rules {
            if all_current_state_fields_match(rule, &record)
                && all_change_set_values_match(rule, changed_fields)
            {
                debug!(
                    "trigger rule '{}' requires recursive update of {} {}",
                    rule.name, self.table, uid
                );
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Ids of the live pages below `page`, the page itself excluded.
    pub fn sub_page_ids(&self, page: RecordId) -> Result<Vec<RecordId>> {
        let mut ids = self
            .lister
            .descendant_ids(page, self.max_depth, &self.visibility)?;
        ids.retain(|id| *id != page);
        Ok(ids)
    }
}
