use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Extension points a module declares: event name to an ordered list of callback references.
///
/// The registry is inert. Callback references (e.g. `orchestrator_hr.tasks.generate_payroll`)
/// name code that does not exist yet, so the host records and reports them but never calls
/// them. Every table is empty by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookRegistry {
    /// Frequency (`all`, `hourly`, `daily`, `weekly`, `monthly`, or a cron string) to callbacks.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scheduler_events: BTreeMap<String, Vec<String>>,
    /// Document type to lifecycle event (`after_insert`, `on_update`, ...) to callbacks.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub doc_events: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Real-time event name to callbacks.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub websocket_events: BTreeMap<String, Vec<String>>,
    /// Callbacks run while building the desk boot payload.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boot_session: Vec<String>,
    /// Any other hook table, kept as written.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl HookRegistry {
    pub fn is_empty(&self) -> bool {
        self.scheduler_events.is_empty()
            && self.doc_events.is_empty()
            && self.websocket_events.is_empty()
            && self.boot_session.is_empty()
            && self.other.is_empty()
    }

    /// Flattened `(event, callbacks)` pairs.
    ///
    /// Event names are namespaced: `scheduler:<frequency>`, `doc:<doctype>:<event>`,
    /// `websocket:<event>`, `boot_session`, and `<table>` for other hook tables.
    pub fn events(&self) -> Vec<(String, Vec<String>)> {
        let mut events = Vec::new();

        for (frequency, callbacks) in &self.scheduler_events {
            events.push((format!("scheduler:{}", frequency), callbacks.clone()));
        }
        for (doctype, by_event) in &self.doc_events {
            for (event, callbacks) in by_event {
                events.push((format!("doc:{}:{}", doctype, event), callbacks.clone()));
            }
        }
        for (event, callbacks) in &self.websocket_events {
            events.push((format!("websocket:{}", event), callbacks.clone()));
        }
        if !self.boot_session.is_empty() {
            events.push(("boot_session".to_string(), self.boot_session.clone()));
        }
        for (table, value) in &self.other {
            events.push((table.clone(), callback_refs(value)));
        }

        events
    }

    /// Callbacks registered for a namespaced event. Unknown events have none.
    pub fn callbacks(&self, event: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .find(|(name, _)| name == event)
            .map(|(_, callbacks)| callbacks)
            .unwrap_or_default()
    }

    /// Total number of callback references across all events.
    pub fn callback_count(&self) -> usize {
        self.events().iter().map(|(_, c)| c.len()).sum()
    }
}

/// Collect every string leaf of an untyped hook table, depth first.
fn callback_refs(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items.iter().flat_map(callback_refs).collect(),
        serde_json::Value::Object(map) => map.values().flat_map(callback_refs).collect(),
        _ => Vec::new(),
    }
}
