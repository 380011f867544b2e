use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque per-entry history state. Only the sequence-number field is
/// interpreted by the orchestrator; every other field is carried through.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryState(Map<String, Value>);

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number stored under `key`. Zero and non-integer values count as unset.
    pub fn page_number(&self, key: &str) -> Option<u64> {
        self.0
            .get(key)
            .and_then(Value::as_u64)
            .filter(|number| *number > 0)
    }

    pub fn set_page_number(&mut self, key: &str, number: u64) {
        self.0.insert(key.to_string(), Value::from(number));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }
}

impl From<Map<String, Value>> for HistoryState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
