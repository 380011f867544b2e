use super::state::HistoryState;

/// Snapshot of the browser location as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowserLocation {
    /// Host including any port, compared against anchor hosts.
    pub host: String,
    /// Still percent-encoded, starting with `/`.
    pub pathname: String,
    /// Either empty or starting with `?`.
    pub search: String,
}

pub trait HistoryProvider: Send + Sync {
    fn location(&self) -> BrowserLocation;
    fn state(&self) -> Option<HistoryState>;
    /// Adds a new entry for `url`, resolved relative to the current location.
    fn push(&self, url: &str, state: Option<HistoryState>);
    /// Overwrites the state of the current entry without adding one.
    fn replace_state(&self, state: HistoryState);
}

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}
