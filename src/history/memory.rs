use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use url::Url;

use crate::error::{NavError, NavResult};
use crate::event::PopEvent;

use super::state::HistoryState;
use super::traits::{BrowserLocation, HistoryProvider, SessionStore};

const HISTORY_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct HistoryEntry {
    url: Url,
    state: Option<HistoryState>,
}

#[derive(Debug)]
struct Stacks {
    current: HistoryEntry,
    back_stack: VecDeque<HistoryEntry>,
    forward_stack: VecDeque<HistoryEntry>,
}

/// Browser-like session history kept in memory.
///
/// `back` and `forward` move the cursor and return the pop notification a
/// browser would dispatch; feeding it to the orchestrator is up to the caller.
#[derive(Debug)]
pub struct MemoryHistory {
    stacks: Mutex<Stacks>,
}

impl MemoryHistory {
    pub fn new(start_url: &str) -> NavResult<Self> {
        let url = Url::parse(start_url).map_err(|err| {
            NavError::invalid_argument(format!("invalid start url {start_url:?}: {err}"))
        })?;
        Ok(Self {
            stacks: Mutex::new(Stacks {
                current: HistoryEntry { url, state: None },
                back_stack: VecDeque::new(),
                forward_stack: VecDeque::new(),
            }),
        })
    }

    pub fn back(&self) -> Option<PopEvent> {
        let mut stacks = self.lock();
        let target = stacks.back_stack.pop_back()?;
        let previous = std::mem::replace(&mut stacks.current, target);
        push_bounded(&mut stacks.forward_stack, previous);
        Some(PopEvent::new(stacks.current.state.clone()))
    }

    pub fn forward(&self) -> Option<PopEvent> {
        let mut stacks = self.lock();
        let target = stacks.forward_stack.pop_back()?;
        let previous = std::mem::replace(&mut stacks.current, target);
        push_bounded(&mut stacks.back_stack, previous);
        Some(PopEvent::new(stacks.current.state.clone()))
    }

    pub fn current_url(&self) -> String {
        self.lock().current.url.to_string()
    }

    /// Number of entries reachable with back/forward, including the current one.
    pub fn len(&self) -> usize {
        let stacks = self.lock();
        stacks.back_stack.len() + stacks.forward_stack.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn lock(&self) -> MutexGuard<'_, Stacks> {
        self.stacks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HistoryProvider for MemoryHistory {
    fn location(&self) -> BrowserLocation {
        let stacks = self.lock();
        let url = &stacks.current.url;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        BrowserLocation {
            host,
            pathname: url.path().to_string(),
            search: url.query().map(|query| format!("?{query}")).unwrap_or_default(),
        }
    }

    fn state(&self) -> Option<HistoryState> {
        self.lock().current.state.clone()
    }

    fn push(&self, url: &str, state: Option<HistoryState>) {
        let mut stacks = self.lock();
        let url = match stacks.current.url.join(url) {
            Ok(url) => url,
            Err(err) => {
                tracing::warn!(url, %err, "ignoring history push with unresolvable url");
                return;
            }
        };
        let previous = std::mem::replace(&mut stacks.current, HistoryEntry { url, state });
        push_bounded(&mut stacks.back_stack, previous);
        stacks.forward_stack.clear();
    }

    fn replace_state(&self, state: HistoryState) {
        self.lock().current.state = Some(state);
    }
}

fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry) {
    if stack.len() >= HISTORY_CAPACITY {
        stack.pop_front();
    }
    stack.push_back(entry);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}
