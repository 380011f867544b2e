use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Config;
use crate::error::NavResult;
use crate::event::{AnchorClick, ClickDisposition, PopEvent};
use crate::history::{HistoryProvider, SessionStore};
use crate::location::{Location, parse_location};
use crate::page::{DirectoryPage, NavContext, PageDirection};

use super::mutex::NavigationMutex;
use super::sequence::SequenceTracker;

/// A navigation whose history entry is already stamped and whose direction is
/// known, waiting for its turn to touch the page tree.
#[derive(Debug)]
pub(crate) struct PendingNavigation {
    sequence: u64,
    direction: PageDirection,
    pathname: String,
    location: Location,
    pop: Option<PopEvent>,
}

/// Top-level navigation controller.
///
/// Turns location changes into serialized resolutions through the root
/// directory and tags each one with its direction in the session history.
pub struct Spa {
    root: Arc<dyn DirectoryPage>,
    history: Arc<dyn HistoryProvider>,
    session: Arc<dyn SessionStore>,
    config: Config,
    sequence: Mutex<SequenceTracker>,
    resolving: NavigationMutex,
}

impl Spa {
    pub fn new(
        root: Arc<dyn DirectoryPage>,
        history: Arc<dyn HistoryProvider>,
        session: Arc<dyn SessionStore>,
        config: Config,
    ) -> Self {
        Self {
            root,
            history,
            session,
            config,
            sequence: Mutex::new(SequenceTracker::default()),
            resolving: NavigationMutex::new(),
        }
    }

    pub fn root(&self) -> &Arc<dyn DirectoryPage> {
        &self.root
    }

    pub fn history(&self) -> &Arc<dyn HistoryProvider> {
        &self.history
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sequence number of the entry resolved last.
    pub fn current_sequence(&self) -> Option<u64> {
        self.tracker().current()
    }

    /// Resolves the current location through the page tree.
    ///
    /// Sequence bookkeeping happens synchronously before the resolution waits
    /// for its turn; the page tree is only touched while holding the mutex.
    pub async fn invalidate_location(&self, pop: Option<PopEvent>) -> NavResult<PageDirection> {
        let pending = self.prepare(pop)?;
        self.resolve(pending).await
    }

    /// Stamps the current history entry, persists the counter and parses the
    /// location. Must run when the triggering event fires, while the history
    /// still points at the entry the event is about.
    pub(crate) fn prepare(&self, pop: Option<PopEvent>) -> NavResult<PendingNavigation> {
        let (sequence, direction) = self.advance_sequence();
        let browser = self.history.location();
        let location = parse_location(&browser.pathname, &browser.search)?;
        Ok(PendingNavigation {
            sequence,
            direction,
            pathname: browser.pathname,
            location,
            pop,
        })
    }

    pub(crate) async fn resolve(&self, pending: PendingNavigation) -> NavResult<PageDirection> {
        let PendingNavigation {
            sequence,
            direction,
            pathname,
            location,
            pop,
        } = pending;

        let _turn = self.resolving.acquire().await;
        tracing::debug!(
            path = %pathname,
            sequence,
            ?direction,
            popped = pop.is_some(),
            "resolving location"
        );
        let ctx = NavContext {
            path: &location.segments,
            args: &location.args,
            direction,
            pop: pop.as_ref(),
            leftover: self.config.resolver.leftover_segments,
        };
        self.root.load_path(&location.segments, ctx).await?;
        tracing::info!(path = %pathname, sequence, ?direction, "navigation complete");
        Ok(direction)
    }

    /// Pushes a new history entry for `path` and resolves it.
    pub async fn navigate(&self, path: &str) -> NavResult<PageDirection> {
        self.history.push(path, None);
        self.invalidate_location(None).await
    }

    /// Pushes same-host anchor targets onto the history stack.
    ///
    /// The caller suppresses the browser's default navigation and resolves the
    /// new location when this returns `PreventDefault`.
    pub fn intercept_click(&self, click: &AnchorClick) -> ClickDisposition {
        if click.host != self.history.location().host {
            return ClickDisposition::Allow;
        }

        self.history.push(&click.href, None);
        ClickDisposition::PreventDefault
    }

    pub async fn handle_click(&self, click: &AnchorClick) -> NavResult<ClickDisposition> {
        let disposition = self.intercept_click(click);
        if disposition == ClickDisposition::PreventDefault {
            self.invalidate_location(None).await?;
        }
        Ok(disposition)
    }

    /// Lifecycle hook kept for symmetry with pages; listeners live as long as the app.
    pub fn dispose(&self) {}

    fn tracker(&self) -> std::sync::MutexGuard<'_, SequenceTracker> {
        self.sequence.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stamps fresh entries with the next sequence number, persists the
    /// counter, and returns the entry's number with its direction.
    fn advance_sequence(&self) -> (u64, PageDirection) {
        let keys = &self.config.session;
        let mut tracker = self.tracker();
        tracker.ensure_loaded(self.session.as_ref(), &keys.counter_key);

        let mut state = self.history.state().unwrap_or_default();
        let sequence = match state.page_number(&keys.state_key) {
            Some(sequence) => sequence,
            None => {
                let sequence = tracker.allocate();
                state.set_page_number(&keys.state_key, sequence);
                self.history.replace_state(state);
                sequence
            }
        };

        let direction = tracker.observe(sequence);
        self.session
            .set(&keys.counter_key, tracker.allocated().to_string());
        (sequence, direction)
    }
}
