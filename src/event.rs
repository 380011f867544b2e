use tokio::sync::oneshot;

use crate::error::NavResult;
use crate::history::HistoryState;
use crate::page::PageDirection;
use crate::spa::PendingNavigation;

/// Notification that the user moved through history with back/forward.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopEvent {
    /// State of the entry that became current.
    pub state: Option<HistoryState>,
}

impl PopEvent {
    pub fn new(state: Option<HistoryState>) -> Self {
        Self { state }
    }
}

/// A click whose nearest enclosing anchor was found by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorClick {
    /// Host (with port) the anchor points at.
    pub host: String,
    pub href: String,
}

impl AnchorClick {
    pub fn new(host: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDisposition {
    /// The click was turned into an in-app navigation; suppress the default.
    PreventDefault,
    /// Foreign host; let the browser follow the link.
    Allow,
}

pub(crate) type NavReply = oneshot::Sender<NavResult<PageDirection>>;

#[derive(Debug)]
pub(crate) enum NavRequest {
    /// Resolve a navigation that was stamped when its event fired.
    Resolve {
        pending: PendingNavigation,
        reply: Option<NavReply>,
    },
    /// Acknowledged once every earlier request has been processed.
    Barrier { reply: oneshot::Sender<()> },
    Shutdown,
}
