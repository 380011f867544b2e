use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::error::{NavError, NavResult};
use crate::page::{NavContext, NodeHost, Page, RenderNode};

/// Shared, ordered log of page lifecycle calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub(crate) fn record(&self, entry: impl Into<String>) {
        self.0.lock().expect("journal lock").push(entry.into());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().expect("journal lock").clone()
    }
}

pub(crate) struct RecordingPage {
    name: String,
    journal: Journal,
    node: Option<RenderNode>,
    fail_load: bool,
}

impl RecordingPage {
    pub(crate) fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            node: None,
            fail_load: false,
        }
    }

    pub(crate) fn failing(name: &str, journal: &Journal) -> Self {
        Self {
            fail_load: true,
            ..Self::new(name, journal)
        }
    }

    pub(crate) fn with_node(mut self, node: RenderNode) -> Self {
        self.node = Some(node);
        self
    }
}

impl Page for RecordingPage {
    fn title(&self) -> String {
        self.name.clone()
    }

    fn node(&self) -> Option<RenderNode> {
        self.node
    }

    fn load<'a>(&'a self, ctx: NavContext<'a>) -> BoxFuture<'a, NavResult<()>> {
        async move {
            tokio::task::yield_now().await;
            match ctx.pop {
                Some(_) => self.journal.record(format!("load:{} (pop)", self.name)),
                None => self.journal.record(format!("load:{}", self.name)),
            }
            if self.fail_load {
                return Err(NavError::page_load(std::io::Error::other(format!(
                    "{} failed",
                    self.name
                ))));
            }
            Ok(())
        }
        .boxed()
    }

    fn unload(&self) -> BoxFuture<'_, NavResult<()>> {
        async move {
            self.journal.record(format!("unload:{}", self.name));
            Ok(())
        }
        .boxed()
    }
}

pub(crate) struct RecordingHost {
    journal: Journal,
}

impl RecordingHost {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl NodeHost for RecordingHost {
    fn dispose(&self, node: &RenderNode) {
        self.journal.record(format!("dispose:{}", node.id()));
    }

    fn detach(&self, node: &RenderNode) {
        self.journal.record(format!("detach:{}", node.id()));
    }
}
