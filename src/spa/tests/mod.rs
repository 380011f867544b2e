
use std::sync::Arc;

use crate::config::Config;
use crate::history::{MemoryHistory, MemorySessionStore};
use crate::page::{Directory, PageRef};
use crate::testing::{Journal, RecordingPage};

use super::Spa;

pub(super) struct Fixture {
    pub(super) spa: Arc<Spa>,
    pub(super) root: Arc<Directory>,
    pub(super) history: Arc<MemoryHistory>,
    pub(super) session: Arc<MemorySessionStore>,
    pub(super) journal: Journal,
}

impl Fixture {
    pub(super) fn new() -> Self {
        Self::with_session(Arc::new(MemorySessionStore::new()))
    }

    pub(super) fn with_session(session: Arc<MemorySessionStore>) -> Self {
        let journal = Journal::default();
        let root = Arc::new(Directory::bare());
        let plain: [&[&'static str]; 3] = [&["home"], &["profile", "me"], &["settings"]];
        for segments in plain {
            let journal = journal.clone();
            let name = segments[0];
            root.register_sub_page(segments, move || {
                let page = PageRef::terminal(RecordingPage::new(name, &journal));
                async move { Ok(page) }
            })
            .expect("registration should succeed");
        }
        let slow_journal = journal.clone();
        root.register_sub_page(&["slow"], move || {
            let page = PageRef::terminal(RecordingPage::new("slow", &slow_journal));
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok(page)
            }
        })
        .expect("registration should succeed");
        let broken_journal = journal.clone();
        root.register_sub_page(&["broken"], move || {
            let page = PageRef::terminal(RecordingPage::failing("broken", &broken_journal));
            async move { Ok(page) }
        })
        .expect("registration should succeed");

        let history = Arc::new(MemoryHistory::new("https://app.test/home").expect("start url"));
        let spa = Arc::new(Spa::new(
            root.clone(),
            history.clone(),
            session.clone(),
            Config::default(),
        ));
        Self {
            spa,
            root,
            history,
            session,
            journal,
        }
    }

    pub(super) fn current_title(&self) -> Option<String> {
        use crate::page::DirectoryPage;

        self.root.current_page().map(|page| page.title())
    }
}
