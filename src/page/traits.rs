use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::config::LeftoverPolicy;
use crate::error::NavResult;
use crate::event::PopEvent;
use crate::location::QueryArgs;

/// Temporal direction of a navigation relative to the previously shown entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageDirection {
    /// First load, or a reload of the same entry.
    #[default]
    None,
    Forward,
    Backward,
}

/// Everything a page gets told about the navigation that reached it.
#[derive(Debug, Clone, Copy)]
pub struct NavContext<'a> {
    /// Every segment of the location being resolved, not just the remainder.
    pub path: &'a [String],
    pub args: &'a QueryArgs,
    pub direction: PageDirection,
    /// The pop notification that triggered this navigation, if any.
    pub pop: Option<&'a PopEvent>,
    pub leftover: LeftoverPolicy,
}

/// Handle to a host-rendered node. The core only compares and forwards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderNode(u64);

impl RenderNode {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host side of rendered nodes owned by pages.
pub trait NodeHost: Send + Sync {
    /// Releases reactive bindings attached to `node`.
    fn dispose(&self, node: &RenderNode);
    /// Removes `node` from the visible tree.
    fn detach(&self, node: &RenderNode);
}

pub trait Page: Send + Sync {
    fn title(&self) -> String;

    fn node(&self) -> Option<RenderNode> {
        None
    }

    fn load<'a>(&'a self, ctx: NavContext<'a>) -> BoxFuture<'a, NavResult<()>>;

    fn unload(&self) -> BoxFuture<'_, NavResult<()>>;
}

/// A page that can hand the rest of a path to one of its sub-pages.
pub trait DirectoryPage: Page {
    fn load_path<'a>(
        &'a self,
        path: &'a [String],
        ctx: NavContext<'a>,
    ) -> BoxFuture<'a, NavResult<()>>;

    fn current_page(&self) -> Option<PageRef>;
}

/// A live page instance, tagged once by capability when it is constructed.
#[derive(Clone)]
pub enum PageRef {
    Terminal(Arc<dyn Page>),
    Directory(Arc<dyn DirectoryPage>),
}

impl PageRef {
    pub fn terminal(page: impl Page + 'static) -> Self {
        Self::Terminal(Arc::new(page))
    }

    pub fn directory(page: impl DirectoryPage + 'static) -> Self {
        Self::Directory(Arc::new(page))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn title(&self) -> String {
        match self {
            Self::Terminal(page) => page.title(),
            Self::Directory(page) => page.title(),
        }
    }

    pub fn node(&self) -> Option<RenderNode> {
        match self {
            Self::Terminal(page) => page.node(),
            Self::Directory(page) => page.node(),
        }
    }

    pub fn unload(&self) -> BoxFuture<'_, NavResult<()>> {
        match self {
            Self::Terminal(page) => page.unload(),
            Self::Directory(page) => page.unload(),
        }
    }

    /// Identity comparison; two handles are the same page if they share an allocation.
    pub fn same_instance(&self, other: &PageRef) -> bool {
        self.data_ptr() == other.data_ptr()
    }

    fn data_ptr(&self) -> *const () {
        match self {
            Self::Terminal(page) => Arc::as_ptr(page) as *const (),
            Self::Directory(page) => Arc::as_ptr(page) as *const (),
        }
    }
}

impl fmt::Debug for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_directory() {
            "Directory"
        } else {
            "Terminal"
        };
        f.debug_struct("PageRef")
            .field("kind", &kind)
            .field("title", &self.title())
            .finish()
    }
}

impl From<Arc<dyn Page>> for PageRef {
    fn from(page: Arc<dyn Page>) -> Self {
        Self::Terminal(page)
    }
}

impl From<Arc<dyn DirectoryPage>> for PageRef {
    fn from(page: Arc<dyn DirectoryPage>) -> Self {
        Self::Directory(page)
    }
}
