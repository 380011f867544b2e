use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::watch;

use crate::config::LeftoverPolicy;
use crate::error::{NavError, NavResult};

use super::registry::{InstanceSource, SubPageTable};
use super::traits::{DirectoryPage, NavContext, NodeHost, Page, PageDirection, PageRef, RenderNode};

/// Directory-specific behavior layered on top of path resolution.
///
/// Every hook has a default, so a plain routing node is `NoContent`.
pub trait DirectoryContent: Send + Sync {
    fn title(&self) -> String {
        String::new()
    }

    /// Loads the directory itself when the path ends at it. Directories that
    /// have no content at their own path keep the default `PageNotFound`.
    fn load_index<'a>(&'a self, ctx: NavContext<'a>) -> BoxFuture<'a, NavResult<()>> {
        async move { Err(NavError::page_not_found(ctx.path)) }.boxed()
    }

    /// Swaps the visible child node. Called after the new child has loaded and
    /// only when its node differs from the previous child's.
    fn replace_child_node<'a>(
        &'a self,
        node: Option<&'a RenderNode>,
        direction: PageDirection,
    ) -> BoxFuture<'a, NavResult<()>> {
        let _ = (node, direction);
        async { Ok(()) }.boxed()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoContent;

impl DirectoryContent for NoContent {}

struct OwnedNode {
    node: RenderNode,
    host: Arc<dyn NodeHost>,
}

/// Resolves one path segment against registered sub-pages and delegates the
/// rest of the path to the selected child.
pub struct Directory {
    content: Box<dyn DirectoryContent>,
    sub_pages: Mutex<SubPageTable>,
    current: watch::Sender<Option<PageRef>>,
    owned_node: Mutex<Option<OwnedNode>>,
}

impl Directory {
    pub fn new(content: impl DirectoryContent + 'static) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            content: Box::new(content),
            sub_pages: Mutex::new(SubPageTable::default()),
            current,
            owned_node: Mutex::new(None),
        }
    }

    pub fn bare() -> Self {
        Self::new(NoContent)
    }

    pub fn with_node(self, node: RenderNode, host: Arc<dyn NodeHost>) -> Self {
        self.attach_node(node, host);
        self
    }

    /// Gives this directory a rendered node, released on the next `unload`.
    pub fn attach_node(&self, node: RenderNode, host: Arc<dyn NodeHost>) {
        *self.owned_node.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(OwnedNode { node, host });
    }

    /// Registers a cached sub-page: `segments[0]` is the canonical segment and
    /// the rest are aliases. The factory runs at most once.
    pub fn register_sub_page<F, Fut>(&self, segments: &[&str], factory: F) -> NavResult<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = NavResult<PageRef>> + Send + 'static,
    {
        self.register_sub_page_with_cache(segments, factory, true)
    }

    /// Registers a sub-page that is rebuilt on every resolution.
    pub fn register_uncached_sub_page<F, Fut>(&self, segments: &[&str], factory: F) -> NavResult<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = NavResult<PageRef>> + Send + 'static,
    {
        self.register_sub_page_with_cache(segments, factory, false)
    }

    pub fn register_sub_page_with_cache<F, Fut>(
        &self,
        segments: &[&str],
        factory: F,
        cache: bool,
    ) -> NavResult<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = NavResult<PageRef>> + Send + 'static,
    {
        let factory = Arc::new(move || factory().boxed());
        self.table().register(segments, factory, cache)
    }

    /// Watches the active child; `None` while idle.
    pub fn subscribe(&self) -> watch::Receiver<Option<PageRef>> {
        self.current.subscribe()
    }

    fn table(&self) -> MutexGuard<'_, SubPageTable> {
        self.sub_pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn resolve_instance(&self, segment: &str, path: &[String]) -> NavResult<PageRef> {
        let lookup = self.table().lookup(segment);
        let Some(lookup) = lookup else {
            return Err(NavError::page_not_found(path));
        };

        match lookup.source {
            InstanceSource::Cached(instance) => {
                tracing::debug!(segment = %lookup.canonical, "reusing cached sub-page");
                Ok(instance)
            }
            InstanceSource::Build { factory, cache } => {
                let instance = factory().await?;
                tracing::debug!(segment = %lookup.canonical, cache, "constructed sub-page");
                if cache {
                    Ok(self.table().store_cached(&lookup.canonical, instance))
                } else {
                    Ok(instance)
                }
            }
        }
    }

    async fn install(&self, instance: PageRef, direction: PageDirection) -> NavResult<()> {
        let node = instance.node();
        let previous = self.current.send_replace(Some(instance.clone()));
        let previous_node = previous.as_ref().and_then(PageRef::node);

        let replaced = if previous_node != node {
            self.content
                .replace_child_node(node.as_ref(), direction)
                .await
        } else {
            Ok(())
        };

        // The new child is current either way, so the previous one is released
        // before a hook failure is reported.
        let unloaded = match previous {
            Some(previous) if !previous.same_instance(&instance) => previous.unload().await,
            _ => Ok(()),
        };
        replaced.and(unloaded)
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::bare()
    }
}

impl Page for Directory {
    fn title(&self) -> String {
        self.content.title()
    }

    fn node(&self) -> Option<RenderNode> {
        self.owned_node
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|owned| owned.node)
    }

    fn load<'a>(&'a self, ctx: NavContext<'a>) -> BoxFuture<'a, NavResult<()>> {
        self.content.load_index(ctx)
    }

    fn unload(&self) -> BoxFuture<'_, NavResult<()>> {
        async move {
            let active = self.current.send_replace(None);
            if let Some(active) = active {
                active.unload().await?;
            }

            let owned = self
                .owned_node
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(OwnedNode { node, host }) = owned {
                host.dispose(&node);
                host.detach(&node);
            }
            Ok(())
        }
        .boxed()
    }
}

impl DirectoryPage for Directory {
    fn load_path<'a>(
        &'a self,
        path: &'a [String],
        ctx: NavContext<'a>,
    ) -> BoxFuture<'a, NavResult<()>> {
        async move {
            let Some((segment, rest)) = path.split_first() else {
                return self.load(ctx).await;
            };

            let instance = self.resolve_instance(segment, path).await?;
            match &instance {
                PageRef::Directory(directory) => directory.load_path(rest, ctx).await?,
                PageRef::Terminal(page) => {
                    if !rest.is_empty() && ctx.leftover == LeftoverPolicy::Reject {
                        return Err(NavError::page_not_found(path));
                    }
                    page.load(ctx).await?
                }
            }

            self.install(instance, ctx.direction).await
        }
        .boxed()
    }

    fn current_page(&self) -> Option<PageRef> {
        self.current.borrow().clone()
    }
}
