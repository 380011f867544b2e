use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{NavError, NavResult};
use crate::event::{AnchorClick, ClickDisposition, NavReply, NavRequest, PopEvent};
use crate::page::PageDirection;

use super::core::{PendingNavigation, Spa};

/// Owns the task that drains queued navigation requests one at a time.
pub struct NavigationDispatcher {
    handle: NavigationHandle,
    task: Option<JoinHandle<()>>,
}

/// Cloneable front door for event sources (click listeners, pop listeners,
/// programmatic navigation).
#[derive(Clone)]
pub struct NavigationHandle {
    spa: Arc<Spa>,
    tx: flume::Sender<NavRequest>,
}

impl NavigationDispatcher {
    /// Must be called from within a tokio runtime.
    pub fn spawn(spa: Arc<Spa>) -> Self {
        let (tx, rx) = flume::bounded(spa.config().dispatch.queue_capacity);
        let task = tokio::spawn(run_dispatch_loop(Arc::clone(&spa), rx));
        Self {
            handle: NavigationHandle { spa, tx },
            task: Some(task),
        }
    }

    pub fn handle(&self) -> NavigationHandle {
        self.handle.clone()
    }

    /// Lets already queued requests finish, then stops the loop.
    pub async fn shutdown(mut self) {
        let _ = self.handle.tx.send_async(NavRequest::Shutdown).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for NavigationDispatcher {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Every entry point stamps its history entry when it is called, before the
/// returned future is polled. Only the page-tree work waits in the queue.
impl NavigationHandle {
    /// Pushes `path` and waits for its queued resolution.
    pub fn navigate<'a>(
        &'a self,
        path: &str,
    ) -> impl Future<Output = NavResult<PageDirection>> + Send + use<'a> {
        self.spa.history().push(path, None);
        let pending = self.spa.prepare(None);
        async move { self.resolve_queued(pending?).await }
    }

    /// Queues the resolution that follows a history pop and waits for it.
    /// Call it from the pop listener, while the popped entry is still current.
    pub fn pop<'a>(
        &'a self,
        event: PopEvent,
    ) -> impl Future<Output = NavResult<PageDirection>> + Send + use<'a> {
        let pending = self.spa.prepare(Some(event));
        async move { self.resolve_queued(pending?).await }
    }

    /// Decides interception immediately and queues the resolution without
    /// waiting for it; failures are logged by the dispatch loop.
    pub fn click<'a>(
        &'a self,
        click: &AnchorClick,
    ) -> impl Future<Output = NavResult<ClickDisposition>> + Send + use<'a> {
        let disposition = self.spa.intercept_click(click);
        let pending = match disposition {
            ClickDisposition::PreventDefault => Some(self.spa.prepare(None)),
            ClickDisposition::Allow => None,
        };
        async move {
            if let Some(pending) = pending {
                self.submit(NavRequest::Resolve {
                    pending: pending?,
                    reply: None,
                })
                .await?;
            }
            Ok(disposition)
        }
    }

    async fn resolve_queued(&self, pending: PendingNavigation) -> NavResult<PageDirection> {
        let (reply, outcome) = oneshot::channel();
        self.submit(NavRequest::Resolve {
            pending,
            reply: Some(reply),
        })
        .await?;
        outcome.await.map_err(|_| NavError::DispatcherClosed)?
    }

    /// Resolves once every request queued before this call has been processed.
    pub async fn settle(&self) -> NavResult<()> {
        let (reply, done) = oneshot::channel();
        self.submit(NavRequest::Barrier { reply }).await?;
        done.await.map_err(|_| NavError::DispatcherClosed)
    }

    async fn submit(&self, request: NavRequest) -> NavResult<()> {
        self.tx
            .send_async(request)
            .await
            .map_err(|_| NavError::DispatcherClosed)
    }
}

async fn run_dispatch_loop(spa: Arc<Spa>, rx: flume::Receiver<NavRequest>) {
    while let Ok(request) = rx.recv_async().await {
        match request {
            NavRequest::Resolve { pending, reply } => {
                let result = spa.resolve(pending).await;
                finish(reply, result);
            }
            NavRequest::Barrier { reply } => {
                let _ = reply.send(());
            }
            NavRequest::Shutdown => break,
        }
    }
    tracing::debug!("navigation dispatcher stopped");
}

fn finish(reply: Option<NavReply>, result: NavResult<PageDirection>) {
    match reply {
        Some(reply) => {
            let _ = reply.send(result);
        }
        None => {
            if let Err(err) = result {
                tracing::warn!(%err, "queued navigation failed");
            }
        }
    }
}
