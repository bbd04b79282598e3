//! Classification stream
//!
//! Drives the whole pipeline one notification at a time:
//! source → filter → metadata lookup → classifier → consumer.
//!
//! Processing is strictly sequential. The only suspension points are waiting
//! for the next raw notification and waiting for the metadata lookup, so the
//! history store is never touched concurrently and needs no locking.

use crate::classify::EventClassifier;
use crate::error::Result;
use crate::event::WatchEvent;
use crate::filter::{relative_to, PathFilter};
use crate::history::{FileHistory, HistoryStore};
use crate::source::{MetadataProvider, NotificationSource};
use futures::stream::{self, Stream};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Lazy sequence of classified events for one watch
///
/// Owns its history; two streams never share one.
pub struct ClassifiedEvents {
    root: PathBuf,
    source: Box<dyn NotificationSource>,
    metadata: Box<dyn MetadataProvider>,
    filter: PathFilter,
    classifier: EventClassifier,
    history: HistoryStore,
    cancel: CancellationToken,
    finished: bool,
}

impl ClassifiedEvents {
    pub fn new(
        root: PathBuf,
        source: Box<dyn NotificationSource>,
        metadata: Box<dyn MetadataProvider>,
        filter: PathFilter,
        classifier: EventClassifier,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            root,
            source,
            metadata,
            filter,
            classifier,
            history: HistoryStore::new(),
            cancel,
            finished: false,
        }
    }

    /// Pull the next classified event
    ///
    /// Returns `None` once the source is exhausted or the watch is
    /// cancelled. A watcher error is yielded once as `Err` and ends the
    /// sequence.
    pub async fn next(&mut self) -> Option<Result<WatchEvent>> {
        if self.finished {
            return None;
        }

        loop {
            let received = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!("Watch on {} cancelled", self.root.display());
                    self.finished = true;
                    return None;
                }
                received = self.source.next() => received,
            };

            let notification = match received {
                Some(Ok(notification)) => notification,
                Some(Err(e)) => {
                    warn!("Watcher failed for {}: {}", self.root.display(), e);
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    info!("Watch on {} ended", self.root.display());
                    self.finished = true;
                    return None;
                }
            };

            let now = SystemTime::now();

            let Some(reported) = notification.path else {
                debug!("Dropping notification without a path: {:?}", notification.event.kind);
                continue;
            };

            let path = relative_to(&self.root, &reported);
            if !self.filter.matches(&path) {
                trace!("Ignoring {} (no match for {})", path.display(), self.filter.pattern());
                continue;
            }

            // Not preempted by cancellation: a started notification completes
            let times = self.metadata.stat(&self.root.join(&path)).await;

            let event = self
                .classifier
                .classify(&mut self.history, &path, notification.event, times, now);

            debug!("{} {}", event.kind(), event.path().display());
            return Some(Ok(event));
        }
    }

    /// Adapt into a [`futures::Stream`]
    pub fn into_stream(self) -> impl Stream<Item = Result<WatchEvent>> + Send {
        stream::unfold(self, |mut events| async move {
            let item = events.next().await?;
            Some((item, events))
        })
    }

    /// Token that ends this stream when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current history for a path relative to the root
    pub fn history(&self, path: &Path) -> Option<&FileHistory> {
        self.history.get(path)
    }

    pub fn tracked_paths(&self) -> impl Iterator<Item = &Path> {
        self.history.paths()
    }

    /// Forget all per-path history
    pub fn reset_history(&mut self) {
        self.history.clear();
    }
}
