//! Inputs to the classification stream
//!
//! The stream pulls raw notifications from a [`NotificationSource`] and
//! looks up timestamps through a [`MetadataProvider`]. Production code uses
//! [`NotifySource`] (OS watcher via `notify`) and [`FsMetadata`]; tests plug
//! in scripted implementations.

use crate::classify::FileTimes;
use crate::error::{Result, WatchError};
use async_trait::async_trait;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Raw events buffered between the OS watcher thread and the stream
const RAW_CHANNEL_CAPACITY: usize = 256;

/// One path-level notification from the OS watcher
#[derive(Debug, Clone)]
pub struct RawNotification {
    /// Affected path as reported by the backend (absolute), if any
    pub path: Option<PathBuf>,
    /// Backend event this notification was split from
    pub event: notify::Event,
}

impl RawNotification {
    /// One notification per path; an event without paths yields a single
    /// pathless notification so it can be dropped downstream
    pub fn split(event: notify::Event) -> Vec<RawNotification> {
        if event.paths.is_empty() {
            return vec![RawNotification { path: None, event }];
        }

        event
            .paths
            .iter()
            .map(|path| RawNotification {
                path: Some(path.clone()),
                event: event.clone(),
            })
            .collect()
    }
}

/// Producer of raw notifications
///
/// `None` means the source is exhausted. Implementations must be cancel
/// safe: dropping a pending `next()` future must not lose a notification.
#[async_trait]
pub trait NotificationSource: Send {
    async fn next(&mut self) -> Option<Result<RawNotification>>;
}

/// Filesystem timestamp lookup; `None` when the path is absent or unreadable
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn stat(&self, path: &Path) -> Option<FileTimes>;
}

/// Real filesystem metadata via `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMetadata;

#[async_trait]
impl MetadataProvider for FsMetadata {
    async fn stat(&self, path: &Path) -> Option<FileTimes> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                trace!("stat {} failed: {}", path.display(), e);
                return None;
            }
        };

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        // Filesystems without birth time fall back to mtime
        let created = metadata.created().unwrap_or(modified);

        Some(FileTimes { modified, created })
    }
}

/// OS watcher bridged into a tokio channel
///
/// Dropping the source stops the underlying watch.
pub struct NotifySource {
    // Declared before the watcher so the receiver closes first on drop and a
    // backend thread blocked on a full channel is released
    rx: mpsc::Receiver<notify::Result<notify::Event>>,
    _watcher: RecommendedWatcher,
    pending: VecDeque<RawNotification>,
}

impl NotifySource {
    /// Start watching `root`
    pub fn new(root: &Path, recursive: bool) -> Result<Self> {
        let (tx, rx) = mpsc::channel(RAW_CHANNEL_CAPACITY);

        // The handler runs on the backend's own thread, outside the runtime
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.blocking_send(res);
            },
            Config::default(),
        )?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher.watch(root, mode)?;

        debug!("Watching {} ({:?})", root.display(), mode);

        Ok(Self {
            rx,
            _watcher: watcher,
            pending: VecDeque::new(),
        })
    }
}

#[async_trait]
impl NotificationSource for NotifySource {
    async fn next(&mut self) -> Option<Result<RawNotification>> {
        loop {
            if let Some(notification) = self.pending.pop_front() {
                return Some(Ok(notification));
            }

            match self.rx.recv().await? {
                Ok(event) => self.pending.extend(RawNotification::split(event)),
                Err(e) => return Some(Err(WatchError::Notify(e))),
            }
        }
    }
}
