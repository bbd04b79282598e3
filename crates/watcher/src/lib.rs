//! Glob-filtered file watching with lifecycle classification
//!
//! OS watchers report that *something* happened to a path, not what. This
//! crate turns that raw stream into Create / Modify / Delete / Unknown
//! events for paths matching a glob, using:
//! - File timestamps compared against a per-path history
//! - A freshness threshold (default 150ms)
//! - One-shot flags so a lifecycle transition is reported once
//!
//! ```no_run
//! # async fn demo() -> globwatch::Result<()> {
//! let mut events = globwatch::watch("**/*.txt", globwatch::WatchOptions::default())?;
//! while let Some(event) = events.next().await {
//!     let event = event?;
//!     println!("{} {}", event.kind(), event.path().display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod error;
pub mod event;
pub mod filter;
pub mod history;
pub mod options;
pub mod source;
pub mod stream;

pub use classify::{ClassifierConfig, DeleteMode, EventClassifier, FileTimes, DEFAULT_THRESHOLD};
pub use error::{Result, WatchError};
pub use event::{EventType, WatchEvent};
pub use filter::{FilterConfig, PathFilter};
pub use history::{FileHistory, HistoryStore};
pub use options::WatchOptions;
pub use source::{FsMetadata, MetadataProvider, NotificationSource, NotifySource, RawNotification};
pub use stream::ClassifiedEvents;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Watch for changes to files matching `pattern`
///
/// The pattern is matched against paths relative to the watch root. Each
/// call owns its own history, so independent watches never interfere.
pub fn watch(pattern: &str, options: WatchOptions) -> Result<ClassifiedEvents> {
    let root = options.resolve_root()?;
    let filter = PathFilter::with_config(pattern, &root, &options.filter)?;
    let source = NotifySource::new(&root, options.recursive)?;

    info!(
        "Watching {} for {} (recursive: {})",
        root.display(),
        pattern,
        options.recursive
    );

    Ok(ClassifiedEvents::new(
        root,
        Box::new(source),
        Box::new(FsMetadata),
        filter,
        EventClassifier::new(options.classifier),
        options.cancel.unwrap_or_else(CancellationToken::new),
    ))
}
