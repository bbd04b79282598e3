//! Event classification heuristic
//!
//! Raw notifications only say "something happened to this path". The
//! classifier compares the file's current timestamps against the path's
//! history to decide between Create, Modify, Delete and Unknown:
//!
//! 1. File present, no Create reported yet, created within the create threshold → Create
//! 2. File absent, no Delete reported yet → Delete
//! 3. Modified within the modify threshold → Modify
//! 4. Anything else → Unknown
//!
//! Exactly one event is produced per call.

use crate::event::{EventType, WatchEvent};
use crate::history::{FileHistory, HistoryStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::trace;

/// Default freshness window for both Create and Modify inference
pub const DEFAULT_THRESHOLD: Duration = Duration::from_millis(150);

/// Timestamps read from the filesystem for a present path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTimes {
    pub modified: SystemTime,
    pub created: SystemTime,
}

/// How repeated notifications for an absent path are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Every notification for an absent path yields Delete.
    ///
    /// The history entry is purged before its `delete_emitted` flag is read,
    /// so the flag never survives a failed lookup. Matches the behavior
    /// existing consumers were written against.
    #[default]
    Repeat,

    /// Delete is reported once per absence.
    ///
    /// The previous entry is read before it is purged. Any successful lookup
    /// ends the absence and re-arms Delete; reporting Delete re-arms Create.
    Once,
}

/// Classifier settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Window after creation time in which a present file counts as created
    #[serde(default = "default_threshold_ms")]
    pub create_threshold_ms: u64,

    /// Window after modification time in which a change counts as a modify
    #[serde(default = "default_threshold_ms")]
    pub modify_threshold_ms: u64,

    #[serde(default)]
    pub delete_mode: DeleteMode,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            create_threshold_ms: default_threshold_ms(),
            modify_threshold_ms: default_threshold_ms(),
            delete_mode: DeleteMode::default(),
        }
    }
}

impl ClassifierConfig {
    /// Use the same window for Create and Modify
    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        let ms = threshold.as_millis().min(u64::MAX as u128) as u64;
        self.create_threshold_ms = ms;
        self.modify_threshold_ms = ms;
        self
    }

    pub fn with_delete_mode(mut self, delete_mode: DeleteMode) -> Self {
        self.delete_mode = delete_mode;
        self
    }

    pub fn create_threshold(&self) -> Duration {
        Duration::from_millis(self.create_threshold_ms)
    }

    pub fn modify_threshold(&self) -> Duration {
        Duration::from_millis(self.modify_threshold_ms)
    }
}

fn default_threshold_ms() -> u64 {
    DEFAULT_THRESHOLD.as_millis() as u64
}

/// Stateless classifier; all per-path state lives in the [`HistoryStore`]
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    config: ClassifierConfig,
}

impl EventClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one notification for `path` and commit the updated history
    ///
    /// `times` is `None` when the metadata lookup failed.
    pub fn classify(
        &self,
        store: &mut HistoryStore,
        path: &Path,
        raw: notify::Event,
        times: Option<FileTimes>,
        now: SystemTime,
    ) -> WatchEvent {
        let prior = match times {
            Some(_) => store.get(path).copied(),
            None => {
                let purged = store.remove(path);
                match self.config.delete_mode {
                    // Purged entry is gone before it can be consulted
                    DeleteMode::Repeat => store.get(path).copied(),
                    DeleteMode::Once => purged,
                }
            }
        };

        let mut history = merge_history(prior, times, now);
        let kind = self.decide(&mut history, times.is_some(), now);

        trace!(
            path = %path.display(),
            %kind,
            create_emitted = history.create_emitted,
            delete_emitted = history.delete_emitted,
            "classified notification"
        );

        store.insert(path.to_path_buf(), history);
        WatchEvent::new(kind, path.to_path_buf(), raw)
    }

    fn decide(&self, history: &mut FileHistory, present: bool, now: SystemTime) -> EventType {
        // The file is back, whether or not it looks freshly created
        if present && self.config.delete_mode == DeleteMode::Once {
            history.delete_emitted = false;
        }

        if present
            && !history.create_emitted
            && elapsed(now, history.created_at) < self.config.create_threshold()
        {
            history.create_emitted = true;
            return EventType::Create;
        }

        if !present && !history.delete_emitted {
            history.delete_emitted = true;
            if self.config.delete_mode == DeleteMode::Once {
                history.create_emitted = false;
            }
            return EventType::Delete;
        }

        if elapsed(now, history.last_modified_at) < self.config.modify_threshold() {
            EventType::Modify
        } else {
            EventType::Unknown
        }
    }
}

/// Build the next history from fresh metadata, falling back to the prior entry
fn merge_history(
    prior: Option<FileHistory>,
    times: Option<FileTimes>,
    now: SystemTime,
) -> FileHistory {
    let base = prior.unwrap_or_else(|| FileHistory::unseen(now));

    FileHistory {
        observed_at: now,
        last_modified_at: times.map_or(base.last_modified_at, |t| t.modified),
        created_at: times.map_or(base.created_at, |t| t.created),
        create_emitted: base.create_emitted,
        delete_emitted: base.delete_emitted,
    }
}

/// Time since `earlier`; timestamps in the future count as fresh
fn elapsed(now: SystemTime, earlier: SystemTime) -> Duration {
    now.duration_since(earlier).unwrap_or(Duration::ZERO)
}
