//! Classified watch events

use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;
use std::fmt;
use std::path::{Path, PathBuf};

/// Lifecycle event inferred for a path
///
/// `raw` is the notification that produced the event. It is carried through
/// untouched for consumers that want the backend's own view; the classifier
/// never looks at it.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Create { path: PathBuf, raw: notify::Event },
    Modify { path: PathBuf, raw: notify::Event },
    Delete { path: PathBuf, raw: notify::Event },
    /// The path changed but the heuristic could not tell how
    Unknown { path: PathBuf, raw: notify::Event },
}

/// Tag of a [`WatchEvent`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Create,
    Modify,
    Delete,
    Unknown,
}

impl WatchEvent {
    pub(crate) fn new(kind: EventType, path: PathBuf, raw: notify::Event) -> Self {
        match kind {
            EventType::Create => WatchEvent::Create { path, raw },
            EventType::Modify => WatchEvent::Modify { path, raw },
            EventType::Delete => WatchEvent::Delete { path, raw },
            EventType::Unknown => WatchEvent::Unknown { path, raw },
        }
    }

    pub fn kind(&self) -> EventType {
        match self {
            WatchEvent::Create { .. } => EventType::Create,
            WatchEvent::Modify { .. } => EventType::Modify,
            WatchEvent::Delete { .. } => EventType::Delete,
            WatchEvent::Unknown { .. } => EventType::Unknown,
        }
    }

    /// Path relative to the watch root
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Create { path, .. }
            | WatchEvent::Modify { path, .. }
            | WatchEvent::Delete { path, .. }
            | WatchEvent::Unknown { path, .. } => path,
        }
    }

    /// The originating backend notification
    pub fn raw(&self) -> &notify::Event {
        match self {
            WatchEvent::Create { raw, .. }
            | WatchEvent::Modify { raw, .. }
            | WatchEvent::Delete { raw, .. }
            | WatchEvent::Unknown { raw, .. } => raw,
        }
    }
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Create => "create",
            EventType::Modify => "modify",
            EventType::Delete => "delete",
            EventType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializes as `{"type": ..., "path": ...}`; the raw notification is omitted
impl Serialize for WatchEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WatchEvent", 2)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("path", self.path())?;
        state.end()
    }
}
