//! Options for [`crate::watch`]

use crate::classify::ClassifierConfig;
use crate::error::{Result, WatchError};
use crate::filter::FilterConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Watch configuration
///
/// Deserializes from a flat table, e.g.
///
/// ```toml
/// root = "src"
/// recursive = true
/// create_threshold_ms = 150
/// modify_threshold_ms = 150
/// delete_mode = "repeat"
/// exclude = ["target/"]
/// use_gitignore = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchOptions {
    /// Directory to watch (default: current working directory)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Watch subdirectories too (default: true)
    #[serde(default = "default_true")]
    pub recursive: bool,

    #[serde(flatten)]
    pub classifier: ClassifierConfig,

    #[serde(flatten)]
    pub filter: FilterConfig,

    /// Ends the stream when cancelled
    #[serde(skip)]
    pub cancel: Option<CancellationToken>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            root: None,
            recursive: true,
            classifier: ClassifierConfig::default(),
            filter: FilterConfig::default(),
            cancel: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl WatchOptions {
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Absolute, canonical watch root
    ///
    /// Canonicalized so backend paths (which are canonical on some
    /// platforms) can be made relative to it.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };

        let root = root.canonicalize()?;
        if !root.is_dir() {
            return Err(WatchError::InvalidRoot(root));
        }
        Ok(root)
    }
}
