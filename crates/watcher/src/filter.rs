//! Path filtering
//!
//! A notification is kept only when its path (relative to the watch root)
//! matches the include glob and is not excluded. Exclusions come from two
//! optional sources:
//! 1. Extra gitignore-style patterns from configuration
//! 2. The root's `.gitignore` (off by default)

use crate::error::Result;
use glob::{MatchOptions, Pattern};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Exclusion and matching settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Gitignore-style patterns whose matches are dropped
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Also drop paths ignored by `<root>/.gitignore` (default: false)
    #[serde(default)]
    pub use_gitignore: bool,

    /// Match the include glob case-sensitively (default: true)
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude: vec![],
            use_gitignore: false,
            case_sensitive: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Include glob plus exclusion rules, fixed for the lifetime of a watch
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: Pattern,
    options: MatchOptions,
    excludes: Option<Gitignore>,
    gitignore: Option<Gitignore>,
}

impl PathFilter {
    /// Build a filter for `pattern` with no exclusions
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
            options: match_options(true),
            excludes: None,
            gitignore: None,
        })
    }

    /// Build a filter with exclusion rules rooted at `root`
    pub fn with_config(pattern: &str, root: &Path, config: &FilterConfig) -> Result<Self> {
        let excludes = if config.exclude.is_empty() {
            None
        } else {
            let mut builder = GitignoreBuilder::new(root);
            for rule in &config.exclude {
                builder.add_line(None, rule)?;
            }
            Some(builder.build()?)
        };

        let gitignore = if config.use_gitignore {
            let gitignore_path = root.join(".gitignore");
            if gitignore_path.exists() {
                let mut builder = GitignoreBuilder::new(root);
                if let Some(err) = builder.add(&gitignore_path) {
                    return Err(err.into());
                }
                Some(builder.build()?)
            } else {
                None
            }
        } else {
            None
        };

        Ok(Self {
            pattern: Pattern::new(pattern)?,
            options: match_options(config.case_sensitive),
            excludes,
            gitignore,
        })
    }

    /// Whether a path relative to the watch root should be classified
    pub fn matches(&self, path: &Path) -> bool {
        if !self.pattern.matches_path_with(path, self.options) {
            return false;
        }

        !self.is_excluded(path)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        // Rules are rooted at the watch root; anything outside it can't match
        if path.has_root() {
            return false;
        }

        // Deleted paths can't be stat'ed; treat everything as a file
        [&self.excludes, &self.gitignore]
            .into_iter()
            .flatten()
            .any(|rules| rules.matched_path_or_any_parents(path, false).is_ignore())
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// `*` stops at separators and leading dots must be spelled out
fn match_options(case_sensitive: bool) -> MatchOptions {
    MatchOptions {
        case_sensitive,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    }
}

/// Express `path` relative to `root` when it lies underneath it
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
