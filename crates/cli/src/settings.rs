//! Watch configuration loaded from TOML plus command-line overrides
//!
//! Precedence: command-line flags > config file > built-in defaults.

use anyhow::{Context, Result};
use globwatch::{DeleteMode, WatchOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Values given on the command line; `None` leaves the file/default value
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub no_recursive: bool,
    pub threshold_ms: Option<u64>,
    pub delete_mode: Option<DeleteMode>,
    pub exclude: Vec<String>,
    pub gitignore: bool,
    pub ignore_case: bool,
}

/// Load options from `path` (if given) and apply overrides
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<WatchOptions> {
    let mut options = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => WatchOptions::default(),
    };

    apply(&mut options, overrides);
    Ok(options)
}

pub fn parse(contents: &str) -> Result<WatchOptions> {
    Ok(toml::from_str(contents)?)
}

fn apply(options: &mut WatchOptions, overrides: &Overrides) {
    if let Some(root) = &overrides.root {
        options.root = Some(root.clone());
    }
    if overrides.no_recursive {
        options.recursive = false;
    }
    if let Some(ms) = overrides.threshold_ms {
        options.classifier = options.classifier.clone().with_threshold(Duration::from_millis(ms));
    }
    if let Some(mode) = overrides.delete_mode {
        options.classifier.delete_mode = mode;
    }
    options.filter.exclude.extend(overrides.exclude.iter().cloned());
    if overrides.gitignore {
        options.filter.use_gitignore = true;
    }
    if overrides.ignore_case {
        options.filter.case_sensitive = false;
    }
}

/// Annotated example configuration
pub fn example_config() -> &'static str {
    r#"# globwatch configuration

# Directory to watch (default: current directory)
# root = "."

# Watch subdirectories (default: true)
recursive = true

# A file created within this window counts as Create (milliseconds)
create_threshold_ms = 150

# A file modified within this window counts as Modify (milliseconds)
modify_threshold_ms = 150

# "repeat": every notification for a missing file reports Delete
# "once":   Delete is reported once until the file reappears
delete_mode = "repeat"

# Gitignore-style patterns to skip
exclude = []

# Also skip paths ignored by <root>/.gitignore
use_gitignore = false

# Match the glob case-sensitively
case_sensitive = true
"#
}
