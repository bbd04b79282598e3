//! Stream classified events to stdout until interrupted

use anyhow::{Context, Result};
use globwatch::{EventType, WatchEvent, WatchOptions};
use owo_colors::OwoColorize;
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub async fn run(pattern: &str, mut options: WatchOptions, json: bool) -> Result<()> {
    let token = CancellationToken::new();
    options.cancel = Some(token.clone());

    let mut events = globwatch::watch(pattern, options)
        .with_context(|| format!("Failed to start watching for '{}'", pattern))?;

    // Ctrl-C ends the stream instead of killing the process mid-write
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, stopping watch");
            token.cancel();
        }
    });

    debug!("Printing events for {} as {}", pattern, if json { "json" } else { "text" });

    let stdout = std::io::stdout();
    let mut count = 0usize;

    while let Some(event) = events.next().await {
        let event = event.context("File watcher failed")?;
        let line = if json {
            serde_json::to_string(&event)?
        } else {
            format_event(&event)
        };

        let mut out = stdout.lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
        count += 1;
    }

    info!("Watch stopped after {} events", count);
    Ok(())
}

fn format_event(event: &WatchEvent) -> String {
    let label = format!("{:<7}", event.kind().as_str());
    let label = match event.kind() {
        EventType::Create => label.green().to_string(),
        EventType::Modify => label.yellow().to_string(),
        EventType::Delete => label.red().to_string(),
        EventType::Unknown => label.dimmed().to_string(),
    };

    format!("{} {}", label, event.path().display())
}
