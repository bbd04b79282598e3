//! End-to-end tests against the real filesystem watcher

use globwatch::{watch, ClassifierConfig, ClassifiedEvents, EventType, FilterConfig, WatchOptions};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Pull events until one for `path` has kind `kind`, or give up
async fn wait_for(events: &mut ClassifiedEvents, path: &str, kind: EventType) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        match tokio::time::timeout(remaining, events.next()).await {
            Ok(Some(Ok(event))) => {
                if event.path() == Path::new(path) && event.kind() == kind {
                    return true;
                }
            }
            Ok(Some(Err(e))) => panic!("watcher error: {}", e),
            Ok(None) | Err(_) => return false,
        }
    }
}

fn options(root: &Path) -> WatchOptions {
    WatchOptions::default()
        .root(root)
        // Generous window so slow CI still sees fresh timestamps
        .classifier(ClassifierConfig::default().with_threshold(Duration::from_secs(10)))
}

#[tokio::test]
async fn test_create_then_delete_reported() {
    let temp_dir = TempDir::new().unwrap();
    let mut events = watch("*.txt", options(temp_dir.path())).unwrap();

    // Give the backend a moment to register the watch
    tokio::time::sleep(Duration::from_millis(100)).await;

    let file = temp_dir.path().join("a.txt");
    fs::write(&file, b"hello").unwrap();
    assert!(wait_for(&mut events, "a.txt", EventType::Create).await);

    fs::remove_file(&file).unwrap();
    assert!(wait_for(&mut events, "a.txt", EventType::Delete).await);
}

#[tokio::test]
async fn test_non_matching_files_never_reported() {
    let temp_dir = TempDir::new().unwrap();
    let mut events = watch("*.txt", options(temp_dir.path())).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    fs::write(temp_dir.path().join("skip.md"), b"ignored").unwrap();
    fs::write(temp_dir.path().join("keep.txt"), b"kept").unwrap();

    assert!(wait_for(&mut events, "keep.txt", EventType::Create).await);
    assert!(events.tracked_paths().all(|p| p == Path::new("keep.txt")));
}

#[tokio::test]
async fn test_nested_paths_with_exclusions() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("src")).unwrap();
    fs::create_dir_all(temp_dir.path().join("build")).unwrap();

    let filter = FilterConfig {
        exclude: vec!["build/".to_string()],
        ..FilterConfig::default()
    };
    let mut events = watch("**/*.txt", options(temp_dir.path()).filter(filter)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    fs::write(temp_dir.path().join("build/out.txt"), b"generated").unwrap();
    fs::write(temp_dir.path().join("src/notes.txt"), b"notes").unwrap();

    assert!(wait_for(&mut events, "src/notes.txt", EventType::Create).await);
    assert!(events.history(Path::new("build/out.txt")).is_none());
}

#[tokio::test]
async fn test_cancellation_ends_stream_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    let token = CancellationToken::new();
    let mut events = watch("*.txt", options(temp_dir.path()).cancel(token.clone())).unwrap();

    token.cancel();

    let next = tokio::time::timeout(Duration::from_secs(5), events.next()).await;
    assert!(matches!(next, Ok(None)));
}

#[tokio::test]
async fn test_invalid_pattern_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    assert!(watch("[oops", options(temp_dir.path())).is_err());
}
