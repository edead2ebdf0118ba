//! Reload trigger for slide lists stored on disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tracing::{debug, warn};

const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Watches the directory holding a slide list and reports changes to the file
/// itself. Editors that save by replacing the file are covered because the
/// directory, not the inode, is watched.
pub struct SourceWatcher {
    file_name: OsString,
    rx: Receiver<DebounceEventResult>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl SourceWatcher {
    pub fn new(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .with_context(|| format!("{} is not a file path", path.display()))?
            .to_os_string();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel();
        let mut debouncer =
            new_debouncer(WATCH_DEBOUNCE, tx).context("Failed to create file watcher")?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        debug!(path = %path.display(), "watching slide list");

        Ok(Self {
            file_name,
            rx,
            _debouncer: debouncer,
        })
    }

    /// Drain pending notifications. Returns `true` if the watched file changed.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    changed |= events
                        .iter()
                        .any(|e| e.path.file_name() == Some(self.file_name.as_os_str()));
                }
                Err(e) => warn!(error = %e, "file watcher error"),
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_paths_without_file_name() {
        assert!(SourceWatcher::new(Path::new("/")).is_err());
    }

    #[test]
    fn test_quiet_until_something_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.yaml");
        std::fs::write(&path, "[]").unwrap();
        let watcher = SourceWatcher::new(&path).unwrap();
        assert!(!watcher.poll());
    }
}
