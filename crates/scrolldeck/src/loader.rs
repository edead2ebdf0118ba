use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use tracing::{info, warn};

use crate::slide::Slide;
use crate::source::{SlideSource, SourceError};

/// What the host shows while the slide list is being obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    /// The list could not be fetched. No partial data is kept.
    Failed(String),
    /// Fetched successfully; may be empty.
    Ready(Vec<Slide>),
}

impl LoadState {
    pub fn slides(&self) -> Option<&[Slide]> {
        match self {
            Self::Ready(slides) => Some(slides),
            _ => None,
        }
    }

    pub fn is_empty_deck(&self) -> bool {
        matches!(self, Self::Ready(slides) if slides.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// First load or manual retry: failures replace the state.
    Load,
    /// Background refresh: failures keep the current slides.
    Refresh,
}

type Outcome = Result<Vec<Slide>, SourceError>;

/// Runs a [`SlideSource`] off the UI thread.
pub struct SlideLoader {
    source: Arc<dyn SlideSource>,
    state: LoadState,
    pending: Option<(Mode, Receiver<Outcome>)>,
}

impl SlideLoader {
    pub fn start(source: Arc<dyn SlideSource>) -> Self {
        let mut loader = Self {
            source,
            state: LoadState::Loading,
            pending: None,
        };
        loader.spawn(Mode::Load);
        loader
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn source(&self) -> &Arc<dyn SlideSource> {
        &self.source
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Discard the current state and load again from scratch.
    pub fn retry(&mut self) {
        info!(source = %self.source.describe(), "retrying slide list");
        self.state = LoadState::Loading;
        self.spawn(Mode::Load);
    }

    /// Reload in the background, keeping the current slides on screen until
    /// the new list arrives. A failed refresh is logged and dropped.
    pub fn refresh(&mut self) {
        if matches!(self.state, LoadState::Ready(_)) {
            self.spawn(Mode::Refresh);
        } else {
            self.retry();
        }
    }

    /// Collect a finished fetch. Returns `true` when the state changed.
    pub fn poll(&mut self) -> bool {
        let Some((mode, rx)) = &self.pending else {
            return false;
        };
        let mode = *mode;
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(SourceError::Http {
                url: self.source.describe(),
                message: "loader thread exited without a result".to_string(),
            }),
        };
        self.pending = None;
        self.apply(mode, outcome)
    }

    /// Block until the pending fetch finishes.
    pub fn wait(&mut self) -> &LoadState {
        if let Some((mode, rx)) = self.pending.take() {
            let outcome = rx.recv().unwrap_or_else(|_| {
                Err(SourceError::Http {
                    url: self.source.describe(),
                    message: "loader thread exited without a result".to_string(),
                })
            });
            self.apply(mode, outcome);
        }
        &self.state
    }

    fn apply(&mut self, mode: Mode, outcome: Outcome) -> bool {
        match (mode, outcome) {
            (_, Ok(slides)) => {
                info!(count = slides.len(), "slides loaded");
                let changed = self.state != LoadState::Ready(slides.clone());
                self.state = LoadState::Ready(slides);
                changed
            }
            (Mode::Load, Err(e)) => {
                warn!(error = %e, "failed to load slides");
                self.state = LoadState::Failed(e.to_string());
                true
            }
            (Mode::Refresh, Err(e)) => {
                warn!(error = %e, "refresh failed; keeping current slides");
                false
            }
        }
    }

    fn spawn(&mut self, mode: Mode) {
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let spawned = std::thread::Builder::new()
            .name("slide-list".to_string())
            .spawn(move || {
                let _ = tx.send(source.list_slides());
            });
        match spawned {
            Ok(_) => self.pending = Some((mode, rx)),
            Err(e) => {
                self.pending = None;
                if mode == Mode::Load {
                    self.state = LoadState::Failed(format!("could not start loader: {e}"));
                }
            }
        }
    }
}
