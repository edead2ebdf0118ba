//! Per-slide rendering contract: what a slide may do, when its document is
//! loaded, and whether it receives input.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, warn};

use crate::document::{self, Document};
use crate::slide::Slide;
use crate::source::{Resource, SlideSource};

/// Capabilities a slide document can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Scripts,
    SameOrigin,
    Popups,
    Forms,
}

impl Permission {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Permission set applied to every slide document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sandbox {
    allowed: u8,
}

impl Sandbox {
    pub fn deny_all() -> Self {
        Self { allowed: 0 }
    }

    /// Scripts, same-origin, popups and forms; nothing else.
    pub fn slide_default() -> Self {
        Self::deny_all()
            .allow(Permission::Scripts)
            .allow(Permission::SameOrigin)
            .allow(Permission::Popups)
            .allow(Permission::Forms)
    }

    pub fn allow(mut self, permission: Permission) -> Self {
        self.allowed |= permission.bit();
        self
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.allowed & permission.bit() != 0
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::slide_default()
    }
}

/// Whether slide `index` should have its document requested now.
/// The active slide always does; lazy slides wait until they are adjacent.
pub fn should_load(index: usize, active: Option<usize>) -> bool {
    match active {
        Some(active) => index.abs_diff(active) <= 1,
        None => false,
    }
}

/// Inactive slides sit under an overlay that swallows pointer input.
pub fn blocks_input(is_active: bool) -> bool {
    !is_active
}

#[derive(Debug, Clone)]
pub enum DocumentState {
    Loading,
    Ready(Arc<Document>),
    /// Fetch failed. The slide keeps showing its loading indicator.
    Failed(String),
}

impl DocumentState {
    /// The parsed document, once there is one to draw. Anything else shows
    /// the loading indicator.
    pub fn document(&self) -> Option<&Document> {
        match self {
            Self::Ready(doc) => Some(doc),
            _ => None,
        }
    }
}

struct Slot {
    url: String,
    resource: Resource,
    state: DocumentState,
}

type LoadResult = (i64, String, Result<Document, String>);

/// Document loads keyed by slide id. Results arrive from worker threads and
/// are applied on [`DocumentStore::poll`].
pub struct DocumentStore {
    source: Arc<dyn SlideSource>,
    slots: HashMap<i64, Slot>,
    tx: Sender<LoadResult>,
    rx: Receiver<LoadResult>,
}

impl DocumentStore {
    pub fn new(source: Arc<dyn SlideSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            slots: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Start loading `slide` unless it is already loading or loaded at its
    /// current url. A changed url starts over.
    pub fn request(&mut self, slide: &Slide) {
        if self.slots.get(&slide.id).is_some_and(|s| s.url == slide.url) {
            return;
        }
        let resource = self.source.resolve(&slide.url);
        debug!(id = slide.id, url = %slide.url, "loading slide document");
        self.slots.insert(
            slide.id,
            Slot {
                url: slide.url.clone(),
                resource: resource.clone(),
                state: DocumentState::Loading,
            },
        );

        if let Resource::Inline(html) = &resource {
            let doc = Document::parse(html);
            if let Some(slot) = self.slots.get_mut(&slide.id) {
                slot.state = DocumentState::Ready(Arc::new(doc));
            }
            return;
        }

        let tx = self.tx.clone();
        let id = slide.id;
        let url = slide.url.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("slide-doc-{id}"))
            .spawn(move || {
                let result = document::fetch(&resource).map_err(|e| e.to_string());
                // The store may be gone by now; a closed channel is fine.
                let _ = tx.send((id, url, result));
            });
        if let Err(e) = spawned {
            self.fail(slide.id, format!("could not start loader: {e}"));
        }
    }

    /// Apply finished loads. Returns `true` if any slot changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((id, url, result)) = self.rx.try_recv() {
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };
            // Stale result for a url the slide no longer has.
            if slot.url != url {
                continue;
            }
            match result {
                Ok(doc) => {
                    debug!(id, %url, "slide document ready");
                    slot.state = DocumentState::Ready(Arc::new(doc));
                }
                Err(message) => {
                    warn!(id, %url, %message, "slide document failed to load");
                    slot.state = DocumentState::Failed(message);
                }
            }
            changed = true;
        }
        changed
    }

    /// Drop slots for slides that no longer exist.
    pub fn retain(&mut self, slides: &[Slide]) {
        self.slots
            .retain(|id, slot| slides.iter().any(|s| s.id == *id && s.url == slot.url));
    }

    pub fn state(&self, id: i64) -> Option<&DocumentState> {
        self.slots.get(&id).map(|s| &s.state)
    }

    pub fn resource(&self, id: i64) -> Option<&Resource> {
        self.slots.get(&id).map(|s| &s.resource)
    }

    pub fn is_pending(&self) -> bool {
        self.slots
            .values()
            .any(|s| matches!(s.state, DocumentState::Loading))
    }

    fn fail(&mut self, id: i64, message: String) {
        warn!(id, %message, "slide document failed to load");
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.state = DocumentState::Failed(message);
        }
    }
}
