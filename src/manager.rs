// ── Window manager ────────────────────────────────────────────────────────────
//
// Pure Rust bookkeeping for the set of open document windows.  Each window is
// an independent owned unit; nothing here reaches from one window into
// another.  The native shell keeps its own handle → `WindowId` map.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use tracing::info;

use crate::{document::Document, error::Result, recent::RecentFiles, session::ClosePolicy};

/// Stable identifier of one document window for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// One editor window: its document plus the last transient status notice.
#[derive(Debug, Clone)]
pub struct DocumentWindow {
    id: WindowId,
    pub document: Document,
    /// Transient message shown in the status bar until the next edit.
    pub notice: Option<String>,
}

impl DocumentWindow {
    pub fn id(&self) -> WindowId {
        self.id
    }
}

/// Answer to a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Close immediately.
    Close,
    /// The document has unsaved changes; ask before closing.
    ConfirmUnsaved,
}

/// All open document windows, in creation order.
#[derive(Debug, Default)]
pub struct WindowManager {
    windows: BTreeMap<WindowId, DocumentWindow>,
    next_id: u64,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window holding a new untitled document.
    pub fn open_new_window(&mut self) -> WindowId {
        self.insert(Document::new())
    }

    /// Open `path` in a new window.  On a read error no window is created.
    pub fn open_file_window(
        &mut self,
        path: impl Into<PathBuf>,
        recent: &mut RecentFiles,
    ) -> Result<WindowId> {
        let doc = Document::open(path, recent)?;
        Ok(self.insert(doc))
    }

    /// Add a window for an already-built document.
    pub fn insert(&mut self, document: Document) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(
            id,
            DocumentWindow {
                id,
                document,
                notice: None,
            },
        );
        info!(%id, open = self.windows.len(), "window opened");
        id
    }

    /// Remove one window and hand back its state.  Siblings are untouched.
    pub fn close_window(&mut self, id: WindowId) -> Option<DocumentWindow> {
        let closed = self.windows.remove(&id);
        if closed.is_some() {
            info!(%id, open = self.windows.len(), "window closed");
        }
        closed
    }

    /// Decide whether `id` may close right away under `policy`.
    ///
    /// Unknown ids close trivially.
    pub fn request_close(&self, id: WindowId, policy: ClosePolicy) -> CloseDecision {
        match (self.windows.get(&id), policy) {
            (Some(w), ClosePolicy::Prompt) if w.document.is_modified() => {
                CloseDecision::ConfirmUnsaved
            }
            _ => CloseDecision::Close,
        }
    }

    pub fn get(&self, id: WindowId) -> Option<&DocumentWindow> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut DocumentWindow> {
        self.windows.get_mut(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentWindow> {
        self.windows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DocumentWindow> {
        self.windows.values_mut()
    }

    /// `true` when any open document has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.windows.values().any(|w| w.document.is_modified())
    }

    /// Ids of every window whose document has unsaved changes.
    pub fn unsaved_windows(&self) -> Vec<WindowId> {
        self.windows
            .values()
            .filter(|w| w.document.is_modified())
            .map(|w| w.id)
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
