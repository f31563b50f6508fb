// ── Document state ────────────────────────────────────────────────────────────
//
// One text buffer, its optional file path, and the save point used to derive
// the modified flag.  Owned by exactly one `DocumentWindow`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    editor::{Clipboard, TextBuffer},
    error::{JotterError, Result},
    recent::RecentFiles,
};

/// Name shown for documents that have never been saved.
pub const UNTITLED: &str = "Untitled";

/// Application name appended to every window title.
pub const APP_NAME: &str = "Jotter";

/// A single open document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    buffer: TextBuffer,
    /// Path on disk, or `None` for an untitled buffer.
    path: Option<PathBuf>,
    /// Buffer revision at the last load or successful save.
    save_point: u64,
    /// Content at the save point.  Consulted only once the revision moves.
    saved_text: String,
}

impl Document {
    /// A fresh, untitled, empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` into a new document and record it in `recent`.
    ///
    /// The file is read verbatim as UTF-8.  On failure nothing is recorded.
    pub fn open(path: impl Into<PathBuf>, recent: &mut RecentFiles) -> Result<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|source| JotterError::FileOpen {
            path: path.clone(),
            source,
        })?;

        let buffer = TextBuffer::with_text(text);
        let doc = Self {
            save_point: buffer.revision(),
            saved_text: buffer.text().to_owned(),
            buffer,
            path: Some(path.clone()),
        };
        info!(path = %path.display(), chars = doc.char_count(), "opened document");
        recent.record_opened(path);
        Ok(doc)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn char_count(&self) -> usize {
        self.buffer.char_count()
    }

    /// `true` when the buffer differs from the last loaded or saved content.
    ///
    /// Edits that net out (typing then deleting the same text) read as clean.
    pub fn is_modified(&self) -> bool {
        self.buffer.revision() != self.save_point && self.buffer.text() != self.saved_text
    }

    /// `true` for an untitled document nobody has typed into.  Opening a file
    /// reuses such a window instead of creating a new one.
    pub fn is_pristine(&self) -> bool {
        self.path.is_none() && self.buffer.is_empty() && !self.is_modified()
    }

    /// The bare filename component, or `"Untitled"` if no path is set.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_owned())
    }

    /// Window title: `"name - Jotter"`, prefixed with `*` when modified.
    pub fn title(&self) -> String {
        let dirty = if self.is_modified() { "*" } else { "" };
        format!("{dirty}{} - {APP_NAME}", self.display_name())
    }

    // ── Saving ────────────────────────────────────────────────────────────────

    /// Write the buffer to the current path.
    ///
    /// Fails with `NoPath` for an untitled document; the caller must ask for
    /// a path and use `save_as`.  On success the document is clean and the
    /// path is recorded in `recent`.  On failure it stays modified.
    pub fn save(&mut self, recent: &mut RecentFiles) -> Result<()> {
        let path = self.path.clone().ok_or(JotterError::NoPath)?;
        fs::write(&path, self.buffer.text()).map_err(|source| JotterError::FileSave {
            path: path.clone(),
            source,
        })?;
        self.mark_saved();
        debug!(path = %path.display(), "saved document");
        recent.record_opened(path);
        Ok(())
    }

    fn mark_saved(&mut self) {
        self.save_point = self.buffer.revision();
        self.saved_text.clear();
        self.saved_text.push_str(self.buffer.text());
    }

    /// Adopt `path` and save to it.
    pub fn save_as(&mut self, path: impl Into<PathBuf>, recent: &mut RecentFiles) -> Result<()> {
        self.path = Some(path.into());
        self.save(recent)
    }

    // ── Editing ───────────────────────────────────────────────────────────────
    //
    // Every method returns `true` when the buffer content changed.

    pub fn insert(&mut self, text: &str) -> bool {
        self.buffer.insert(text)
    }

    pub fn delete_backward(&mut self) -> bool {
        self.buffer.delete_backward()
    }

    pub fn select(&mut self, anchor: usize, caret: usize) {
        self.buffer.select(anchor, caret);
    }

    pub fn select_all(&mut self) {
        self.buffer.select_all();
    }

    pub fn set_caret(&mut self, pos: usize) {
        self.buffer.set_caret(pos);
    }

    pub fn undo(&mut self) -> bool {
        self.buffer.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.buffer.redo()
    }

    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        self.buffer.cut(clipboard)
    }

    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> bool {
        self.buffer.copy(clipboard)
    }

    pub fn paste(&mut self, clipboard: &dyn Clipboard) -> bool {
        self.buffer.paste(clipboard)
    }

    /// Mirror the full text of a toolkit widget into the buffer as a single
    /// undoable edit.
    pub fn replace_text(&mut self, text: &str) -> bool {
        self.buffer.sync_to(text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::LocalClipboard;

    fn file_with(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, contents).expect("write fixture");
        p
    }

    #[test]
    fn new_document_is_clean_and_untitled() {
        let doc = Document::new();
        assert!(!doc.is_modified());
        assert!(doc.path().is_none());
        assert_eq!(doc.char_count(), 0);
        assert!(doc.is_pristine());
        assert_eq!(doc.title(), "Untitled - Jotter");
    }

    #[test]
    fn open_reads_file_and_records_recent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = file_with(&dir, "a.txt", "hello");
        let mut recent = RecentFiles::new();

        let doc = Document::open(&p, &mut recent).expect("open");
        assert_eq!(doc.text(), "hello");
        assert_eq!(doc.char_count(), 5);
        assert!(!doc.is_modified());
        assert_eq!(doc.path(), Some(p.as_path()));
        assert_eq!(recent.get(0), Some(p.as_path()));
        assert_eq!(doc.title(), "a.txt - Jotter");
    }

    #[test]
    fn open_missing_file_fails_without_recording() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut recent = RecentFiles::new();
        let err = Document::open(dir.path().join("nope.txt"), &mut recent).unwrap_err();
        assert!(matches!(err, JotterError::FileOpen { .. }));
        assert!(recent.is_empty());
    }

    #[test]
    fn edit_marks_modified_and_title() {
        let mut doc = Document::new();
        assert!(doc.insert("x"));
        assert!(doc.is_modified());
        assert_eq!(doc.title(), "*Untitled - Jotter");
        assert!(!doc.is_pristine());
    }

    #[test]
    fn undo_to_save_point_is_clean() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = file_with(&dir, "a.txt", "hello");
        let mut recent = RecentFiles::new();
        let mut doc = Document::open(&p, &mut recent).expect("open");

        doc.set_caret(5);
        doc.insert("!");
        assert!(doc.is_modified());
        doc.undo();
        assert!(!doc.is_modified());
        doc.redo();
        assert!(doc.is_modified());
    }

    #[test]
    fn typing_then_deleting_returns_to_clean() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = file_with(&dir, "a.txt", "hello");
        let mut recent = RecentFiles::new();
        let mut doc = Document::open(&p, &mut recent).expect("open");

        doc.set_caret(5);
        assert!(doc.insert("!"));
        assert!(doc.is_modified());
        assert!(doc.delete_backward());
        assert_eq!(doc.text(), "hello");
        assert!(!doc.is_modified());
        assert_eq!(doc.title(), "a.txt - Jotter");

        // Content that merely has the same length is still a change.
        doc.select_all();
        doc.insert("jello");
        assert!(doc.is_modified());
    }

    #[test]
    fn save_without_path_is_rejected() {
        let mut doc = Document::new();
        doc.insert("draft");
        let mut recent = RecentFiles::new();
        assert!(matches!(doc.save(&mut recent), Err(JotterError::NoPath)));
        assert!(doc.is_modified());
    }

    #[test]
    fn save_as_writes_verbatim_and_cleans() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.txt");
        let mut recent = RecentFiles::new();

        let mut doc = Document::new();
        doc.insert("line one\r\nline two\n");
        doc.save_as(&target, &mut recent).expect("save_as");

        assert!(!doc.is_modified());
        assert_eq!(fs::read_to_string(&target).expect("read"), "line one\r\nline two\n");
        assert_eq!(recent.get(0), Some(target.as_path()));
        assert_eq!(doc.display_name(), "out.txt");
    }

    #[test]
    fn failed_save_keeps_modified() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut recent = RecentFiles::new();
        let mut doc = Document::new();
        doc.insert("data");
        let bad = dir.path().join("missing-dir").join("f.txt");
        assert!(matches!(
            doc.save_as(&bad, &mut recent),
            Err(JotterError::FileSave { .. })
        ));
        assert!(doc.is_modified());
        assert!(recent.is_empty());
    }

    #[test]
    fn edit_after_save_is_modified_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut recent = RecentFiles::new();
        let mut doc = Document::new();
        doc.insert("a");
        doc.save_as(dir.path().join("f.txt"), &mut recent).expect("save");
        doc.insert("b");
        assert!(doc.is_modified());
    }

    #[test]
    fn clipboard_edits_set_modified() {
        let mut clip = LocalClipboard::default();
        let dir = tempfile::tempdir().expect("tempdir");
        let p = file_with(&dir, "c.txt", "copy me");
        let mut recent = RecentFiles::new();
        let mut doc = Document::open(&p, &mut recent).expect("open");

        doc.select_all();
        assert!(doc.copy(&mut clip));
        assert!(!doc.is_modified(), "copy is not a content change");

        assert!(doc.cut(&mut clip));
        assert!(doc.is_modified());
        assert_eq!(doc.char_count(), 0);

        assert!(doc.paste(&clip));
        assert_eq!(doc.text(), "copy me");
    }

    #[test]
    fn replace_text_mirrors_widget() {
        let mut doc = Document::new();
        assert!(doc.replace_text("typed in widget"));
        assert!(doc.is_modified());
        assert!(!doc.replace_text("typed in widget"));
        doc.undo();
        assert_eq!(doc.text(), "");
        assert!(!doc.is_modified());
    }
}
