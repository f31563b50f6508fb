// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `Editor` is created on startup and owned by the native shell for the
// lifetime of the process.  All mutations happen on the UI thread; there is
// no global mutable state.  Preferences live here and are lent to the window
// manager and autosave timer as needed.

use std::{path::PathBuf, time::Duration};

use tracing::{info, warn};

use crate::{
    autosave::{AutosaveReport, AutosaveTimer},
    commands::Command,
    document::Document,
    editor::LocalClipboard,
    error::{JotterError, Result},
    manager::{CloseDecision, WindowId, WindowManager},
    session::{
        ClosePolicy, Preferences, Rgb, SettingsStore, MAX_FONT_SIZE, MAX_WINDOW_SIZE,
        MIN_FONT_SIZE, MIN_WINDOW_SIZE,
    },
};

// ── Notices ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A user-visible, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Window the message concerns, or `None` for application-wide messages.
    pub window: Option<WindowId>,
    pub level: NoticeLevel,
    pub message: String,
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// What the shell must do after a command.  Titles, status bars and the
/// Recent Files menu should be refreshed after every outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing beyond the routine refresh.
    None,
    /// The core changed this window's text; push it back into the widget.
    ReloadText(WindowId),
    /// A new window was added to the manager; create its native window.
    WindowOpened(WindowId),
    /// Font or colours changed; restyle every window.
    StyleChanged,
    /// Ask the user for a file to open into this window.
    AskOpenPath(WindowId),
    /// Ask the user for a path, then call `save_as`.
    AskSavePath(WindowId),
    /// Show the font picker, then call `set_font_family` or `set_font_size`.
    PickFont(WindowId),
    /// Show a colour picker, then call `set_font_color`.
    PickFontColor(WindowId),
    /// Show a colour picker, then call `set_background_color`.
    PickBackgroundColor(WindowId),
    /// Unsaved changes; ask save / discard / cancel, then `force_close`.
    ConfirmClose(WindowId),
    /// Unsaved changes; ask save / discard / cancel, then `reset_document`.
    ConfirmNewFile(WindowId),
    /// The window was removed; destroy its native window.
    WindowClosed(WindowId),
    /// Unsaved changes in these windows; confirm before `shutdown`.
    ConfirmExit(Vec<WindowId>),
    /// Persist settings with `shutdown` and end the event loop.
    Quit,
}

// ── Editor ────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct Editor {
    prefs: Preferences,
    store: SettingsStore,
    windows: WindowManager,
    autosave: AutosaveTimer,
    clipboard: LocalClipboard,
    notices: Vec<Notice>,
}

impl Editor {
    /// Load preferences from `store` (defaults on any failure) and build the
    /// autosave timer from them.  No windows are open yet.
    pub fn start(store: SettingsStore) -> Self {
        let prefs = store.load();
        Self::with_preferences(store, prefs)
    }

    pub fn with_preferences(store: SettingsStore, prefs: Preferences) -> Self {
        let autosave = AutosaveTimer::new(
            Duration::from_secs(prefs.autosave_interval_secs),
            prefs.autosave_enabled,
        );
        Self {
            prefs,
            store,
            windows: WindowManager::new(),
            autosave,
            clipboard: LocalClipboard::default(),
            notices: Vec::new(),
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn autosave(&self) -> &AutosaveTimer {
        &self.autosave
    }

    pub fn document(&self, id: WindowId) -> Option<&Document> {
        self.windows.get(id).map(|w| &w.document)
    }

    pub fn document_mut(&mut self, id: WindowId) -> Option<&mut Document> {
        self.windows.get_mut(id).map(|w| &mut w.document)
    }

    /// Drain queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ── Windows ───────────────────────────────────────────────────────────────

    pub fn open_new_window(&mut self) -> WindowId {
        self.windows.open_new_window()
    }

    /// Open `path` from window `id`.
    ///
    /// A pristine untitled window is reused; otherwise the file gets a new
    /// window.  A read failure leaves every window as it was.
    pub fn open_path(&mut self, id: WindowId, path: impl Into<PathBuf>) -> Result<Outcome> {
        let path = path.into();
        let reuse = self.windows.get(id).is_some_and(|w| w.document.is_pristine());
        if reuse {
            let doc = Document::open(&path, &mut self.prefs.recent_files)?;
            if let Some(w) = self.windows.get_mut(id) {
                w.document = doc;
                w.notice = None;
            }
            Ok(Outcome::ReloadText(id))
        } else {
            let new_id = self.windows.open_file_window(&path, &mut self.prefs.recent_files)?;
            Ok(Outcome::WindowOpened(new_id))
        }
    }

    /// Open entry `index` of the Recent Files ring.
    pub fn open_recent(&mut self, id: WindowId, index: usize) -> Result<Outcome> {
        let Some(path) = self.prefs.recent_files.get(index).map(|p| p.to_path_buf()) else {
            return Ok(Outcome::None);
        };
        self.open_path(id, path)
    }

    /// Start a new untitled document in `id`, replacing the current one.
    pub fn new_file(&mut self, id: WindowId) -> Outcome {
        let Some(w) = self.windows.get(id) else {
            return Outcome::None;
        };
        if w.document.is_modified() && self.prefs.close_policy == ClosePolicy::Prompt {
            Outcome::ConfirmNewFile(id)
        } else {
            self.reset_document(id)
        }
    }

    /// Replace the document in `id` with an empty untitled one.  The path,
    /// text and undo history are all dropped.
    pub fn reset_document(&mut self, id: WindowId) -> Outcome {
        let Some(w) = self.windows.get_mut(id) else {
            return Outcome::None;
        };
        w.document = Document::new();
        w.notice = None;
        Outcome::ReloadText(id)
    }

    /// Start closing `id`, honouring the configured close policy.
    pub fn close_window(&mut self, id: WindowId) -> Outcome {
        match self.windows.request_close(id, self.prefs.close_policy) {
            CloseDecision::ConfirmUnsaved => Outcome::ConfirmClose(id),
            CloseDecision::Close => self.force_close(id),
        }
    }

    /// Close `id` regardless of unsaved changes.  Closing the last window
    /// ends the application.
    pub fn force_close(&mut self, id: WindowId) -> Outcome {
        if self.windows.close_window(id).is_none() {
            return Outcome::None;
        }
        if self.windows.is_empty() {
            Outcome::Quit
        } else {
            Outcome::WindowClosed(id)
        }
    }

    /// Start exiting the application.
    pub fn exit(&mut self) -> Outcome {
        let unsaved = self.windows.unsaved_windows();
        if unsaved.is_empty() || self.prefs.close_policy == ClosePolicy::Discard {
            Outcome::Quit
        } else {
            Outcome::ConfirmExit(unsaved)
        }
    }

    /// Persist preferences.  Called once when the event loop ends.
    pub fn shutdown(&mut self) -> Result<()> {
        info!(open_windows = self.windows.len(), "shutting down");
        self.store.save(&self.prefs)
    }

    // ── Saving ────────────────────────────────────────────────────────────────

    /// Save `id` to its path, or ask for one.
    pub fn save(&mut self, id: WindowId) -> Result<Outcome> {
        let Some(w) = self.windows.get_mut(id) else {
            return Ok(Outcome::None);
        };
        match w.document.save(&mut self.prefs.recent_files) {
            Ok(()) => {
                w.notice = Some("Saved".to_owned());
                Ok(Outcome::None)
            }
            Err(JotterError::NoPath) => Ok(Outcome::AskSavePath(id)),
            Err(e) => Err(e),
        }
    }

    pub fn save_as(&mut self, id: WindowId, path: impl Into<PathBuf>) -> Result<()> {
        if let Some(w) = self.windows.get_mut(id) {
            w.document.save_as(path, &mut self.prefs.recent_files)?;
            w.notice = Some("Saved".to_owned());
        }
        Ok(())
    }

    // ── Preferences ───────────────────────────────────────────────────────────

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        let family = family.into();
        if !family.trim().is_empty() {
            self.prefs.font_family = family;
        }
    }

    /// Set the font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: u32) {
        self.prefs.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    pub fn increase_font_size(&mut self) {
        self.set_font_size(self.prefs.font_size.saturating_add(1));
    }

    pub fn decrease_font_size(&mut self) {
        self.set_font_size(self.prefs.font_size.saturating_sub(1));
    }

    /// Remember the window size (pixels at 96 DPI) for the next window.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.prefs.window_width = width.clamp(MIN_WINDOW_SIZE, MAX_WINDOW_SIZE);
        self.prefs.window_height = height.clamp(MIN_WINDOW_SIZE, MAX_WINDOW_SIZE);
    }

    pub fn set_font_color(&mut self, color: Rgb) {
        self.prefs.font_color = color;
    }

    pub fn set_background_color(&mut self, color: Rgb) {
        self.prefs.background_color = color;
    }

    /// Flip autosave.  Turning it on restarts the cycle from zero.
    pub fn toggle_autosave(&mut self) -> bool {
        let enabled = !self.prefs.autosave_enabled;
        self.prefs.autosave_enabled = enabled;
        self.autosave.set_enabled(enabled);
        enabled
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    /// Insert typed text at the caret of `id`.
    pub fn type_text(&mut self, id: WindowId, text: &str) -> bool {
        self.edit(id, |doc| doc.insert(text))
    }

    /// Mirror the full widget text of `id` into its document.
    pub fn sync_text(&mut self, id: WindowId, text: &str) -> bool {
        self.edit(id, |doc| doc.replace_text(text))
    }

    fn edit(&mut self, id: WindowId, f: impl FnOnce(&mut Document) -> bool) -> bool {
        let Some(w) = self.windows.get_mut(id) else {
            return false;
        };
        let changed = f(&mut w.document);
        if changed {
            w.notice = None;
        }
        changed
    }

    // ── Autosave ──────────────────────────────────────────────────────────────

    /// Feed elapsed time to the autosave timer and run a pass when one is
    /// due.  Results are posted as notices.
    pub fn tick(&mut self, elapsed: Duration) -> Option<AutosaveReport> {
        self.autosave.advance(elapsed);
        let report = self
            .autosave
            .run_pending(&mut self.windows, &mut self.prefs.recent_files)?;

        for &id in &report.saved {
            if let Some(w) = self.windows.get_mut(id) {
                w.notice = Some("Autosaved".to_owned());
            }
        }
        for (id, e) in &report.failures {
            let message = format!("Autosave failed: {e}");
            if let Some(w) = self.windows.get_mut(*id) {
                w.notice = Some(message.clone());
            }
            self.notices.push(Notice {
                window: Some(*id),
                level: NoticeLevel::Warning,
                message,
            });
        }
        Some(report)
    }

    // ── Display ───────────────────────────────────────────────────────────────

    /// Status bar text for `id`: font, character count and any notice.
    pub fn status_text(&self, id: WindowId) -> String {
        let Some(w) = self.windows.get(id) else {
            return String::new();
        };
        let base = self.prefs.status_line(w.document.char_count());
        match &w.notice {
            Some(n) => format!("{base}    |    {n}"),
            None => base,
        }
    }

    pub fn window_title(&self, id: WindowId) -> String {
        self.windows
            .get(id)
            .map(|w| w.document.title())
            .unwrap_or_default()
    }

    // ── Command dispatch ──────────────────────────────────────────────────────

    /// Apply `cmd` in window `id`.
    ///
    /// Errors (failed open or save) are returned for the shell to show; the
    /// state is left consistent either way.
    pub fn execute(&mut self, id: WindowId, cmd: Command) -> Result<Outcome> {
        let outcome = match cmd {
            Command::NewFile => self.new_file(id),
            Command::NewWindow => Outcome::WindowOpened(self.open_new_window()),
            Command::Open => Outcome::AskOpenPath(id),
            Command::OpenRecent(n) => return self.open_recent(id, n),
            Command::ClearRecent => {
                self.prefs.recent_files.clear();
                Outcome::None
            }
            Command::Save => return self.save(id),
            Command::SaveAs => Outcome::AskSavePath(id),
            Command::ToggleAutosave => {
                let on = self.toggle_autosave();
                self.notices.push(Notice {
                    window: Some(id),
                    level: NoticeLevel::Info,
                    message: format!("Autosave {}", if on { "on" } else { "off" }),
                });
                Outcome::None
            }
            Command::CloseWindow => self.close_window(id),
            Command::Exit => self.exit(),
            Command::Undo => self.reload_if(id, |doc, _| doc.undo()),
            Command::Redo => self.reload_if(id, |doc, _| doc.redo()),
            Command::Cut => self.reload_if(id, |doc, clip| doc.cut(clip)),
            Command::Copy => {
                if let Some(w) = self.windows.get(id) {
                    w.document.copy(&mut self.clipboard);
                }
                Outcome::None
            }
            Command::Paste => self.reload_if(id, |doc, clip| doc.paste(&*clip)),
            Command::SelectAll => {
                if let Some(doc) = self.document_mut(id) {
                    doc.select_all();
                }
                Outcome::None
            }
            Command::ChangeFont => Outcome::PickFont(id),
            Command::FontColor => Outcome::PickFontColor(id),
            Command::BackgroundColor => Outcome::PickBackgroundColor(id),
            Command::IncreaseFontSize => {
                self.increase_font_size();
                Outcome::StyleChanged
            }
            Command::DecreaseFontSize => {
                self.decrease_font_size();
                Outcome::StyleChanged
            }
        };
        Ok(outcome)
    }

    fn reload_if(
        &mut self,
        id: WindowId,
        f: impl FnOnce(&mut Document, &mut LocalClipboard) -> bool,
    ) -> Outcome {
        let Some(w) = self.windows.get_mut(id) else {
            warn!(%id, "command for unknown window");
            return Outcome::None;
        };
        if f(&mut w.document, &mut self.clipboard) {
            w.notice = None;
            Outcome::ReloadText(id)
        } else {
            Outcome::None
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn editor_in(dir: &tempfile::TempDir) -> Editor {
        Editor::start(SettingsStore::new(dir.path().join("settings.json")))
    }

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let p = dir.path().join(name);
        fs::write(&p, contents).expect("write fixture");
        p
    }

    #[test]
    fn open_reuses_pristine_window() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = write(&dir, "a.txt", "hello");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();

        assert_eq!(ed.open_path(w, &p).expect("open"), Outcome::ReloadText(w));
        assert_eq!(ed.windows().len(), 1);
        assert_eq!(ed.document(w).expect("doc").text(), "hello");
    }

    #[test]
    fn open_from_edited_window_creates_new_window() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = write(&dir, "a.txt", "hello");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.type_text(w, "draft");

        let Outcome::WindowOpened(other) = ed.open_path(w, &p).expect("open") else {
            panic!("expected a new window");
        };
        assert_ne!(other, w);
        assert_eq!(ed.document(w).expect("doc").text(), "draft");
        assert_eq!(ed.document(other).expect("doc").text(), "hello");
    }

    #[test]
    fn failed_open_reports_and_changes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        let err = ed.open_path(w, dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, JotterError::FileOpen { .. }));
        assert_eq!(ed.windows().len(), 1);
        assert!(ed.preferences().recent_files.is_empty());
    }

    #[test]
    fn save_untitled_asks_for_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.type_text(w, "text");
        assert_eq!(ed.execute(w, Command::Save).expect("save"), Outcome::AskSavePath(w));

        let target = dir.path().join("new.txt");
        ed.save_as(w, &target).expect("save_as");
        assert!(!ed.document(w).expect("doc").is_modified());
        assert_eq!(ed.preferences().recent_files.get(0), Some(target.as_path()));
        assert!(ed.status_text(w).ends_with("Saved"));
    }

    #[test]
    fn open_recent_uses_ring_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = write(&dir, "a.txt", "A");
        let b = write(&dir, "b.txt", "B");
        let mut ed = editor_in(&dir);
        let w1 = ed.open_new_window();
        ed.open_path(w1, &a).expect("open a");
        ed.open_path(w1, &b).expect("open b");
        // Ring is [b, a]; entry 1 is a.
        let w2 = ed.open_new_window();
        assert_eq!(ed.execute(w2, Command::OpenRecent(1)).expect("recent"), Outcome::ReloadText(w2));
        assert_eq!(ed.document(w2).expect("doc").text(), "A");
        assert_eq!(ed.execute(w2, Command::OpenRecent(4)).expect("recent"), Outcome::None);
    }

    #[test]
    fn font_size_is_clamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.set_font_size(MIN_FONT_SIZE);
        assert_eq!(ed.execute(w, Command::DecreaseFontSize).expect("cmd"), Outcome::StyleChanged);
        assert_eq!(ed.preferences().font_size, MIN_FONT_SIZE);
        ed.set_font_size(1_000);
        assert_eq!(ed.preferences().font_size, MAX_FONT_SIZE);
        ed.decrease_font_size();
        ed.increase_font_size();
        assert_eq!(ed.preferences().font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn status_shows_font_and_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.type_text(w, "abc");
        ed.execute(w, Command::IncreaseFontSize).expect("cmd");
        assert_eq!(ed.status_text(w), "Font: Default 13    |    Characters: 3");
    }

    #[test]
    fn undo_redo_commands_reload_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.type_text(w, "x");
        assert_eq!(ed.execute(w, Command::Undo).expect("undo"), Outcome::ReloadText(w));
        assert_eq!(ed.execute(w, Command::Undo).expect("undo"), Outcome::None);
        assert_eq!(ed.execute(w, Command::Redo).expect("redo"), Outcome::ReloadText(w));
        assert_eq!(ed.document(w).expect("doc").text(), "x");
    }

    #[test]
    fn cut_in_one_window_pastes_in_another() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let a = ed.open_new_window();
        let b = ed.open_new_window();
        ed.type_text(a, "moved");
        ed.execute(a, Command::SelectAll).expect("select");
        assert_eq!(ed.execute(a, Command::Cut).expect("cut"), Outcome::ReloadText(a));
        assert_eq!(ed.execute(b, Command::Paste).expect("paste"), Outcome::ReloadText(b));
        assert_eq!(ed.document(a).expect("a").text(), "");
        assert_eq!(ed.document(b).expect("b").text(), "moved");
    }

    #[test]
    fn close_prompts_only_for_unsaved_under_prompt_policy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let clean = ed.open_new_window();
        let dirty = ed.open_new_window();
        ed.type_text(dirty, "x");

        assert_eq!(ed.execute(dirty, Command::CloseWindow).expect("close"), Outcome::ConfirmClose(dirty));
        assert!(ed.windows().contains(dirty));
        assert_eq!(ed.close_window(clean), Outcome::WindowClosed(clean));
        assert_eq!(ed.force_close(dirty), Outcome::Quit);
    }

    #[test]
    fn discard_policy_closes_without_asking() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs = Preferences {
            close_policy: ClosePolicy::Discard,
            ..Preferences::default()
        };
        let mut ed = Editor::with_preferences(SettingsStore::new(dir.path().join("s.json")), prefs);
        let a = ed.open_new_window();
        let b = ed.open_new_window();
        ed.type_text(a, "unsaved");
        assert_eq!(ed.exit(), Outcome::Quit);
        assert_eq!(ed.close_window(a), Outcome::WindowClosed(a));
        assert!(ed.windows().contains(b));
    }

    #[test]
    fn new_file_resets_a_clean_window_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = write(&dir, "a.txt", "hello");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.open_path(w, &p).expect("open");

        assert_eq!(ed.execute(w, Command::NewFile).expect("new"), Outcome::ReloadText(w));
        assert_eq!(ed.windows().len(), 1);
        let doc = ed.document(w).expect("doc");
        assert_eq!(doc.path(), None);
        assert_eq!(doc.text(), "");
        assert!(!doc.buffer().can_undo());
        assert_eq!(ed.window_title(w), "Untitled - Jotter");
    }

    #[test]
    fn new_file_on_unsaved_window_asks_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.type_text(w, "draft");

        assert_eq!(ed.execute(w, Command::NewFile).expect("new"), Outcome::ConfirmNewFile(w));
        assert_eq!(ed.document(w).expect("doc").text(), "draft");

        assert_eq!(ed.reset_document(w), Outcome::ReloadText(w));
        assert!(ed.document(w).expect("doc").is_pristine());
        assert_eq!(ed.windows().len(), 1);
    }

    #[test]
    fn new_file_under_discard_policy_does_not_ask() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs = Preferences {
            close_policy: ClosePolicy::Discard,
            ..Preferences::default()
        };
        let mut ed = Editor::with_preferences(SettingsStore::new(dir.path().join("s.json")), prefs);
        let w = ed.open_new_window();
        ed.type_text(w, "draft");
        assert_eq!(ed.execute(w, Command::NewFile).expect("new"), Outcome::ReloadText(w));
        assert_eq!(ed.document(w).expect("doc").text(), "");
    }

    #[test]
    fn window_size_is_remembered_within_bounds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        ed.set_window_size(1024, 700);
        assert_eq!(ed.preferences().window_width, 1024);
        assert_eq!(ed.preferences().window_height, 700);

        ed.set_window_size(0, u32::MAX);
        assert_eq!(ed.preferences().window_width, MIN_WINDOW_SIZE);
        assert_eq!(ed.preferences().window_height, MAX_WINDOW_SIZE);

        ed.set_window_size(900, 650);
        ed.shutdown().expect("persist");
        let back = SettingsStore::new(dir.path().join("settings.json")).load();
        assert_eq!((back.window_width, back.window_height), (900, 650));
    }

    #[test]
    fn exit_lists_unsaved_windows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let _a = ed.open_new_window();
        let b = ed.open_new_window();
        ed.type_text(b, "x");
        assert_eq!(ed.execute(b, Command::Exit).expect("exit"), Outcome::ConfirmExit(vec![b]));
    }

    #[test]
    fn toggle_autosave_updates_prefs_and_timer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        assert!(ed.autosave().is_enabled());
        ed.execute(w, Command::ToggleAutosave).expect("toggle");
        assert!(!ed.preferences().autosave_enabled);
        assert!(!ed.autosave().is_enabled());
        let notices = ed.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Autosave off");
        assert!(ed.take_notices().is_empty());
    }

    #[test]
    fn autosave_failure_becomes_notice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).expect("mkdir");
        let p = sub.join("f.txt");
        fs::write(&p, "").expect("write");

        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.open_path(w, &p).expect("open");
        ed.type_text(w, "data");
        fs::remove_dir_all(&sub).expect("rmdir");

        let report = ed.tick(Duration::from_secs(30)).expect("pass ran");
        assert_eq!(report.failures.len(), 1);
        let notices = ed.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(ed.status_text(w).contains("Autosave failed"));
        assert!(ed.document(w).expect("doc").is_modified());
    }

    #[test]
    fn shutdown_persists_preferences() {
        let dir = tempfile::tempdir().expect("tempdir");
        let p = write(&dir, "a.txt", "x");
        let mut ed = editor_in(&dir);
        let w = ed.open_new_window();
        ed.open_path(w, &p).expect("open");
        ed.set_font_family("Fira Code");
        ed.set_background_color(Rgb(1, 2, 3));
        ed.shutdown().expect("shutdown");

        let again = editor_in(&dir);
        assert_eq!(again.preferences().font_family, "Fira Code");
        assert_eq!(again.preferences().background_color, Rgb(1, 2, 3));
        assert_eq!(again.preferences().recent_files.get(0), Some(p.as_path()));
    }
}
