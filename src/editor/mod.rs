// ── Editor component abstraction ──────────────────────────────────────────────
//
// The text-editing primitive the documents delegate to.  `TextBuffer` is pure
// Rust; clipboard transport is behind the `Clipboard` trait.  `Editor` uses
// the in-process `LocalClipboard`.  The Win32 shell never goes through it:
// cut, copy and paste there are handled by the EDIT control itself.

mod buffer;

pub use buffer::TextBuffer;

/// Source and sink for cut/copy/paste.
pub trait Clipboard {
    /// Current clipboard text, if any.
    fn text(&self) -> Option<String>;
    /// Replace the clipboard contents.
    fn set_text(&mut self, text: String);
}

/// In-process clipboard.  Shared by every window of one `Editor` so text cut
/// in one window can be pasted in another.
#[derive(Debug, Clone, Default)]
pub struct LocalClipboard {
    contents: Option<String>,
}

impl Clipboard for LocalClipboard {
    fn text(&self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: String) {
        self.contents = Some(text);
    }
}
