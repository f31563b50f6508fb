// ── Text buffer ───────────────────────────────────────────────────────────────
//
// The text-editing primitive behind every document: UTF-8 content, a
// selection, and an undo/redo history.  All positions are in characters, not
// bytes, so callers never split a code point.
//
// Each applied edit gets a fresh revision number.  Undo/redo restore the
// revision the buffer had on either side of the edit, which lets a document
// compare against a stored save point the same way Scintilla's
// `SCI_SETSAVEPOINT` works: undoing back to the saved text reads as clean.

use std::{collections::VecDeque, ops::Range};

use super::Clipboard;

/// Oldest edits beyond this depth are discarded.
const MAX_UNDO_DEPTH: usize = 1_000;

/// One reversible change: `removed` at `at` was replaced by `inserted`.
#[derive(Debug, Clone)]
struct Edit {
    at: usize,
    removed: String,
    inserted: String,
    selection_before: Range<usize>,
    revision_before: u64,
    revision_after: u64,
}

/// Editable text with selection and history.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    /// Selected character range; `end` is the caret.
    selection: Range<usize>,
    undo_stack: VecDeque<Edit>,
    redo_stack: Vec<Edit>,
    revision: u64,
    last_revision: u64,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text` with an empty history and the caret at 0.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Identifies the current content state.  Equal revisions mean equal text.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    pub fn caret(&self) -> usize {
        self.selection.end
    }

    pub fn selected_text(&self) -> &str {
        let r = self.byte_range(self.ordered(self.selection.clone()));
        &self.text[r]
    }

    /// Select `anchor..caret`, clamped to the buffer.  `anchor > caret` is a
    /// backwards selection.
    pub fn select(&mut self, anchor: usize, caret: usize) {
        let n = self.char_count();
        self.selection = anchor.min(n)..caret.min(n);
    }

    pub fn select_all(&mut self) {
        self.selection = 0..self.char_count();
    }

    pub fn set_caret(&mut self, pos: usize) {
        self.select(pos, pos);
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    /// Replace the selection with `text` (typing or pasting).
    /// Returns `true` if the content changed.
    pub fn insert(&mut self, text: &str) -> bool {
        let range = self.ordered(self.selection.clone());
        self.replace_range(range, text)
    }

    /// Delete the selection, or the character before the caret when the
    /// selection is empty.  Returns `true` if the content changed.
    pub fn delete_backward(&mut self) -> bool {
        let range = self.ordered(self.selection.clone());
        if range.is_empty() {
            if range.start == 0 {
                return false;
            }
            return self.replace_range(range.start - 1..range.start, "");
        }
        self.replace_range(range, "")
    }

    /// Replace the characters in `range` with `text` as one undoable edit and
    /// leave the caret after the inserted text.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> bool {
        let n = self.char_count();
        let range = self.ordered(range.start.min(n)..range.end.min(n));
        let removed = self.text[self.byte_range(range.clone())].to_owned();
        if removed == text {
            return false;
        }

        self.last_revision += 1;
        let edit = Edit {
            at: range.start,
            removed,
            inserted: text.to_owned(),
            selection_before: self.selection.clone(),
            revision_before: self.revision,
            revision_after: self.last_revision,
        };
        self.apply_forward(&edit);

        self.undo_stack.push_back(edit);
        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        true
    }

    /// Make the content equal to `new_text`, recording only the differing
    /// middle section as a single edit.  Used to mirror a toolkit widget that
    /// edits its own copy of the text.
    pub fn sync_to(&mut self, new_text: &str) -> bool {
        if self.text == new_text {
            return false;
        }
        let old: Vec<char> = self.text.chars().collect();
        let new: Vec<char> = new_text.chars().collect();

        let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let inserted: String = new[prefix..new.len() - suffix].iter().collect();
        self.replace_range(prefix..old.len() - suffix, &inserted)
    }

    /// Revert the most recent edit.  Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.undo_stack.pop_back() else {
            return false;
        };
        let inserted_end = edit.at + edit.inserted.chars().count();
        let r = self.byte_range(edit.at..inserted_end);
        self.text.replace_range(r, &edit.removed);
        self.selection = edit.selection_before.clone();
        self.revision = edit.revision_before;
        self.redo_stack.push(edit);
        true
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self) -> bool {
        let Some(edit) = self.redo_stack.pop() else {
            return false;
        };
        self.apply_forward(&edit);
        self.undo_stack.push_back(edit);
        true
    }

    /// Drop the undo and redo history (used after loading a file).
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    // ── Clipboard ─────────────────────────────────────────────────────────────

    /// Copy the selection.  Returns `false` when the selection is empty.
    pub fn copy(&self, clipboard: &mut dyn Clipboard) -> bool {
        let selected = self.selected_text();
        if selected.is_empty() {
            return false;
        }
        clipboard.set_text(selected.to_owned());
        true
    }

    /// Copy then delete the selection.
    pub fn cut(&mut self, clipboard: &mut dyn Clipboard) -> bool {
        if !self.copy(clipboard) {
            return false;
        }
        let range = self.ordered(self.selection.clone());
        self.replace_range(range, "")
    }

    /// Replace the selection with the clipboard text.
    pub fn paste(&mut self, clipboard: &dyn Clipboard) -> bool {
        match clipboard.text() {
            Some(text) if !text.is_empty() => self.insert(&text),
            _ => false,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn apply_forward(&mut self, edit: &Edit) {
        let removed_end = edit.at + edit.removed.chars().count();
        let r = self.byte_range(edit.at..removed_end);
        self.text.replace_range(r, &edit.inserted);
        let caret = edit.at + edit.inserted.chars().count();
        self.selection = caret..caret;
        self.revision = edit.revision_after;
    }

    fn ordered(&self, r: Range<usize>) -> Range<usize> {
        if r.start <= r.end {
            r
        } else {
            r.end..r.start
        }
    }

    /// Convert a character range into a byte range of `self.text`.
    fn byte_range(&self, r: Range<usize>) -> Range<usize> {
        self.byte_offset(r.start)..self.byte_offset(r.end)
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(b, _)| b)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
