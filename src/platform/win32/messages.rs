// ── Raw Win32 control constants ───────────────────────────────────────────────
//
// Source of truth: WinUser.h / CommCtrl.h.  Only the subset the shell sends
// or matches on is listed.  Plain integers so they can be combined and
// compared without going through the windows-crate newtypes.

// ── EDIT control styles ───────────────────────────────────────────────────────

pub(super) const ES_MULTILINE: u32 = 0x0004;
pub(super) const ES_AUTOVSCROLL: u32 = 0x0040;
pub(super) const ES_NOHIDESEL: u32 = 0x0100;
pub(super) const ES_WANTRETURN: u32 = 0x1000;

// ── EDIT control messages and notifications ───────────────────────────────────

/// Set the selection.  WPARAM = start, LPARAM = end (-1 = end of text).
pub(super) const EM_SETSEL: u32 = 0x00B1;
/// Raise the text limit.  WPARAM = max chars (0 = platform maximum).
pub(super) const EM_SETLIMITTEXT: u32 = 0x00C5;
/// Sent to the parent in HIWORD(WPARAM) of WM_COMMAND after the text changed.
pub(super) const EN_CHANGE: usize = 0x0300;

// ── Clipboard messages (handled by the EDIT control itself) ───────────────────

pub(super) const WM_CUT: u32 = 0x0300;
pub(super) const WM_COPY: u32 = 0x0301;
pub(super) const WM_PASTE: u32 = 0x0302;

// ── WM_SIZE request types ─────────────────────────────────────────────────────

/// WPARAM of WM_SIZE for a normal (not minimised or maximised) window.
pub(super) const SIZE_RESTORED: usize = 0;

// ── Status bar ────────────────────────────────────────────────────────────────

/// `SB_SETTEXTW` = WM_USER + 11.  WPARAM = part index; LPARAM = text ptr.
pub(super) const SB_SETTEXTW: u32 = 0x0400 + 11;

// ── Virtual keys used by the accelerator table ────────────────────────────────

pub(super) const VK_ADD: u16 = 0x6B;
pub(super) const VK_SUBTRACT: u16 = 0x6D;
pub(super) const VK_OEM_PLUS: u16 = 0xBB;
pub(super) const VK_OEM_MINUS: u16 = 0xBD;
