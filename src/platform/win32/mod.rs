// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only module in the codebase where `unsafe` code is permitted.  Every
// `unsafe` block MUST carry a `// SAFETY:` comment that states which invariant
// makes the operation sound.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod dialogs; // open/save, font and colour pickers, message boxes
pub(crate) mod window; // editor windows, WndProc, message loop

mod messages; // raw control message constants
mod style; // fonts, brushes, DPI
