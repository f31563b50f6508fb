// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The rest of the binary talks to the OS only through `run` and
// `show_error_dialog`.  No `unsafe` lives here; all Win32 FFI is confined to
// the `win32` sub-module and never leaks outward.

use jotter::Result;

#[cfg(windows)]
mod win32;

/// Run the native shell until the last window closes.
#[cfg(windows)]
pub(crate) fn run() -> Result<()> {
    win32::window::run()
}

/// No native shell exists off Windows; the library is still fully usable.
#[cfg(not(windows))]
pub(crate) fn run() -> Result<()> {
    Err(jotter::JotterError::NoShell)
}

/// Report a fatal error to the user in whatever way the platform allows.
#[cfg(windows)]
pub(crate) fn show_error_dialog(message: &str) {
    win32::window::show_error_dialog(message);
}

#[cfg(not(windows))]
pub(crate) fn show_error_dialog(message: &str) {
    eprintln!("jotter: {message}");
}
