// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that tracing output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod platform;

use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = platform::run() {
        // Startup failed before or during the message loop.
        error!(error = %e, "jotter exited with an error");
        platform::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}
