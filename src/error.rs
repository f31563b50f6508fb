// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Jotter return `error::Result<T>`.  No panics in
// production paths; nothing here is fatal to the process.  Errors are either
// replaced by defaults (settings load) or surfaced as user-visible notices.

use std::path::PathBuf;

use thiserror::Error;

/// Every error that Jotter can produce.
#[derive(Debug, Error)]
pub enum JotterError {
    /// The settings file is missing, unreadable or not valid JSON.
    /// Always recovered from by falling back to defaults.
    #[error("could not load settings from {path}: {reason}")]
    SettingsLoad { path: PathBuf, reason: String },

    /// The settings file could not be written.
    #[error("could not save settings to {path}: {source}")]
    SettingsSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be read.  No window is created.
    #[error("could not open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be written.  The document stays modified.
    #[error("could not save {path}: {source}")]
    FileSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `save()` was called on a document that has never been given a path.
    #[error("document has no file path; use Save As")]
    NoPath,

    /// The binary was built for a platform without a native window shell.
    #[error("no native window shell is available on this platform")]
    NoShell,

    /// A Win32 API call returned a failure code.
    #[cfg(windows)]
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },
}

// Convert a windows-crate error (HRESULT) directly into a JotterError so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for JotterError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JotterError>;
