//! Jotter: a small multi-window plain-text editor.
//!
//! This library holds every piece of editor state and behaviour that does not
//! need a GUI toolkit: preferences and their persistence, the recent-files
//! ring, documents with undo/redo and modified tracking, the window set, the
//! autosave schedule and the command table.  The `jotter` binary wraps it in
//! a native shell.

#![deny(unsafe_code)]

pub mod app;
pub mod autosave;
pub mod commands;
pub mod document;
pub mod editor;
pub mod error;
pub mod manager;
pub mod recent;
pub mod session;

pub use app::{Editor, Notice, NoticeLevel, Outcome};
pub use commands::Command;
pub use error::{JotterError, Result};
pub use manager::WindowId;
