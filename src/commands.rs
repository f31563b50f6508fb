// ── Command surface ───────────────────────────────────────────────────────────
//
// Every menu item and keyboard shortcut maps to one `Command`.  Pure Rust; the
// native shell turns menu ids and accelerator keys into commands and hands
// them to `Editor::execute`.

use std::fmt;

use crate::recent::MAX_RECENT_FILES;

/// A user-invocable editor action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    NewFile,
    NewWindow,
    Open,
    /// Open entry `n` (0-based) of the Recent Files submenu.
    OpenRecent(usize),
    ClearRecent,
    Save,
    SaveAs,
    ToggleAutosave,
    CloseWindow,
    Exit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    ChangeFont,
    FontColor,
    BackgroundColor,
    IncreaseFontSize,
    DecreaseFontSize,
}

/// The platform's primary shortcut modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Command key (macOS).
    Cmd,
    /// Control key (Windows, Linux, everything else).
    Ctrl,
}

impl Modifier {
    /// `Cmd` on macOS, `Ctrl` elsewhere.
    pub const fn platform() -> Self {
        if cfg!(target_os = "macos") {
            Self::Cmd
        } else {
            Self::Ctrl
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cmd => "Cmd",
            Self::Ctrl => "Ctrl",
        }
    }
}

/// Key part of a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// An ASCII letter, stored upper-case.
    Char(char),
    Plus,
    Minus,
}

/// A modifier + optional Shift + key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub modifier: Modifier,
    pub shift: bool,
    pub key: Key,
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.modifier.as_str())?;
        if self.shift {
            f.write_str("+Shift")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "+{c}"),
            Key::Plus => f.write_str("++"),
            Key::Minus => f.write_str("+-"),
        }
    }
}

/// Commands that appear in the File menu, in order (`None` = separator).
pub const FILE_MENU: &[Option<Command>] = &[
    Some(Command::NewFile),
    Some(Command::NewWindow),
    Some(Command::Open),
    None,
    Some(Command::Save),
    Some(Command::SaveAs),
    None,
    Some(Command::ToggleAutosave),
    None,
    Some(Command::CloseWindow),
    Some(Command::Exit),
];

pub const EDIT_MENU: &[Option<Command>] = &[
    Some(Command::Undo),
    Some(Command::Redo),
    None,
    Some(Command::Cut),
    Some(Command::Copy),
    Some(Command::Paste),
    None,
    Some(Command::SelectAll),
];

pub const FORMAT_MENU: &[Option<Command>] = &[
    Some(Command::ChangeFont),
    Some(Command::FontColor),
    Some(Command::BackgroundColor),
];

pub const VIEW_MENU: &[Option<Command>] = &[
    Some(Command::IncreaseFontSize),
    Some(Command::DecreaseFontSize),
];

// ── Menu ids ──────────────────────────────────────────────────────────────────
//
// Stable numeric ids for toolkits that identify menu items by integer.
// Recent entries occupy a contiguous block.

const ID_BASE: u16 = 1000;
const ID_RECENT_BASE: u16 = 1100;

const FIXED: &[Command] = &[
    Command::NewFile,
    Command::NewWindow,
    Command::Open,
    Command::ClearRecent,
    Command::Save,
    Command::SaveAs,
    Command::ToggleAutosave,
    Command::CloseWindow,
    Command::Exit,
    Command::Undo,
    Command::Redo,
    Command::Cut,
    Command::Copy,
    Command::Paste,
    Command::SelectAll,
    Command::ChangeFont,
    Command::FontColor,
    Command::BackgroundColor,
    Command::IncreaseFontSize,
    Command::DecreaseFontSize,
];

impl Command {
    /// Numeric menu id.
    pub fn id(self) -> u16 {
        match self {
            Self::OpenRecent(n) => ID_RECENT_BASE + n.min(MAX_RECENT_FILES - 1) as u16,
            other => {
                let pos = FIXED.iter().position(|c| *c == other).unwrap_or_default();
                ID_BASE + pos as u16
            }
        }
    }

    /// Inverse of [`Command::id`].
    pub fn from_id(id: u16) -> Option<Self> {
        if (ID_RECENT_BASE..ID_RECENT_BASE + MAX_RECENT_FILES as u16).contains(&id) {
            return Some(Self::OpenRecent(usize::from(id - ID_RECENT_BASE)));
        }
        let idx = usize::from(id.checked_sub(ID_BASE)?);
        FIXED.get(idx).copied()
    }

    /// Menu label, without accelerator text.
    pub fn label(self) -> &'static str {
        match self {
            Self::NewFile => "New File",
            Self::NewWindow => "New Window",
            Self::Open => "Open...",
            Self::OpenRecent(_) => "Recent File",
            Self::ClearRecent => "Clear Recent Files",
            Self::Save => "Save",
            Self::SaveAs => "Save As...",
            Self::ToggleAutosave => "Autosave",
            Self::CloseWindow => "Close Window",
            Self::Exit => "Exit",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Cut => "Cut",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::SelectAll => "Select All",
            Self::ChangeFont => "Change Font...",
            Self::FontColor => "Change Font Color...",
            Self::BackgroundColor => "Change Background Color...",
            Self::IncreaseFontSize => "Increase Font Size",
            Self::DecreaseFontSize => "Decrease Font Size",
        }
    }

    /// Default shortcut on the current platform.
    pub fn shortcut(self) -> Option<Shortcut> {
        self.shortcut_for(Modifier::platform())
    }

    pub fn shortcut_for(self, modifier: Modifier) -> Option<Shortcut> {
        let (shift, key) = match self {
            Self::NewFile => (false, Key::Char('N')),
            Self::NewWindow => (true, Key::Char('N')),
            Self::Open => (false, Key::Char('O')),
            Self::Save => (false, Key::Char('S')),
            Self::SaveAs => (true, Key::Char('S')),
            Self::Undo => (false, Key::Char('Z')),
            Self::Redo => (false, Key::Char('Y')),
            Self::Cut => (false, Key::Char('X')),
            Self::Copy => (false, Key::Char('C')),
            Self::Paste => (false, Key::Char('V')),
            Self::SelectAll => (false, Key::Char('A')),
            Self::IncreaseFontSize => (false, Key::Plus),
            Self::DecreaseFontSize => (false, Key::Minus),
            _ => return None,
        };
        Some(Shortcut {
            modifier,
            shift,
            key,
        })
    }

    /// Look up the command bound to a chord.  `=` is accepted as an
    /// unshifted `+` so zoom-in works without Shift on most layouts.
    pub fn from_chord(shift: bool, key: char) -> Option<Self> {
        let key = key.to_ascii_uppercase();
        let cmd = match (shift, key) {
            (false, 'N') => Self::NewFile,
            (true, 'N') => Self::NewWindow,
            (false, 'O') => Self::Open,
            (false, 'S') => Self::Save,
            (true, 'S') => Self::SaveAs,
            (false, 'Z') => Self::Undo,
            (false, 'Y') => Self::Redo,
            (false, 'X') => Self::Cut,
            (false, 'C') => Self::Copy,
            (false, 'V') => Self::Paste,
            (false, 'A') => Self::SelectAll,
            (_, '+') | (false, '=') => Self::IncreaseFontSize,
            (false, '-') => Self::DecreaseFontSize,
            _ => return None,
        };
        Some(cmd)
    }

    /// Menu text with a tab-separated accelerator, e.g. `"Save\tCtrl+S"`.
    pub fn menu_text(self) -> String {
        match self.shortcut() {
            Some(s) => format!("{}\t{s}", self.label()),
            None => self.label().to_owned(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_for_every_command() {
        let mut all: Vec<Command> = FIXED.to_vec();
        all.extend((0..MAX_RECENT_FILES).map(Command::OpenRecent));
        for cmd in all {
            assert_eq!(Command::from_id(cmd.id()), Some(cmd), "{cmd:?}");
        }
    }

    #[test]
    fn ids_are_distinct() {
        let mut ids: Vec<u16> = FIXED.iter().map(|c| c.id()).collect();
        ids.extend((0..MAX_RECENT_FILES).map(|n| Command::OpenRecent(n).id()));
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn unknown_ids_map_to_nothing() {
        assert_eq!(Command::from_id(0), None);
        assert_eq!(Command::from_id(999), None);
        assert_eq!(Command::from_id(ID_RECENT_BASE + MAX_RECENT_FILES as u16), None);
    }

    #[test]
    fn every_menu_command_has_an_id() {
        for cmd in FILE_MENU
            .iter()
            .chain(EDIT_MENU)
            .chain(FORMAT_MENU)
            .chain(VIEW_MENU)
            .flatten()
        {
            assert!(FIXED.contains(cmd), "{cmd:?} missing from id table");
        }
    }

    #[test]
    fn accelerator_text_per_platform() {
        let s = Command::SaveAs.shortcut_for(Modifier::Cmd).expect("bound");
        assert_eq!(s.to_string(), "Cmd+Shift+S");
        let s = Command::Undo.shortcut_for(Modifier::Ctrl).expect("bound");
        assert_eq!(s.to_string(), "Ctrl+Z");
        let s = Command::IncreaseFontSize.shortcut_for(Modifier::Ctrl).expect("bound");
        assert_eq!(s.to_string(), "Ctrl++");
        assert!(Command::ChangeFont.shortcut_for(Modifier::Ctrl).is_none());
    }

    #[test]
    fn menu_text_includes_accelerator() {
        let m = Modifier::platform().as_str();
        assert_eq!(Command::Save.menu_text(), format!("Save\t{m}+S"));
        assert_eq!(Command::ChangeFont.menu_text(), "Change Font...");
    }

    #[test]
    fn chords_resolve_to_commands() {
        assert_eq!(Command::from_chord(false, 's'), Some(Command::Save));
        assert_eq!(Command::from_chord(true, 'S'), Some(Command::SaveAs));
        assert_eq!(Command::from_chord(false, '='), Some(Command::IncreaseFontSize));
        assert_eq!(Command::from_chord(false, '-'), Some(Command::DecreaseFontSize));
        assert_eq!(Command::from_chord(true, 'Q'), None);
    }

    #[test]
    fn chord_table_agrees_with_shortcuts() {
        for cmd in FIXED {
            if let Some(s) = cmd.shortcut() {
                let key = match s.key {
                    Key::Char(c) => c,
                    Key::Plus => '+',
                    Key::Minus => '-',
                };
                assert_eq!(Command::from_chord(s.shift, key), Some(*cmd));
            }
        }
    }
}
