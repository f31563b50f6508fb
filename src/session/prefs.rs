// ── Preferences record ────────────────────────────────────────────────────────

use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::recent::RecentFiles;

/// Smallest font size the View menu will shrink to.
pub const MIN_FONT_SIZE: u32 = 4;
/// Largest font size the View menu will grow to.
pub const MAX_FONT_SIZE: u32 = 72;
/// Smallest remembered window edge, in pixels at 96 DPI.
pub const MIN_WINDOW_SIZE: u32 = 200;
/// Largest remembered window edge, in pixels at 96 DPI.
pub const MAX_WINDOW_SIZE: u32 = 16_384;

// ── Colour ────────────────────────────────────────────────────────────────────

/// An sRGB colour, stored on disk as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

    /// Pack as `0xRRGGBB`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }

    /// Unpack from `0xRRGGBB`; the high byte is ignored.
    pub fn from_u32(v: u32) -> Self {
        Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Error returned when a colour string is not `#rgb`, `#rrggbb` or a known name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRgbError(String);

impl fmt::Display for ParseRgbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid colour {:?}", self.0)
    }
}

impl std::error::Error for ParseRgbError {}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRgbError(s.to_owned());
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Rgb::BLACK),
            "white" => return Ok(Rgb::WHITE),
            _ => {}
        }

        let hex = trimmed.strip_prefix('#').ok_or_else(err)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            6 => {
                let v = u32::from_str_radix(hex, 16).map_err(|_| err())?;
                Ok(Rgb::from_u32(v))
            }
            // #rgb shorthand: each digit is doubled.
            3 => {
                let mut channels = hex.chars().filter_map(|c| c.to_digit(16)).map(|d| (d * 17) as u8);
                match (channels.next(), channels.next(), channels.next()) {
                    (Some(r), Some(g), Some(b)) => Ok(Rgb(r, g, b)),
                    _ => Err(err()),
                }
            }
            _ => Err(err()),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Close policy ──────────────────────────────────────────────────────────────

/// What happens when a window holding unsaved changes is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosePolicy {
    /// Ask the user whether to save, discard or cancel.
    #[default]
    Prompt,
    /// Close immediately, dropping unsaved changes.
    Discard,
}

// ── Preferences ───────────────────────────────────────────────────────────────

/// Every user preference that survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub font_family: String,
    pub font_size: u32,
    pub font_color: Rgb,
    pub background_color: Rgb,
    pub window_width: u32,
    pub window_height: u32,
    pub autosave_enabled: bool,
    pub autosave_interval_secs: u64,
    pub close_policy: ClosePolicy,
    pub recent_files: RecentFiles,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_family: "Default".to_owned(),
            font_size: 12,
            font_color: Rgb::BLACK,
            background_color: Rgb::WHITE,
            window_width: 800,
            window_height: 600,
            autosave_enabled: true,
            autosave_interval_secs: 30,
            close_policy: ClosePolicy::Prompt,
            recent_files: RecentFiles::new(),
        }
    }
}

impl Preferences {
    /// Build a record from a parsed settings object, field by field.
    ///
    /// Missing keys, wrong types and out-of-range values each fall back to
    /// that field's default; the rest of the record is kept.
    pub(crate) fn from_fields(map: &Map<String, Value>) -> Self {
        let d = Self::default();
        Self {
            font_family: field::<String>(map, "font_family")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(d.font_family),
            font_size: field::<u32>(map, "font_size")
                .filter(|s| (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(s))
                .unwrap_or(d.font_size),
            font_color: field(map, "font_color").unwrap_or(d.font_color),
            background_color: field(map, "background_color").unwrap_or(d.background_color),
            window_width: field::<u32>(map, "window_width")
                .filter(|w| (MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(w))
                .unwrap_or(d.window_width),
            window_height: field::<u32>(map, "window_height")
                .filter(|h| (MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(h))
                .unwrap_or(d.window_height),
            autosave_enabled: field(map, "autosave_enabled").unwrap_or(d.autosave_enabled),
            autosave_interval_secs: field::<u64>(map, "autosave_interval_secs")
                .filter(|&s| s > 0)
                .unwrap_or(d.autosave_interval_secs),
            close_policy: field(map, "close_policy").unwrap_or(d.close_policy),
            recent_files: field(map, "recent_files").unwrap_or(d.recent_files),
        }
    }

    /// Status bar text: `Font: <family> <size>    |    Characters: <n>`.
    pub fn status_line(&self, char_count: usize) -> String {
        format!(
            "Font: {} {}    |    Characters: {}",
            self.font_family, self.font_size, char_count
        )
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key).and_then(|v| T::deserialize(v).ok())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
