// ── Preferences persistence ───────────────────────────────────────────────────
//
// Reads and writes the per-user settings file (`settings.json`).
// No `unsafe`, just safe Rust and serde_json.
//
// Loading is lenient field by field: a missing or malformed field falls back
// to its default without discarding the rest of the record.

mod prefs;

pub use prefs::{
    ClosePolicy, Preferences, Rgb, MAX_FONT_SIZE, MAX_WINDOW_SIZE, MIN_FONT_SIZE, MIN_WINDOW_SIZE,
};

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{JotterError, Result};

// ── Format version ────────────────────────────────────────────────────────────

pub(crate) const SETTINGS_VERSION: u32 = 1;

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "JOTTER_SETTINGS";

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the default settings path for this user.
///
/// * `JOTTER_SETTINGS`, when set, wins.
/// * Windows: `%APPDATA%\Jotter\settings.json`.
/// * Elsewhere: `$XDG_CONFIG_HOME/jotter/settings.json`, then
///   `$HOME/.config/jotter/settings.json`.
///
/// Returns `None` if none of those variables are set.
pub fn default_settings_path() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os(SETTINGS_PATH_ENV) {
        return Some(PathBuf::from(p));
    }

    if cfg!(windows) {
        let appdata = std::env::var_os("APPDATA")?;
        let mut p = PathBuf::from(appdata);
        p.push("Jotter");
        p.push("settings.json");
        return Some(p);
    }

    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let mut home = PathBuf::from(std::env::var_os("HOME")?);
            home.push(".config");
            home
        }
    };
    Some(base.join("jotter").join("settings.json"))
}

// ── On-disk envelope ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SettingsFile<'a> {
    version: u32,
    #[serde(flatten)]
    preferences: &'a Preferences,
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Owner of the settings file location.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at `default_settings_path()`, or at `settings.json` in the
    /// working directory when no per-user location is known.
    pub fn at_default_location() -> Self {
        Self::new(default_settings_path().unwrap_or_else(|| PathBuf::from("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults on any failure.
    pub fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(prefs) => {
                info!(path = %self.path.display(), "loaded settings");
                prefs
            }
            Err(e) => {
                warn!(error = %e, "using default settings");
                Preferences::default()
            }
        }
    }

    /// Read and parse the settings file.
    ///
    /// Fails only when the file as a whole is unusable: missing, unreadable,
    /// not a JSON object, or written by an unknown format version.  Bad
    /// individual fields are replaced by their defaults.
    pub fn try_load(&self) -> Result<Preferences> {
        let data = fs::read(&self.path).map_err(|e| self.load_error(e.to_string()))?;
        let value: Value =
            serde_json::from_slice(&data).map_err(|e| self.load_error(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(self.load_error("top level is not an object".to_owned()));
        };

        match map.get("version").and_then(Value::as_u64) {
            Some(v) if v == u64::from(SETTINGS_VERSION) => {}
            other => {
                return Err(self.load_error(format!("unsupported version {other:?}")));
            }
        }

        Ok(Preferences::from_fields(&map))
    }

    /// Write `prefs` to disk.
    ///
    /// The record goes to a sibling temp file which is synced and then renamed
    /// over the real file, so an interrupted write leaves the previous
    /// settings intact.  Creates the parent directory if needed.
    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        self.write_atomically(prefs).map_err(|source| JotterError::SettingsSave {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "saved settings");
        Ok(())
    }

    fn write_atomically(&self, prefs: &Preferences) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let record = SettingsFile {
            version: SETTINGS_VERSION,
            preferences: prefs,
        };
        let json = serde_json::to_vec_pretty(&record).map_err(io::Error::other)?;

        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn load_error(&self, reason: String) -> JotterError {
        JotterError::SettingsLoad {
            path: self.path.clone(),
            reason,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recent::RecentFiles;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("jotter").join("settings.json"))
    }

    fn custom_prefs() -> Preferences {
        let mut recent = RecentFiles::new();
        recent.record_opened("/tmp/one.txt");
        recent.record_opened("/tmp/two.txt");
        Preferences {
            font_family: "Courier New".to_owned(),
            font_size: 17,
            font_color: Rgb(0x12, 0x34, 0x56),
            background_color: Rgb(0xFA, 0xF0, 0xE6),
            window_width: 1024,
            window_height: 700,
            autosave_enabled: false,
            autosave_interval_secs: 45,
            close_policy: ClosePolicy::Discard,
            recent_files: recent,
        }
    }

    #[test]
    fn roundtrip_all_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let prefs = custom_prefs();
        store.save(&prefs).expect("save");
        assert_eq!(store.try_load().expect("load"), prefs);
    }

    #[test]
    fn roundtrip_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.save(&Preferences::default()).expect("save");
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        assert!(matches!(store.try_load(), Err(JotterError::SettingsLoad { .. })));
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, b"{ not json").expect("write");
        assert_eq!(SettingsStore::new(&path).load(), Preferences::default());
    }

    #[test]
    fn unknown_version_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, br#"{"version":99,"font_size":30}"#).expect("write");
        let store = SettingsStore::new(&path);
        assert!(store.try_load().is_err());
        assert_eq!(store.load().font_size, Preferences::default().font_size);
    }

    #[test]
    fn bad_fields_fall_back_individually() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let json = r##"{
            "version": 1,
            "font_family": "Menlo",
            "font_size": "huge",
            "font_color": "#ff0000",
            "background_color": "not-a-colour",
            "autosave_enabled": false,
            "recent_files": ["/a", "/b", "/a"]
        }"##;
        fs::write(&path, json).expect("write");

        let prefs = SettingsStore::new(&path).load();
        let defaults = Preferences::default();
        assert_eq!(prefs.font_family, "Menlo");
        assert_eq!(prefs.font_size, defaults.font_size);
        assert_eq!(prefs.font_color, Rgb(0xFF, 0, 0));
        assert_eq!(prefs.background_color, defaults.background_color);
        assert!(!prefs.autosave_enabled);
        assert_eq!(prefs.window_width, defaults.window_width);
        assert_eq!(prefs.recent_files.len(), 2);
    }

    #[test]
    fn save_replaces_previous_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.save(&Preferences::default()).expect("first save");
        store.save(&custom_prefs()).expect("second save");

        assert_eq!(store.load(), custom_prefs());
        let leftovers: Vec<_> = fs::read_dir(store.path().parent().expect("parent"))
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").expect("write");
        let store = SettingsStore::new(blocker.join("settings.json"));
        assert!(matches!(
            store.save(&Preferences::default()),
            Err(JotterError::SettingsSave { .. })
        ));
    }

    #[test]
    fn file_carries_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.save(&Preferences::default()).expect("save");
        let raw = fs::read_to_string(store.path()).expect("read");
        let v: Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(v["version"], u64::from(SETTINGS_VERSION));
    }

    #[cfg(unix)]
    #[test]
    fn opening_a_non_utf8_file_does_not_block_saving() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        use crate::document::Document;

        let dir = tempfile::tempdir().expect("tempdir");
        let odd = dir.path().join(OsStr::from_bytes(b"caf\xe9.txt"));
        fs::write(&odd, "bonjour").expect("write fixture");

        let mut prefs = custom_prefs();
        Document::open(&odd, &mut prefs.recent_files).expect("open");
        prefs.font_size = 20;

        let store = store_in(&dir);
        store.save(&prefs).expect("save");
        let back = store.load();
        assert_eq!(back.font_size, 20);
        assert_eq!(back.recent_files, prefs.recent_files);
    }
}
