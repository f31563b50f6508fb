// End-to-end session through the public API: defaults, open, edit, autosave,
// restart.

use std::{fs, time::Duration};

use jotter::{
    autosave::AutosaveState,
    session::{Preferences, SettingsStore},
    Command, Editor, Outcome,
};

#[test]
fn open_edit_and_autosave() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("a.txt");
    fs::write(&file, "hello").expect("write fixture");
    let store = SettingsStore::new(dir.path().join("settings.json"));

    let mut ed = Editor::start(store);
    assert_eq!(ed.preferences(), &Preferences::default());
    assert_eq!(ed.preferences().font_family, "Default");
    assert_eq!(ed.preferences().font_size, 12);
    assert_eq!(ed.autosave().state(), AutosaveState::Idle);

    let w = ed.open_new_window();
    assert_eq!(ed.open_path(w, &file).expect("open"), Outcome::ReloadText(w));

    let recent: Vec<_> = ed.preferences().recent_files.iter().collect();
    assert_eq!(recent, vec![file.as_path()]);
    let doc = ed.document(w).expect("doc");
    assert!(!doc.is_modified());
    assert_eq!(doc.char_count(), 5);

    let end = doc.char_count();
    ed.document_mut(w).expect("doc").set_caret(end);
    assert!(ed.type_text(w, "!"));
    let doc = ed.document(w).expect("doc");
    assert!(doc.is_modified());
    assert_eq!(doc.char_count(), 6);
    assert!(ed.window_title(w).starts_with('*'));

    assert!(ed.tick(Duration::from_secs(29)).is_none());
    let report = ed.tick(Duration::from_secs(1)).expect("autosave pass");
    assert_eq!(report.saved, vec![w]);
    assert_eq!(fs::read_to_string(&file).expect("read back"), "hello!");
    assert!(!ed.document(w).expect("doc").is_modified());
    assert!(ed.status_text(w).contains("Autosaved"));
}

#[test]
fn preferences_survive_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("notes.txt");
    fs::write(&file, "x").expect("write fixture");
    let settings = dir.path().join("settings.json");

    {
        let mut ed = Editor::start(SettingsStore::new(&settings));
        let w = ed.open_new_window();
        ed.open_path(w, &file).expect("open");
        ed.execute(w, Command::IncreaseFontSize).expect("bigger");
        ed.execute(w, Command::ToggleAutosave).expect("toggle");
        assert_eq!(ed.execute(w, Command::Exit).expect("exit"), Outcome::Quit);
        ed.shutdown().expect("persist");
    }

    let ed = Editor::start(SettingsStore::new(&settings));
    let prefs = ed.preferences();
    assert_eq!(prefs.font_size, 13);
    assert!(!prefs.autosave_enabled);
    assert_eq!(prefs.recent_files.get(0), Some(file.as_path()));
    assert_eq!(ed.autosave().state(), AutosaveState::Disabled);
}

#[test]
fn untitled_windows_are_left_alone_by_autosave() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut ed = Editor::start(SettingsStore::new(dir.path().join("settings.json")));
    let w = ed.open_new_window();
    ed.type_text(w, "scratch");

    let report = ed.tick(Duration::from_secs(30)).expect("autosave pass");
    assert!(report.saved.is_empty());
    assert_eq!(report.skipped_untitled, vec![w]);
    assert!(ed.document(w).expect("doc").is_modified());
}
