// ── Common dialogs ─────────────────────────────────────────────────────────────
//
// Thin wrappers around the Win32 common-dialog and message-box APIs.  Pickers
// return `Some(value)` on user confirmation and `None` on cancel or error.
//
// This is inside `platform::win32` so `unsafe` is permitted per crate policy.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Foundation::{COLORREF, HWND},
        Graphics::Gdi::LOGFONTW,
        UI::{
            Controls::Dialogs::{
                ChooseColorW, ChooseFontW, GetOpenFileNameW, GetSaveFileNameW, CC_FULLOPEN,
                CC_RGBINIT, CF_INITTOLOGFONTSTRUCT, CF_NOVERTFONTS, CF_SCREENFONTS,
                CHOOSECOLORW, CHOOSEFONTW, OFN_FILEMUSTEXIST, OFN_HIDEREADONLY,
                OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPENFILENAMEW,
            },
            WindowsAndMessaging::{
                MessageBoxW, IDNO, IDYES, MB_ICONERROR, MB_ICONWARNING, MB_OK, MB_YESNOCANCEL,
            },
        },
    },
};

use jotter::session::Rgb;

use super::style::{colorref, rgb_from};

// ── Buffer size ───────────────────────────────────────────────────────────────

/// Maximum path length in `WCHAR`s, including the null terminator.
/// `MAX_PATH` (260) is too short for modern Windows paths; use 32 768 which
/// is the documented maximum for `\\?\` extended paths.
const PATH_BUF_LEN: usize = 32_768;

const FILTER: &str = "Text Files (*.txt)\0*.txt\0All Files (*.*)\0*.*\0\0";

// ── Open dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Open File" dialog.
pub(crate) fn show_open_dialog(hwnd_owner: HWND) -> Option<PathBuf> {
    let mut buf = vec![0u16; PATH_BUF_LEN];
    let filter = wide(FILTER);

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        Flags: OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY,
        ..Default::default()
    };

    // SAFETY: `ofn` is fully initialised; `buf` and `filter` outlive this
    // call.  GetOpenFileNameW reads and writes only within the buffers we
    // provided.  Called on the UI thread (required for modal dialogs).
    let ok = unsafe { GetOpenFileNameW(&mut ofn) };
    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Save dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Save As" dialog, pre-filled with `current`'s file name.
/// New files get a `.txt` extension when the user types none.
pub(crate) fn show_save_dialog(hwnd_owner: HWND, current: Option<&Path>) -> Option<PathBuf> {
    let default_name = current
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut buf: Vec<u16> = default_name
        .encode_utf16()
        .chain(std::iter::repeat(0))
        .take(PATH_BUF_LEN)
        .collect();
    let filter = wide(FILTER);
    let ext = wide("txt\0");

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        lpstrDefExt: PCWSTR(ext.as_ptr()),
        Flags: OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST,
        ..Default::default()
    };

    // SAFETY: same invariants as show_open_dialog above.
    let ok = unsafe { GetSaveFileNameW(&mut ofn) };
    ok.as_bool().then(|| path_from_buf(&buf))
}

// ── Font picker ───────────────────────────────────────────────────────────────

/// Show the font dialog.  Returns the chosen family and point size.
pub(crate) fn choose_font(hwnd_owner: HWND, family: &str, points: u32) -> Option<(String, u32)> {
    let mut lf = LOGFONTW::default();
    for (dst, src) in lf.lfFaceName.iter_mut().zip(family.encode_utf16().take(31)) {
        *dst = src;
    }

    let mut cf = CHOOSEFONTW {
        lStructSize: std::mem::size_of::<CHOOSEFONTW>() as u32,
        hwndOwner: hwnd_owner,
        lpLogFont: &mut lf,
        iPointSize: (points * 10) as i32,
        Flags: CF_SCREENFONTS | CF_INITTOLOGFONTSTRUCT | CF_NOVERTFONTS,
        ..Default::default()
    };

    // SAFETY: `cf` points at `lf`, which outlives the call.  ChooseFontW
    // writes the selection back into `lf` and `cf.iPointSize` only.
    let ok = unsafe { ChooseFontW(&mut cf) };
    if !ok.as_bool() {
        return None;
    }

    let len = lf.lfFaceName.iter().position(|&c| c == 0).unwrap_or(lf.lfFaceName.len());
    let name = String::from_utf16_lossy(&lf.lfFaceName[..len]);
    // iPointSize is in tenths of a point.
    let size = u32::try_from((cf.iPointSize + 5) / 10).ok()?;
    Some((name, size))
}

// ── Colour picker ─────────────────────────────────────────────────────────────

/// Show the colour dialog starting at `initial`.
pub(crate) fn choose_color(hwnd_owner: HWND, initial: Rgb) -> Option<Rgb> {
    let mut custom = [COLORREF(0x00FF_FFFF); 16];

    let mut cc = CHOOSECOLORW {
        lStructSize: std::mem::size_of::<CHOOSECOLORW>() as u32,
        hwndOwner: hwnd_owner,
        rgbResult: colorref(initial),
        lpCustColors: custom.as_mut_ptr(),
        Flags: CC_RGBINIT | CC_FULLOPEN,
        ..Default::default()
    };

    // SAFETY: `custom` is the 16-entry array ChooseColorW requires and
    // outlives the call.
    let ok = unsafe { ChooseColorW(&mut cc) };
    ok.as_bool().then(|| rgb_from(cc.rgbResult))
}

// ── Message boxes ─────────────────────────────────────────────────────────────

/// Answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// Ask whether to save `name` before closing it.
pub(crate) fn confirm_unsaved(hwnd_owner: HWND, name: &str) -> UnsavedChoice {
    let body = wide(&format!("{name} has unsaved changes. Do you want to save them?"));
    let title = wide("Unsaved Changes");
    // SAFETY: both strings are null-terminated UTF-16 that outlive the call.
    let answer = unsafe {
        MessageBoxW(
            hwnd_owner,
            PCWSTR(body.as_ptr()),
            PCWSTR(title.as_ptr()),
            MB_YESNOCANCEL | MB_ICONWARNING,
        )
    };
    match answer {
        IDYES => UnsavedChoice::Save,
        IDNO => UnsavedChoice::Discard,
        _ => UnsavedChoice::Cancel,
    }
}

/// Modal error box.  Used for failed opens/saves and fatal startup errors.
pub(crate) fn show_error(hwnd_owner: HWND, message: &str) {
    message_box(hwnd_owner, "Jotter - Error", message, true);
}

/// Modal warning box.  Used for non-fatal failures such as settings saves.
pub(crate) fn show_warning(hwnd_owner: HWND, message: &str) {
    message_box(hwnd_owner, "Jotter", message, false);
}

fn message_box(hwnd_owner: HWND, title: &str, message: &str, error: bool) {
    let msg = wide(message);
    let title = wide(title);
    let icon = if error { MB_ICONERROR } else { MB_ICONWARNING };
    // SAFETY: msg and title are valid null-terminated UTF-16 strings that
    // remain allocated for the duration of the MessageBoxW call.
    // The button pressed is irrelevant for a single-button box.
    unsafe {
        let _ = MessageBoxW(hwnd_owner, PCWSTR(msg.as_ptr()), PCWSTR(title.as_ptr()), MB_OK | icon);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Null-terminated UTF-16 copy of `s`.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert a null-terminated UTF-16 buffer to a `PathBuf`.
fn path_from_buf(buf: &[u16]) -> PathBuf {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    PathBuf::from(String::from_utf16_lossy(&buf[..len]))
}
