// ── Editor windows ────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the editor window class and the accelerator table.
//   • Create one top-level window (menu bar, EDIT control, status bar) per
//     document window in the core `WindowManager`.
//   • Run the Win32 message loop and drive autosave from a thread timer.
//   • Translate WM_COMMAND / WM_CLOSE into `Command`s for `Editor::execute`
//     and carry out the returned `Outcome`.
//
// The window procedure is a free function, so the shell state it needs is
// parked in a UI-thread-local slot for the duration of `run()`.  Every access
// goes through `with_shell`, which refuses re-entrant borrows: messages sent
// synchronously while the shell is borrowed (EN_CHANGE from our own
// SetWindowTextW, WM_SIZE during creation) fall through to DefWindowProcW.
// Modal dialogs are always shown with the shell released.

#![allow(unsafe_code)]

use std::{cell::RefCell, collections::BTreeMap, path::PathBuf, time::Instant};

use tracing::{error, info, warn};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, RECT, TRUE, WPARAM},
        Graphics::Gdi::{InvalidateRect, SetBkColor, SetTextColor, HDC},
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            Controls::{InitCommonControlsEx, ICC_BAR_CLASSES, INITCOMMONCONTROLSEX},
            Input::KeyboardAndMouse::SetFocus,
            WindowsAndMessaging::{
                AppendMenuW, CheckMenuItem, CreateAcceleratorTableW, CreateMenu,
                CreatePopupMenu, CreateWindowExW, DefWindowProcW, DeleteMenu, DestroyWindow,
                DispatchMessageW, DrawMenuBar, GetAncestor, GetClientRect, GetMenu, GetMenuItemCount,
                GetMessageW, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, KillTimer,
                LoadCursorW, LoadIconW, MoveWindow, PostQuitMessage, RegisterClassExW,
                SendMessageW, SetTimer, SetWindowTextW, ShowWindow,
                TranslateAcceleratorW, TranslateMessage, ACCEL, CS_HREDRAW, CS_VREDRAW,
                CW_USEDEFAULT, FCONTROL, FSHIFT, FVIRTKEY, GA_ROOT, HACCEL, HMENU, IDC_ARROW,
                IDI_APPLICATION, MF_BYCOMMAND, MF_BYPOSITION, MF_CHECKED, MF_GRAYED, MF_POPUP,
                MF_SEPARATOR, MF_STRING, MF_UNCHECKED, MSG, SW_SHOW, WINDOW_EX_STYLE,
                WINDOW_STYLE, WM_CLOSE, WM_COMMAND, WM_CTLCOLOREDIT, WM_SETFOCUS, WM_SETFONT,
                WM_SIZE, WM_TIMER, WNDCLASSEXW, WS_CHILD, WS_EX_CLIENTEDGE, WS_OVERLAPPEDWINDOW,
                WS_VISIBLE, WS_VSCROLL,
            },
        },
    },
};

use jotter::{
    commands::{Command, Key, EDIT_MENU, FILE_MENU, FORMAT_MENU, VIEW_MENU},
    session::SettingsStore,
    Editor, JotterError, NoticeLevel, Outcome, Result, WindowId,
};

use super::{
    dialogs::{self, UnsavedChoice},
    messages::{
        EM_SETLIMITTEXT, EM_SETSEL, EN_CHANGE, ES_AUTOVSCROLL, ES_MULTILINE, ES_NOHIDESEL,
        ES_WANTRETURN, SB_SETTEXTW, SIZE_RESTORED, VK_ADD, VK_OEM_MINUS, VK_OEM_PLUS,
        VK_SUBTRACT, WM_COPY, WM_CUT, WM_PASTE,
    },
    style::{self, Style},
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register (and later find) the editor window class.
const CLASS_NAME: PCWSTR = w!("JotterEditorWindow");

/// Child id of the EDIT control inside each editor window.
const EDIT_ID: usize = 1;

/// Granularity of the autosave clock.  The core decides when a pass is due.
const CLOCK_TICK_MS: u32 = 1_000;

// ── Shell state ───────────────────────────────────────────────────────────────

/// Native handles belonging to one editor window.
struct View {
    hwnd: HWND,
    edit: HWND,
    status: HWND,
    recent_menu: HMENU,
}

struct Shell {
    editor: Editor,
    hinstance: HINSTANCE,
    views: BTreeMap<WindowId, View>,
    style: Style,
    last_tick: Instant,
}

impl Shell {
    fn id_of(&self, hwnd: HWND) -> Option<WindowId> {
        self.views.iter().find(|(_, v)| v.hwnd == hwnd).map(|(id, _)| *id)
    }

    fn hwnd_of(&self, id: WindowId) -> HWND {
        self.views.get(&id).map(|v| v.hwnd).unwrap_or_default()
    }
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = const { RefCell::new(None) };
}

/// Run `f` against the shell unless it is already borrowed further up the
/// stack (or not installed yet).
fn with_shell<R>(f: impl FnOnce(&mut Shell) -> R) -> Option<R> {
    SHELL.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load preferences, open the first editor window, and drive the message
/// loop until the last window closes.
pub(crate) fn run() -> Result<()> {
    style::init_dpi_awareness();

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime.
    let hmodule = unsafe { GetModuleHandleW(None) }?;
    let hinstance = HINSTANCE(hmodule.0);

    let icc = INITCOMMONCONTROLSEX {
        dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
        dwICC: ICC_BAR_CLASSES,
    };
    // SAFETY: icc is fully initialised; registers the status bar class.
    let _ = unsafe { InitCommonControlsEx(&icc) };

    register_class(hinstance)?;
    let accel = build_accelerators()?;

    let store = SettingsStore::at_default_location();
    info!(settings = %store.path().display(), "starting");
    let mut editor = Editor::start(store);
    let first = editor.open_new_window();
    let style = Style::from_prefs(editor.preferences(), style::dpi_for(HWND::default()));

    SHELL.with(|cell| {
        *cell.borrow_mut() = Some(Shell {
            editor,
            hinstance,
            views: BTreeMap::new(),
            style,
            last_tick: Instant::now(),
        });
    });

    // A thread timer (null HWND) arrives in the message loop directly rather
    // than at any one window, so closing windows never stops autosave.
    // SAFETY: no callback; the id is chosen by the system.
    let timer = unsafe { SetTimer(HWND::default(), 0, CLOCK_TICK_MS, None) };

    let result = open_native_window(first).and_then(|()| message_loop(accel));

    // SAFETY: timer was returned by SetTimer above.
    unsafe {
        let _ = KillTimer(HWND::default(), timer);
    }
    SHELL.with(|cell| cell.borrow_mut().take());
    result
}

/// Show a modal error dialog with the given message.
pub(crate) fn show_error_dialog(message: &str) {
    dialogs::show_error(HWND::default(), message);
}

// ── Window class & accelerators ───────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: IDI_APPLICATION and IDC_ARROW are built-in resources that exist
    // on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }?;
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }?;

    let wndclass = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
        ..Default::default()
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }
    Ok(())
}

/// Build the accelerator table from the command shortcuts.
fn build_accelerators() -> Result<HACCEL> {
    let mut table = Vec::new();
    for cmd in FILE_MENU
        .iter()
        .chain(EDIT_MENU)
        .chain(FORMAT_MENU)
        .chain(VIEW_MENU)
        .flatten()
    {
        let Some(shortcut) = cmd.shortcut() else {
            continue;
        };
        let mut flags = FVIRTKEY | FCONTROL;
        if shortcut.shift {
            flags |= FSHIFT;
        }
        let keys = match shortcut.key {
            Key::Char(c) => vec![c as u16],
            Key::Plus => vec![VK_OEM_PLUS, VK_ADD],
            Key::Minus => vec![VK_OEM_MINUS, VK_SUBTRACT],
        };
        for key in keys {
            table.push(ACCEL {
                fVirt: flags,
                key,
                cmd: cmd.id(),
            });
        }
    }
    // SAFETY: table is a valid slice of ACCEL entries; the system copies it.
    let accel = unsafe { CreateAcceleratorTableW(&table) }?;
    Ok(accel)
}

// ── Native window creation ────────────────────────────────────────────────────

/// Create the native window for core window `id` and register its view.
fn open_native_window(id: WindowId) -> Result<()> {
    let Some((hinstance, width, height, labels)) = with_shell(|s| {
        let p = s.editor.preferences();
        (s.hinstance, p.window_width, p.window_height, p.recent_files.labels())
    }) else {
        return Ok(());
    };

    let dpi = style::dpi_for(HWND::default());
    let (bar, recent_menu) = build_menu(&labels)?;

    // SAFETY: CLASS_NAME is registered; hinstance is the exe's module.  The
    // shell is not borrowed here, so messages sent during creation are
    // handled (and ignored, since the view is not registered yet).
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            w!("Jotter"),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            style::scale(width, dpi),
            style::scale(height, dpi),
            HWND::default(),
            bar,
            hinstance,
            None,
        )
    }?;

    let edit_style = WINDOW_STYLE(
        WS_CHILD.0
            | WS_VISIBLE.0
            | WS_VSCROLL.0
            | ES_MULTILINE
            | ES_AUTOVSCROLL
            | ES_NOHIDESEL
            | ES_WANTRETURN,
    );
    // SAFETY: hwnd is the parent just created; "EDIT" and the status bar
    // class are system classes (the latter registered by InitCommonControlsEx).
    let (edit, status) = unsafe {
        let edit = CreateWindowExW(
            WS_EX_CLIENTEDGE,
            w!("EDIT"),
            PCWSTR::null(),
            edit_style,
            0,
            0,
            0,
            0,
            hwnd,
            HMENU(EDIT_ID as _),
            hinstance,
            None,
        )?;
        let status = CreateWindowExW(
            WINDOW_EX_STYLE(0),
            w!("msctls_statusbar32"),
            PCWSTR::null(),
            WS_CHILD | WS_VISIBLE,
            0,
            0,
            0,
            0,
            hwnd,
            HMENU::default(),
            hinstance,
            None,
        )?;
        // Lift the default 32K character limit.
        SendMessageW(edit, EM_SETLIMITTEXT, WPARAM(0), LPARAM(0));
        (edit, status)
    };

    with_shell(|s| {
        s.views.insert(
            id,
            View {
                hwnd,
                edit,
                status,
                recent_menu,
            },
        );
    });

    apply_style(id);
    reload_text(id);
    refresh_chrome(id);
    layout(hwnd);

    // SAFETY: hwnd and edit are valid; ShowWindow's previous-visibility
    // result is intentionally ignored.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = SetFocus(edit);
    }
    Ok(())
}

/// Build the menu bar.  Returns the bar and the Recent Files popup.
fn build_menu(recent_labels: &[String]) -> Result<(HMENU, HMENU)> {
    // SAFETY: CreateMenu/CreatePopupMenu have no preconditions; every string
    // passed to AppendMenuW is null-terminated and outlives the call.
    unsafe {
        let bar = CreateMenu()?;
        let recent = CreatePopupMenu()?;
        fill_recent_menu(recent, recent_labels)?;

        for (title, items) in [
            (w!("&File"), FILE_MENU),
            (w!("&Edit"), EDIT_MENU),
            (w!("F&ormat"), FORMAT_MENU),
            (w!("&View"), VIEW_MENU),
        ] {
            let popup = CreatePopupMenu()?;
            for item in items {
                match item {
                    Some(cmd) => {
                        let text = dialogs::wide(&cmd.menu_text());
                        AppendMenuW(popup, MF_STRING, usize::from(cmd.id()), PCWSTR(text.as_ptr()))?;
                        if *cmd == Command::Open {
                            AppendMenuW(popup, MF_POPUP, recent.0 as usize, w!("Recent Files"))?;
                        }
                    }
                    None => AppendMenuW(popup, MF_SEPARATOR, 0, PCWSTR::null())?,
                }
            }
            AppendMenuW(bar, MF_POPUP, popup.0 as usize, title)?;
        }
        Ok((bar, recent))
    }
}

/// Replace the contents of the Recent Files popup.
///
/// # Safety
/// `menu` must be a valid popup menu handle.
unsafe fn fill_recent_menu(menu: HMENU, labels: &[String]) -> Result<()> {
    for _ in 0..GetMenuItemCount(menu).max(0) {
        DeleteMenu(menu, 0, MF_BYPOSITION)?;
    }
    for (i, label) in labels.iter().enumerate() {
        let text = dialogs::wide(&format!("&{} {label}", i + 1));
        AppendMenuW(menu, MF_STRING, usize::from(Command::OpenRecent(i).id()), PCWSTR(text.as_ptr()))?;
    }
    if labels.is_empty() {
        AppendMenuW(menu, MF_STRING | MF_GRAYED, 0, w!("(empty)"))?;
    } else {
        AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null())?;
        let text = dialogs::wide(Command::ClearRecent.label());
        AppendMenuW(menu, MF_STRING, usize::from(Command::ClearRecent.id()), PCWSTR(text.as_ptr()))?;
    }
    Ok(())
}

// ── View updates ──────────────────────────────────────────────────────────────

/// Refresh title, status bar, Recent Files menu and the Autosave check mark.
fn refresh_chrome(id: WindowId) {
    let Some((view, title, status, labels, autosave)) = with_shell(|s| {
        let v = s.views.get(&id)?;
        let p = s.editor.preferences();
        Some((
            (v.hwnd, v.status, v.recent_menu),
            s.editor.window_title(id),
            s.editor.status_text(id),
            p.recent_files.labels(),
            p.autosave_enabled,
        ))
    })
    .flatten() else {
        return;
    };
    let (hwnd, status_bar, recent_menu) = view;

    let title = dialogs::wide(&title);
    let status = dialogs::wide(&status);
    let check = if autosave { MF_CHECKED } else { MF_UNCHECKED };
    // SAFETY: all handles belong to a live view; strings are null-terminated
    // and outlive each call.
    unsafe {
        let _ = SetWindowTextW(hwnd, PCWSTR(title.as_ptr()));
        SendMessageW(status_bar, SB_SETTEXTW, WPARAM(0), LPARAM(status.as_ptr() as isize));
        if let Err(e) = fill_recent_menu(recent_menu, &labels) {
            warn!(error = %e, "could not rebuild Recent Files menu");
        }
        CheckMenuItem(
            GetMenu(hwnd),
            u32::from(Command::ToggleAutosave.id()),
            (MF_BYCOMMAND | check).0,
        );
        let _ = DrawMenuBar(hwnd);
    }
}

fn refresh_all() {
    for id in with_shell(|s| s.views.keys().copied().collect::<Vec<_>>()).unwrap_or_default() {
        refresh_chrome(id);
    }
}

/// Push the document text of `id` into its EDIT control.
fn reload_text(id: WindowId) {
    let Some((edit, text)) = with_shell(|s| {
        let v = s.views.get(&id)?;
        let doc = s.editor.document(id)?;
        Some((v.edit, dialogs::wide(doc.text())))
    })
    .flatten() else {
        return;
    };
    // SAFETY: edit is a live EDIT control; text is null-terminated.  The
    // resulting EN_CHANGE re-syncs identical text, which is a no-op.
    unsafe {
        let _ = SetWindowTextW(edit, PCWSTR(text.as_ptr()));
    }
}

/// Mirror the EDIT control of `hwnd` into the core document.
fn sync_from_control(hwnd: HWND) {
    let Some((id, edit)) = with_shell(|s| {
        let id = s.id_of(hwnd)?;
        Some((id, s.views.get(&id)?.edit))
    })
    .flatten() else {
        return;
    };
    let text = control_text(edit);
    with_shell(|s| s.editor.sync_text(id, &text));
    refresh_chrome(id);
}

fn control_text(hwnd: HWND) -> String {
    // SAFETY: hwnd is a live control; the buffer is sized from
    // GetWindowTextLengthW plus the terminator.
    unsafe {
        let len = GetWindowTextLengthW(hwnd).max(0) as usize;
        let mut buf = vec![0u16; len + 1];
        let copied = GetWindowTextW(hwnd, &mut buf).max(0) as usize;
        String::from_utf16_lossy(&buf[..copied])
    }
}

/// Select the shell's font into the EDIT control of `id`.
fn apply_style(id: WindowId) {
    let Some((edit, font)) =
        with_shell(|s| s.views.get(&id).map(|v| (v.edit, s.style.font()))).flatten()
    else {
        return;
    };
    // SAFETY: edit is a live control; font is owned by the shell's Style.
    unsafe {
        SendMessageW(edit, WM_SETFONT, WPARAM(font.0 as usize), LPARAM(1));
        let _ = InvalidateRect(edit, None, TRUE);
    }
}

/// Rebuild the shared Style from preferences and restyle every window.
fn restyle_all() {
    let Some((old, ids)) = with_shell(|s| {
        let fresh = Style::from_prefs(s.editor.preferences(), style::dpi_for(HWND::default()));
        let old = std::mem::replace(&mut s.style, fresh);
        (old, s.views.keys().copied().collect::<Vec<_>>())
    }) else {
        return;
    };
    for id in ids {
        apply_style(id);
    }
    drop(old);
}

/// Fit the EDIT control and status bar to the client area of `hwnd`.
fn layout(hwnd: HWND) {
    let Some((edit, status)) = with_shell(|s| {
        let id = s.id_of(hwnd)?;
        s.views.get(&id).map(|v| (v.edit, v.status))
    })
    .flatten() else {
        return;
    };
    // SAFETY: all three windows are live; RECTs are written by the calls.
    unsafe {
        // The status bar sizes itself on WM_SIZE.
        SendMessageW(status, WM_SIZE, WPARAM(0), LPARAM(0));
        let mut client = RECT::default();
        let mut bar = RECT::default();
        if GetClientRect(hwnd, &mut client).is_err() || GetWindowRect(status, &mut bar).is_err() {
            return;
        }
        let bar_height = bar.bottom - bar.top;
        let _ = MoveWindow(
            edit,
            0,
            0,
            client.right - client.left,
            (client.bottom - client.top - bar_height).max(0),
            TRUE,
        );
    }
}

/// Store the outer size of `hwnd` as the size for the next window.
fn remember_size(hwnd: HWND) {
    let mut rect = RECT::default();
    // SAFETY: hwnd is the live window receiving WM_SIZE; rect is written by
    // the call.
    if unsafe { GetWindowRect(hwnd, &mut rect) }.is_err() {
        return;
    }
    let dpi = style::dpi_for(hwnd);
    let width = style::unscale(rect.right - rect.left, dpi);
    let height = style::unscale(rect.bottom - rect.top, dpi);
    with_shell(|s| {
        if s.id_of(hwnd).is_some() {
            s.editor.set_window_size(width, height);
        }
    });
}

// ── Commands & outcomes ───────────────────────────────────────────────────────

/// Route one command from window `hwnd`.
fn dispatch(hwnd: HWND, cmd: Command) {
    let Some((id, edit)) = with_shell(|s| {
        let id = s.id_of(hwnd)?;
        Some((id, s.views.get(&id)?.edit))
    })
    .flatten() else {
        return;
    };

    // Clipboard transport and selection belong to the EDIT control; the
    // resulting EN_CHANGE brings the document up to date.
    let control_msg = match cmd {
        Command::Cut => Some((WM_CUT, WPARAM(0), LPARAM(0))),
        Command::Copy => Some((WM_COPY, WPARAM(0), LPARAM(0))),
        Command::Paste => Some((WM_PASTE, WPARAM(0), LPARAM(0))),
        Command::SelectAll => Some((EM_SETSEL, WPARAM(0), LPARAM(-1))),
        _ => None,
    };
    if let Some((msg, wparam, lparam)) = control_msg {
        // SAFETY: edit is a live EDIT control.
        unsafe {
            SendMessageW(edit, msg, wparam, lparam);
        }
        return;
    }

    let result = with_shell(|s| s.editor.execute(id, cmd));
    match result {
        Some(Ok(outcome)) => handle_outcome(outcome),
        Some(Err(e)) => report_error(hwnd, &e),
        None => {}
    }
}

/// Carry out what the core asked for.
fn handle_outcome(outcome: Outcome) {
    match outcome {
        Outcome::None => {}
        Outcome::ReloadText(id) => reload_text(id),
        Outcome::WindowOpened(id) => {
            if let Err(e) = open_native_window(id) {
                error!(error = %e, "could not create window");
                with_shell(|s| s.editor.force_close(id));
                show_error_dialog(&e.to_string());
            }
        }
        Outcome::StyleChanged => restyle_all(),
        Outcome::AskOpenPath(id) => {
            let owner = owner_of(id);
            if let Some(path) = dialogs::show_open_dialog(owner) {
                follow(owner, with_shell(|s| s.editor.open_path(id, path)));
            }
        }
        Outcome::AskSavePath(id) => {
            save_as_interactive(id);
        }
        Outcome::PickFont(id) => {
            let owner = owner_of(id);
            let Some((family, size)) = with_shell(|s| {
                let p = s.editor.preferences();
                (p.font_family.clone(), p.font_size)
            }) else {
                return;
            };
            if let Some((family, size)) = dialogs::choose_font(owner, &family, size) {
                with_shell(|s| {
                    s.editor.set_font_family(family);
                    s.editor.set_font_size(size);
                });
                restyle_all();
            }
        }
        Outcome::PickFontColor(id) | Outcome::PickBackgroundColor(id) => {
            let foreground = matches!(outcome, Outcome::PickFontColor(_));
            let owner = owner_of(id);
            let Some(initial) = with_shell(|s| {
                let p = s.editor.preferences();
                if foreground {
                    p.font_color
                } else {
                    p.background_color
                }
            }) else {
                return;
            };
            if let Some(color) = dialogs::choose_color(owner, initial) {
                with_shell(|s| {
                    if foreground {
                        s.editor.set_font_color(color);
                    } else {
                        s.editor.set_background_color(color);
                    }
                });
                restyle_all();
            }
        }
        Outcome::ConfirmClose(id) => {
            if resolve_unsaved(id) {
                if let Some(next) = with_shell(|s| s.editor.force_close(id)) {
                    handle_outcome(next);
                }
            }
        }
        Outcome::ConfirmNewFile(id) => {
            if resolve_unsaved(id) {
                if let Some(next) = with_shell(|s| s.editor.reset_document(id)) {
                    handle_outcome(next);
                }
            }
        }
        Outcome::WindowClosed(id) => destroy_view(id),
        Outcome::ConfirmExit(ids) => {
            if ids.into_iter().all(resolve_unsaved) {
                handle_outcome(Outcome::Quit);
            }
        }
        Outcome::Quit => quit(),
    }
    refresh_all();
}

/// Handle a command result that may carry an error.
fn follow(owner: HWND, result: Option<Result<Outcome>>) {
    match result {
        Some(Ok(next)) => handle_outcome(next),
        Some(Err(e)) => report_error(owner, &e),
        None => {}
    }
}

/// Ask for a path and save `id` there.  Returns `true` once saved.
fn save_as_interactive(id: WindowId) -> bool {
    let owner = owner_of(id);
    let current: Option<PathBuf> = with_shell(|s| {
        s.editor
            .document(id)
            .and_then(|d| d.path().map(|p| p.to_path_buf()))
    })
    .flatten();
    let Some(path) = dialogs::show_save_dialog(owner, current.as_deref()) else {
        return false;
    };
    match with_shell(|s| s.editor.save_as(id, path)) {
        Some(Ok(())) => true,
        Some(Err(e)) => {
            report_error(owner, &e);
            false
        }
        None => false,
    }
}

/// Ask save / discard / cancel for `id`.  Returns `true` if closing may go on.
fn resolve_unsaved(id: WindowId) -> bool {
    let owner = owner_of(id);
    let Some(name) = with_shell(|s| s.editor.document(id).map(|d| d.display_name())).flatten()
    else {
        return true;
    };
    match dialogs::confirm_unsaved(owner, &name) {
        UnsavedChoice::Discard => true,
        UnsavedChoice::Cancel => false,
        UnsavedChoice::Save => match with_shell(|s| s.editor.save(id)) {
            Some(Ok(Outcome::AskSavePath(_))) => save_as_interactive(id),
            Some(Ok(_)) => true,
            Some(Err(e)) => {
                report_error(owner, &e);
                false
            }
            None => false,
        },
    }
}

fn destroy_view(id: WindowId) {
    if let Some(view) = with_shell(|s| s.views.remove(&id)).flatten() {
        // SAFETY: the view was registered by open_native_window and is
        // destroyed exactly once, here.
        unsafe {
            let _ = DestroyWindow(view.hwnd);
        }
    }
}

/// Persist settings, destroy every window and end the message loop.
fn quit() {
    let saved = with_shell(|s| s.editor.shutdown());
    if let Some(Err(e)) = saved {
        warn!(error = %e, "settings not saved");
        dialogs::show_warning(HWND::default(), &e.to_string());
    }
    let ids = with_shell(|s| s.views.keys().copied().collect::<Vec<_>>()).unwrap_or_default();
    for id in ids {
        destroy_view(id);
    }
    // SAFETY: posts WM_QUIT to this thread's queue.
    unsafe { PostQuitMessage(0) };
}

fn owner_of(id: WindowId) -> HWND {
    with_shell(|s| s.hwnd_of(id)).unwrap_or_default()
}

fn report_error(owner: HWND, e: &JotterError) {
    warn!(error = %e, "command failed");
    dialogs::show_error(owner, &e.to_string());
}

/// Advance the autosave clock by the real time since the last tick.
fn on_clock_tick() {
    let ran = with_shell(|s| {
        let now = Instant::now();
        let elapsed = now.duration_since(s.last_tick);
        s.last_tick = now;
        let report = s.editor.tick(elapsed);
        for notice in s.editor.take_notices() {
            match notice.level {
                NoticeLevel::Warning => warn!(window = ?notice.window, "{}", notice.message),
                NoticeLevel::Info => info!(window = ?notice.window, "{}", notice.message),
            }
        }
        report.is_some()
    });
    if ran == Some(true) {
        refresh_all();
    }
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop(accel: HACCEL) -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };

        match ret.0 {
            -1 => return Err(last_error("GetMessageW")),
            0 => break,
            _ => {
                if msg.message == WM_TIMER && msg.hwnd == HWND::default() {
                    on_clock_tick();
                    continue;
                }
                // SAFETY: msg was populated by a successful GetMessageW call.
                // Accelerators are translated against the top-level window so
                // shortcuts work while the EDIT control has focus.
                unsafe {
                    let root = GetAncestor(msg.hwnd, GA_ROOT);
                    if root != HWND::default() && TranslateAcceleratorW(root, accel, &msg) != 0 {
                        continue;
                    }
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
        }
    }

    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_SIZE => {
            layout(hwnd);
            if wparam.0 == SIZE_RESTORED {
                remember_size(hwnd);
            }
            LRESULT(0)
        }

        WM_SETFOCUS => {
            if let Some(edit) = with_shell(|s| {
                let id = s.id_of(hwnd)?;
                s.views.get(&id).map(|v| v.edit)
            })
            .flatten()
            {
                let _ = SetFocus(edit);
            }
            LRESULT(0)
        }

        WM_CTLCOLOREDIT => {
            let hdc = HDC(wparam.0 as _);
            match with_shell(|s| (s.style.text_color(), s.style.background_color(), s.style.brush())) {
                Some((text, background, brush)) => {
                    SetTextColor(hdc, text);
                    SetBkColor(hdc, background);
                    LRESULT(brush.0 as isize)
                }
                None => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }

        WM_CLOSE => {
            dispatch(hwnd, Command::CloseWindow);
            LRESULT(0)
        }

        WM_COMMAND => {
            // Low word = command / control id; high word = notification code.
            let id = (wparam.0 & 0xFFFF) as u16;
            let code = (wparam.0 >> 16) & 0xFFFF;

            if lparam.0 != 0 {
                // From a child control.
                if usize::from(id) == EDIT_ID && code == EN_CHANGE {
                    sync_from_control(hwnd);
                }
                return LRESULT(0);
            }

            match Command::from_id(id) {
                Some(cmd) => {
                    dispatch(hwnd, cmd);
                    LRESULT(0)
                }
                None => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }

        // SAFETY: hwnd and message parameters are valid, provided by Windows.
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `JotterError`.
///
/// Call immediately after a Win32 function that signals failure.  `GetLastError`
/// reads thread-local state that any subsequent API call may overwrite.
fn last_error(function: &'static str) -> JotterError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    let code = unsafe { GetLastError() };
    JotterError::Win32 {
        function,
        code: code.0,
    }
}
