// ── Font and colour resources ─────────────────────────────────────────────────
//
// One `Style` is shared by every editor window.  It is rebuilt from the
// preferences whenever the font or colours change; the old GDI objects are
// released on drop.
//
// Colour conventions:
//   • `Rgb` is 0xRRGGBB.
//   • Win32 `COLORREF` is 0x00BBGGRR; `colorref` / `rgb_from` convert.

#![allow(unsafe_code)]

use windows::Win32::{
    Foundation::{COLORREF, HWND},
    Graphics::Gdi::{
        CreateFontIndirectW, CreateSolidBrush, DeleteObject, HBRUSH, HFONT, HGDIOBJ, LOGFONTW,
    },
    UI::HiDpi::{
        GetDpiForSystem, GetDpiForWindow, SetProcessDpiAwarenessContext,
        DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    },
};

use jotter::session::{Preferences, Rgb};

/// Family name meaning "let GDI pick its default face".
const DEFAULT_FAMILY: &str = "Default";

const BASE_DPI: u32 = 96;

// ── Colour conversion ─────────────────────────────────────────────────────────

pub(super) fn colorref(c: Rgb) -> COLORREF {
    COLORREF(u32::from(c.0) | (u32::from(c.1) << 8) | (u32::from(c.2) << 16))
}

pub(super) fn rgb_from(c: COLORREF) -> Rgb {
    Rgb(c.0 as u8, (c.0 >> 8) as u8, (c.0 >> 16) as u8)
}

// ── DPI ───────────────────────────────────────────────────────────────────────

/// Opt into Per-Monitor v2 DPI awareness.
/// MUST be called before any window is created on the calling thread.
pub(super) fn init_dpi_awareness() {
    // SAFETY: Must precede all window creation; single call at process start.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// DPI of `hwnd`, or of the primary monitor when `hwnd` is null.
pub(super) fn dpi_for(hwnd: HWND) -> u32 {
    // SAFETY: GetDpiForWindow accepts any window handle owned by this
    // process; GetDpiForSystem takes no parameters.  Both return 0 on failure.
    let v = unsafe {
        if hwnd == HWND::default() {
            GetDpiForSystem()
        } else {
            GetDpiForWindow(hwnd)
        }
    };
    if v == 0 {
        BASE_DPI
    } else {
        v
    }
}

/// Scale a pixel value defined at 96 DPI to `dpi`.
pub(super) fn scale(px: u32, dpi: u32) -> i32 {
    let scaled = u64::from(px) * u64::from(dpi) / u64::from(BASE_DPI);
    i32::try_from(scaled).unwrap_or(i32::MAX)
}

/// Inverse of `scale`: physical pixels at `dpi` back to 96-DPI pixels.
pub(super) fn unscale(px: i32, dpi: u32) -> u32 {
    let px = u64::try_from(px).unwrap_or(0);
    let logical = px * u64::from(BASE_DPI) / u64::from(dpi.max(1));
    u32::try_from(logical).unwrap_or(u32::MAX)
}

/// Logical font height for a point size (negative = character height).
fn font_height(points: u32, dpi: u32) -> i32 {
    -(((points * dpi) + 36) / 72) as i32
}

// ── Style ─────────────────────────────────────────────────────────────────────

pub(super) struct Style {
    font: HFONT,
    brush: HBRUSH,
    text: COLORREF,
    background: COLORREF,
}

impl Style {
    pub(super) fn from_prefs(prefs: &Preferences, dpi: u32) -> Self {
        let mut lf = LOGFONTW {
            lfHeight: font_height(prefs.font_size, dpi),
            ..Default::default()
        };
        if prefs.font_family != DEFAULT_FAMILY {
            // lfFaceName is 32 WCHARs including the terminator.
            for (dst, src) in lf
                .lfFaceName
                .iter_mut()
                .zip(prefs.font_family.encode_utf16().take(31))
            {
                *dst = src;
            }
        }

        let text = colorref(prefs.font_color);
        let background = colorref(prefs.background_color);

        // SAFETY: lf is fully initialised; CreateFontIndirectW copies it.
        // CreateSolidBrush has no pointer arguments.  Both handles are owned
        // by this Style and released in Drop.
        let (font, brush) = unsafe { (CreateFontIndirectW(&lf), CreateSolidBrush(background)) };

        Self {
            font,
            brush,
            text,
            background,
        }
    }

    pub(super) fn font(&self) -> HFONT {
        self.font
    }

    pub(super) fn brush(&self) -> HBRUSH {
        self.brush
    }

    pub(super) fn text_color(&self) -> COLORREF {
        self.text
    }

    pub(super) fn background_color(&self) -> COLORREF {
        self.background
    }
}

impl Drop for Style {
    fn drop(&mut self) {
        // SAFETY: both objects were created by this Style.  Callers swap in a
        // replacement Style and re-send WM_SETFONT before dropping the old one,
        // so no control still selects these objects.
        unsafe {
            let _ = DeleteObject(HGDIOBJ(self.font.0));
            let _ = DeleteObject(HGDIOBJ(self.brush.0));
        }
    }
}
