//! Atom and cursor registry: resolved once at setup, consulted everywhere.

use std::ffi::CString;

use x11::xlib::{self, Atom, Cursor, Display};

/// Named atoms the core reads or writes. Resolved once via `XInternAtom`.
/// The `_NET_*` atoms beyond `_NET_WM_NAME` are carried because dwm.c
/// resolves and advertises them in `_NET_SUPPORTED` even though behavioral
/// coverage stops at `_NET_WM_NAME` (`spec.md` §1 Non-goals) — the atom
/// table is ambient plumbing, not a feature (`SPEC_FULL.md` §4.B).
#[derive(Debug, Clone, Copy)]
pub struct Atoms {
    pub wm_protocols: Atom,
    pub wm_delete_window: Atom,
    pub wm_take_focus: Atom,
    pub wm_state: Atom,
    pub net_supported: Atom,
    pub net_wm_name: Atom,
    pub net_wm_state: Atom,
    pub net_wm_state_fullscreen: Atom,
    pub net_wm_window_type: Atom,
    pub net_wm_window_type_dialog: Atom,
    pub net_active_window: Atom,
    pub utf8_string: Atom,
}

impl Atoms {
    /// # Safety
    /// `display` must be a valid, open `Display*`.
    pub unsafe fn intern(display: *mut Display) -> Self {
        let intern = |name: &str| -> Atom {
            let c = CString::new(name).expect("atom name has no interior NUL");
            xlib::XInternAtom(display, c.as_ptr(), xlib::False)
        };
        Atoms {
            wm_protocols: intern("WM_PROTOCOLS"),
            wm_delete_window: intern("WM_DELETE_WINDOW"),
            wm_take_focus: intern("WM_TAKE_FOCUS"),
            wm_state: intern("WM_STATE"),
            net_supported: intern("_NET_SUPPORTED"),
            net_wm_name: intern("_NET_WM_NAME"),
            net_wm_state: intern("_NET_WM_STATE"),
            net_wm_state_fullscreen: intern("_NET_WM_STATE_FULLSCREEN"),
            net_wm_window_type: intern("_NET_WM_WINDOW_TYPE"),
            net_wm_window_type_dialog: intern("_NET_WM_WINDOW_TYPE_DIALOG"),
            net_active_window: intern("_NET_ACTIVE_WINDOW"),
            utf8_string: intern("UTF8_STRING"),
        }
    }

    /// Atoms advertised via `_NET_SUPPORTED` on the root window.
    pub fn supported(&self) -> [Atom; 2] {
        [self.net_supported, self.net_wm_name]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cursors {
    pub normal: Cursor,
    pub resize: Cursor,
    pub mv: Cursor,
}

impl Cursors {
    /// # Safety
    /// `display` must be a valid, open `Display*`.
    pub unsafe fn create(display: *mut Display) -> Self {
        // Glyph indices from X11/cursorfont.h.
        const XC_LEFT_PTR: u32 = 68;
        const XC_SIZING: u32 = 120;
        const XC_FLEUR: u32 = 52;
        Cursors {
            normal: xlib::XCreateFontCursor(display, XC_LEFT_PTR),
            resize: xlib::XCreateFontCursor(display, XC_SIZING),
            mv: xlib::XCreateFontCursor(display, XC_FLEUR),
        }
    }
}
