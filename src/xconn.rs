//! The X transport adaptor: an opaque duplex request/reply/event channel.
//!
//! Everything above this module talks to `dyn XConn`, never to `x11::xlib`
//! directly (the one exception is the handful of FFI seams inside
//! `XlibConn` itself and the unsafe cursor/atom setup in `atoms.rs`). This
//! is what lets `event.rs`/`wm.rs`/`focus.rs` be driven by `FakeXConn` in
//! unit tests without a live X server (`SPEC_FULL.md` §4.A).

use std::collections::HashMap;

use crate::error::XError;
use crate::geometry::{Rect, SizeHints};

/// A decoded X event. Variant payloads carry only the fields handlers
/// actually consult — the tagged-variant dispatch the design notes call
/// for in place of the opcode jump table (`spec.md` §9).
#[derive(Debug, Clone)]
pub enum XEvent {
    ButtonPress {
        window: u64,
        root_x: i32,
        root_y: i32,
        button: u32,
        state: u32,
    },
    KeyPress {
        keycode: u32,
        state: u32,
    },
    ConfigureRequest {
        window: u64,
        value_mask: u32,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        border_w: i32,
    },
    ConfigureNotifyRoot {
        width: i32,
        height: i32,
    },
    DestroyNotify {
        window: u64,
    },
    UnmapNotify {
        window: u64,
        event: u64,
    },
    EnterNotify {
        window: u64,
        mode_normal: bool,
        detail_inferior: bool,
    },
    Expose {
        window: u64,
        count: u32,
    },
    FocusIn {
        window: u64,
    },
    MappingNotifyKeyboard,
    MapRequest {
        window: u64,
    },
    PropertyNotify {
        window: u64,
        atom: u64,
    },
    MotionNotify {
        root_x: i32,
        root_y: i32,
    },
    ButtonRelease,
}

/// Opaque request/reply channel to the X server. Protocol details
/// (serialization, sequence numbers) are intentionally not exposed.
pub trait XConn {
    fn next_event(&mut self) -> XEvent;
    fn flush(&mut self);

    fn get_window_rect(&self, window: u64) -> Rect;
    fn get_window_class(&self, window: u64) -> (Option<String>, Option<String>);
    fn get_transient_for(&self, window: u64) -> Option<u64>;
    fn get_title(&self, window: u64) -> Option<String>;
    fn is_override_redirect(&self, window: u64) -> bool;

    /// Reads `WM_NORMAL_HINTS`, ICCCM 4.1.2.3. Missing fields come back
    /// zeroed, matching dwm.c's `updatesizehints` treating an absent hint as
    /// "unspecified" (`spec.md` §7).
    fn get_size_hints(&self, window: u64) -> SizeHints;

    /// Reads `WM_HINTS`: `(urgency, input == False)`. Mirrors dwm.c's
    /// `updatewmhints` (`examples/original_source/dwm.c` ~1900).
    fn get_wm_hints(&self, window: u64) -> (bool, bool);

    /// Reads `WM_PROTOCOLS` and reports `(supports WM_DELETE_WINDOW,
    /// supports WM_TAKE_FOCUS)`. Mirrors dwm.c's `checkatom`-via-
    /// `XGetWMProtocols` helper consulted from `manage()`/`killclient()`.
    fn window_protocols(&self, window: u64) -> (bool, bool);

    fn configure_window(&mut self, window: u64, geom: Rect, border_w: i32);
    fn move_resize(&mut self, window: u64, geom: Rect);
    fn set_border_width(&mut self, window: u64, border_w: i32);
    fn set_border_color(&mut self, window: u64, focused: bool);
    fn raise_window(&mut self, window: u64);
    fn restack_below(&mut self, window: u64, sibling: u64);
    fn map_window(&mut self, window: u64);
    fn unmap_window(&mut self, window: u64);
    fn set_input_focus(&mut self, window: u64);
    fn send_take_focus(&mut self, window: u64);
    fn send_delete(&mut self, window: u64);
    fn kill_client(&mut self, window: u64);
    fn set_wm_state(&mut self, window: u64, state: i64);

    /// Issues the passive button grabs a managed client needs for
    /// `config::BUTTONS`'s `ClientWin` binds to ever reach the window
    /// manager. A no-op against `FakeXConn`. Mirrors dwm.c's `grabbuttons()`
    /// (`examples/original_source/dwm.c:972`).
    fn grab_buttons(&mut self, _window: u64) {}

    fn grab_pointer(&mut self, resize: bool) -> bool;
    fn ungrab_pointer(&mut self);
    fn warp_pointer(&mut self, window: u64, x: i32, y: i32);
    fn root_pointer(&self) -> (i32, i32);
    fn screen_rects(&self) -> Vec<Rect>;

    /// Rebuilds the keycode→keysym table from the server's current mapping
    /// (group 0, level 0 of each keycode). A no-op (empty table) against
    /// `FakeXConn`; `XlibConn` re-queries `XGetKeyboardMapping`. Mirrors
    /// dwm.c's `mappingnotify`'s `XRefreshKeyboardMapping`-then-rebuild path
    /// (`examples/original_source/dwm.c:1188`).
    fn rebuild_keycode_table(&mut self) -> HashMap<u32, u32> {
        HashMap::new()
    }

    /// Re-grabs every bind in `config::keys()` on the root window, across
    /// the lock-mask variants `event::clean_mask` strips. A no-op against
    /// `FakeXConn`. Mirrors dwm.c's `grabkeys()`
    /// (`examples/original_source/dwm.c:995`).
    fn grab_keys(&mut self) {}

    /// The raw socket fd backing this connection, if any. Spawned children
    /// close it so they don't inherit the parent's X connection, mirroring
    /// dwm.c's `spawn()` closing `ConnectionNumber(dpy)`.
    fn connection_fd(&self) -> Option<i32> {
        None
    }
}

/// Minimal in-memory `XConn` used only by this crate's own tests. Records
/// the calls it receives so a test can assert on them; geometry/class
/// queries are backed by a small table the test populates.
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::{HashMap, VecDeque};

    #[derive(Default)]
    pub struct FakeXConn {
        pub events: VecDeque<XEvent>,
        pub windows: HashMap<u64, Rect>,
        pub classes: HashMap<u64, (Option<String>, Option<String>)>,
        pub transients: HashMap<u64, u64>,
        pub titles: HashMap<u64, String>,
        pub size_hints: HashMap<u64, SizeHints>,
        pub wm_hints: HashMap<u64, (bool, bool)>,
        pub protocols: HashMap<u64, (bool, bool)>,
        pub override_redirect: Vec<u64>,
        pub screens: Vec<Rect>,
        pub focused: Option<u64>,
        pub flushed: u32,
        pub configured: Vec<(u64, Rect)>,
    }

    impl XConn for FakeXConn {
        fn next_event(&mut self) -> XEvent {
            self.events.pop_front().unwrap_or(XEvent::ButtonRelease)
        }

        fn flush(&mut self) {
            self.flushed += 1;
        }

        fn get_window_rect(&self, window: u64) -> Rect {
            self.windows.get(&window).copied().unwrap_or_default()
        }

        fn get_window_class(&self, window: u64) -> (Option<String>, Option<String>) {
            self.classes.get(&window).cloned().unwrap_or_default()
        }

        fn get_transient_for(&self, window: u64) -> Option<u64> {
            self.transients.get(&window).copied()
        }

        fn get_title(&self, window: u64) -> Option<String> {
            self.titles.get(&window).cloned()
        }

        fn is_override_redirect(&self, window: u64) -> bool {
            self.override_redirect.contains(&window)
        }

        fn get_size_hints(&self, window: u64) -> SizeHints {
            self.size_hints.get(&window).copied().unwrap_or_default()
        }

        fn get_wm_hints(&self, window: u64) -> (bool, bool) {
            self.wm_hints.get(&window).copied().unwrap_or((false, false))
        }

        fn window_protocols(&self, window: u64) -> (bool, bool) {
            self.protocols.get(&window).copied().unwrap_or((false, false))
        }

        fn configure_window(&mut self, window: u64, geom: Rect, _border_w: i32) {
            self.configured.push((window, geom));
        }

        fn move_resize(&mut self, window: u64, geom: Rect) {
            self.windows.insert(window, geom);
        }

        fn set_border_width(&mut self, _window: u64, _border_w: i32) {}
        fn set_border_color(&mut self, _window: u64, _focused: bool) {}
        fn raise_window(&mut self, _window: u64) {}
        fn restack_below(&mut self, _window: u64, _sibling: u64) {}
        fn map_window(&mut self, _window: u64) {}
        fn unmap_window(&mut self, _window: u64) {}

        fn set_input_focus(&mut self, window: u64) {
            self.focused = Some(window);
        }

        fn send_take_focus(&mut self, _window: u64) {}
        fn send_delete(&mut self, _window: u64) {}
        fn kill_client(&mut self, _window: u64) {}
        fn set_wm_state(&mut self, _window: u64, _state: i64) {}

        fn grab_pointer(&mut self, _resize: bool) -> bool {
            true
        }

        fn ungrab_pointer(&mut self) {}
        fn warp_pointer(&mut self, _window: u64, _x: i32, _y: i32) {}

        fn root_pointer(&self) -> (i32, i32) {
            (0, 0)
        }

        fn screen_rects(&self) -> Vec<Rect> {
            self.screens.clone()
        }
    }
}

/// Concrete `XConn` over raw Xlib: `unsafe` is confined to the FFI call
/// sites, out-params go through `MaybeUninit` the way `XQueryTree` and
/// friends expect.
pub mod xlib_conn {
    use std::ffi::CString;
    use std::mem::MaybeUninit;

    use libc::{c_int, c_uint, c_void};
    use x11::xlib::{self, Display, Window, XEvent as RawXEvent};

    use super::{XConn, XEvent};
    use crate::config::{self, ClickSite};
    use crate::error::{FatalError, XError};
    use crate::geometry::{Rect, SizeHints};

    pub struct XlibConn {
        display: *mut Display,
        root: Window,
        last_error: Option<XError>,
    }

    impl XlibConn {
        /// # Safety
        /// Must be called before any other X request on this thread.
        pub unsafe fn open() -> Result<Self, FatalError> {
            let display = xlib::XOpenDisplay(std::ptr::null());
            if display.is_null() {
                return Err(FatalError::NoDisplay);
            }
            let root = xlib::XDefaultRootWindow(display);
            Ok(XlibConn {
                display,
                root,
                last_error: None,
            })
        }

        pub fn display(&self) -> *mut Display {
            self.display
        }

        pub fn root(&self) -> Window {
            self.root
        }

        pub fn take_last_error(&mut self) -> Option<XError> {
            self.last_error.take()
        }

        fn decode(&self, raw: &RawXEvent) -> XEvent {
            #[allow(non_upper_case_globals)]
            match raw.get_type() {
                xlib::ButtonPress => {
                    let e = unsafe { raw.button };
                    XEvent::ButtonPress {
                        window: e.window,
                        root_x: e.x_root,
                        root_y: e.y_root,
                        button: e.button,
                        state: e.state,
                    }
                }
                xlib::ButtonRelease => XEvent::ButtonRelease,
                xlib::MotionNotify => {
                    let e = unsafe { raw.motion };
                    XEvent::MotionNotify {
                        root_x: e.x_root,
                        root_y: e.y_root,
                    }
                }
                xlib::KeyPress => {
                    let e = unsafe { raw.key };
                    XEvent::KeyPress {
                        keycode: e.keycode,
                        state: e.state,
                    }
                }
                xlib::ConfigureRequest => {
                    let e = unsafe { raw.configure_request };
                    XEvent::ConfigureRequest {
                        window: e.window,
                        value_mask: e.value_mask as u32,
                        x: e.x,
                        y: e.y,
                        w: e.width,
                        h: e.height,
                        border_w: e.border_width,
                    }
                }
                xlib::ConfigureNotify => {
                    let e = unsafe { raw.configure };
                    XEvent::ConfigureNotifyRoot {
                        width: e.width,
                        height: e.height,
                    }
                }
                xlib::DestroyNotify => {
                    let e = unsafe { raw.destroy_window };
                    XEvent::DestroyNotify { window: e.window }
                }
                xlib::UnmapNotify => {
                    let e = unsafe { raw.unmap };
                    XEvent::UnmapNotify {
                        window: e.window,
                        event: e.event,
                    }
                }
                xlib::EnterNotify => {
                    let e = unsafe { raw.crossing };
                    XEvent::EnterNotify {
                        window: e.window,
                        mode_normal: e.mode == xlib::NotifyNormal,
                        detail_inferior: e.detail == xlib::NotifyInferior,
                    }
                }
                xlib::Expose => {
                    let e = unsafe { raw.expose };
                    XEvent::Expose {
                        window: e.window,
                        count: e.count as u32,
                    }
                }
                xlib::FocusIn => {
                    let e = unsafe { raw.focus_change };
                    XEvent::FocusIn { window: e.window }
                }
                xlib::MappingNotify => XEvent::MappingNotifyKeyboard,
                xlib::MapRequest => {
                    let e = unsafe { raw.map_request };
                    XEvent::MapRequest { window: e.window }
                }
                xlib::PropertyNotify => {
                    let e = unsafe { raw.property };
                    XEvent::PropertyNotify {
                        window: e.window,
                        atom: e.atom,
                    }
                }
                _ => XEvent::ButtonRelease,
            }
        }
    }

    impl XConn for XlibConn {
        fn next_event(&mut self) -> XEvent {
            unsafe {
                let mut ev: RawXEvent = MaybeUninit::zeroed().assume_init();
                xlib::XNextEvent(self.display, &mut ev);
                self.decode(&ev)
            }
        }

        fn flush(&mut self) {
            unsafe {
                xlib::XFlush(self.display);
            }
        }

        fn get_window_rect(&self, window: u64) -> Rect {
            unsafe {
                let mut attrs: xlib::XWindowAttributes = MaybeUninit::zeroed().assume_init();
                xlib::XGetWindowAttributes(self.display, window, &mut attrs);
                Rect::new(attrs.x, attrs.y, attrs.width, attrs.height)
            }
        }

        fn get_window_class(&self, window: u64) -> (Option<String>, Option<String>) {
            unsafe {
                let mut hint: xlib::XClassHint = MaybeUninit::zeroed().assume_init();
                if xlib::XGetClassHint(self.display, window, &mut hint) == 0 {
                    return (None, None);
                }
                let to_string = |p: *mut i8| -> Option<String> {
                    if p.is_null() {
                        None
                    } else {
                        let s = std::ffi::CStr::from_ptr(p).to_string_lossy().into_owned();
                        xlib::XFree(p as *mut c_void);
                        Some(s)
                    }
                };
                (to_string(hint.res_class), to_string(hint.res_name))
            }
        }

        fn get_transient_for(&self, window: u64) -> Option<u64> {
            unsafe {
                let mut trans: Window = 0;
                if xlib::XGetTransientForHint(self.display, window, &mut trans) != 0 && trans != 0
                {
                    Some(trans)
                } else {
                    None
                }
            }
        }

        fn get_title(&self, window: u64) -> Option<String> {
            unsafe {
                let mut prop: xlib::XTextProperty = MaybeUninit::zeroed().assume_init();
                if xlib::XGetWMName(self.display, window, &mut prop) == 0 || prop.nitems == 0 {
                    return None;
                }
                let s = std::ffi::CStr::from_ptr(prop.value as *const i8)
                    .to_string_lossy()
                    .into_owned();
                xlib::XFree(prop.value as *mut c_void);
                Some(s)
            }
        }

        fn is_override_redirect(&self, window: u64) -> bool {
            unsafe {
                let mut attrs: xlib::XWindowAttributes = MaybeUninit::zeroed().assume_init();
                xlib::XGetWindowAttributes(self.display, window, &mut attrs);
                attrs.override_redirect != 0
            }
        }

        /// Mirrors dwm.c's `updatesizehints` (`examples/original_source/
        /// dwm.c:1875`): a missing `WM_NORMAL_HINTS` leaves every field at
        /// its ICCCM "unspecified" zero, same as the reference's
        /// zero-initialized `XSizeHints` on `XGetWMNormalHints` failure.
        fn get_size_hints(&self, window: u64) -> SizeHints {
            unsafe {
                let mut size: xlib::XSizeHints = MaybeUninit::zeroed().assume_init();
                let mut supplied: i64 = 0;
                if xlib::XGetWMNormalHints(self.display, window, &mut size, &mut supplied) == 0 {
                    return SizeHints::default();
                }
                let mut hints = SizeHints::default();
                if size.flags & xlib::PBaseSize != 0 {
                    hints.base_w = size.base_width;
                    hints.base_h = size.base_height;
                } else if size.flags & xlib::PMinSize != 0 {
                    hints.base_w = size.min_width;
                    hints.base_h = size.min_height;
                }
                if size.flags & xlib::PResizeInc != 0 {
                    hints.inc_w = size.width_inc;
                    hints.inc_h = size.height_inc;
                }
                if size.flags & xlib::PMaxSize != 0 {
                    hints.max_w = size.max_width;
                    hints.max_h = size.max_height;
                }
                if size.flags & xlib::PMinSize != 0 {
                    hints.min_w = size.min_width;
                    hints.min_h = size.min_height;
                } else if size.flags & xlib::PBaseSize != 0 {
                    hints.min_w = size.base_width;
                    hints.min_h = size.base_height;
                }
                if size.flags & xlib::PAspect != 0 {
                    hints.min_aspect = size.min_aspect.y as f32 / size.min_aspect.x as f32;
                    hints.max_aspect = size.max_aspect.x as f32 / size.max_aspect.y as f32;
                }
                hints
            }
        }

        /// Mirrors dwm.c's `updatewmhints` (`examples/original_source/
        /// dwm.c:1900`): urgency from `XUrgencyHint`, never-take-focus from
        /// an explicit `input == False`.
        fn get_wm_hints(&self, window: u64) -> (bool, bool) {
            unsafe {
                let ptr = xlib::XGetWMHints(self.display, window);
                if ptr.is_null() {
                    return (false, false);
                }
                let h = *ptr;
                let urgent = h.flags & xlib::XUrgencyHint != 0;
                let never_focus = h.flags & xlib::InputHint != 0 && h.input == 0;
                xlib::XFree(ptr as *mut c_void);
                (urgent, never_focus)
            }
        }

        /// Mirrors dwm.c's `WM_PROTOCOLS` scan in `manage()`/`killclient()`
        /// (`examples/original_source/dwm.c` ~1150, 1050).
        fn window_protocols(&self, window: u64) -> (bool, bool) {
            unsafe {
                let mut protocols: *mut xlib::Atom = std::ptr::null_mut();
                let mut count: c_int = 0;
                if xlib::XGetWMProtocols(self.display, window, &mut protocols, &mut count) == 0
                    || protocols.is_null()
                {
                    return (false, false);
                }
                let delete_atom = self.intern("WM_DELETE_WINDOW");
                let take_focus_atom = self.intern("WM_TAKE_FOCUS");
                let slice = std::slice::from_raw_parts(protocols, count as usize);
                let delete = slice.contains(&delete_atom);
                let take_focus = slice.contains(&take_focus_atom);
                xlib::XFree(protocols as *mut c_void);
                (delete, take_focus)
            }
        }

        fn configure_window(&mut self, window: u64, geom: Rect, border_w: i32) {
            unsafe {
                let mut changes = xlib::XWindowChanges {
                    x: geom.x,
                    y: geom.y,
                    width: geom.w,
                    height: geom.h,
                    border_width: border_w,
                    sibling: 0,
                    stack_mode: 0,
                };
                let mask = (xlib::CWX
                    | xlib::CWY
                    | xlib::CWWidth
                    | xlib::CWHeight
                    | xlib::CWBorderWidth) as c_uint;
                xlib::XConfigureWindow(self.display, window, mask, &mut changes);
            }
        }

        fn move_resize(&mut self, window: u64, geom: Rect) {
            unsafe {
                xlib::XMoveResizeWindow(
                    self.display,
                    window,
                    geom.x,
                    geom.y,
                    geom.w.max(1) as c_uint,
                    geom.h.max(1) as c_uint,
                );
            }
        }

        fn set_border_width(&mut self, window: u64, border_w: i32) {
            unsafe {
                let mut changes = xlib::XWindowChanges {
                    x: 0,
                    y: 0,
                    width: 0,
                    height: 0,
                    border_width: border_w,
                    sibling: 0,
                    stack_mode: 0,
                };
                xlib::XConfigureWindow(
                    self.display,
                    window,
                    xlib::CWBorderWidth as c_uint,
                    &mut changes,
                );
            }
        }

        fn set_border_color(&mut self, window: u64, focused: bool) {
            use crate::config::{NORM_BORDER_COLOR, SEL_BORDER_COLOR};
            let color = if focused {
                SEL_BORDER_COLOR
            } else {
                NORM_BORDER_COLOR
            };
            unsafe {
                xlib::XSetWindowBorder(self.display, window, color);
            }
        }

        fn raise_window(&mut self, window: u64) {
            unsafe {
                xlib::XRaiseWindow(self.display, window);
            }
        }

        fn restack_below(&mut self, window: u64, sibling: u64) {
            unsafe {
                let mut changes = xlib::XWindowChanges {
                    x: 0,
                    y: 0,
                    width: 0,
                    height: 0,
                    border_width: 0,
                    sibling,
                    stack_mode: xlib::Below,
                };
                xlib::XConfigureWindow(
                    self.display,
                    window,
                    (xlib::CWSibling | xlib::CWStackMode) as c_uint,
                    &mut changes,
                );
            }
        }

        fn map_window(&mut self, window: u64) {
            unsafe {
                xlib::XMapWindow(self.display, window);
            }
        }

        fn unmap_window(&mut self, window: u64) {
            unsafe {
                xlib::XUnmapWindow(self.display, window);
            }
        }

        fn set_input_focus(&mut self, window: u64) {
            unsafe {
                xlib::XSetInputFocus(
                    self.display,
                    window,
                    xlib::RevertToPointerRoot,
                    xlib::CurrentTime,
                );
            }
        }

        fn send_take_focus(&mut self, window: u64) {
            self.send_protocol_message(window, "WM_TAKE_FOCUS");
        }

        fn send_delete(&mut self, window: u64) {
            self.send_protocol_message(window, "WM_DELETE_WINDOW");
        }

        fn kill_client(&mut self, window: u64) {
            unsafe {
                xlib::XKillClient(self.display, window);
            }
        }

        fn set_wm_state(&mut self, window: u64, state: i64) {
            unsafe {
                let atom = self.intern("WM_STATE");
                let data = [state, 0i64];
                xlib::XChangeProperty(
                    self.display,
                    window,
                    atom,
                    atom,
                    32,
                    xlib::PropModeReplace,
                    data.as_ptr() as *const u8,
                    2,
                );
            }
        }

        fn grab_buttons(&mut self, window: u64) {
            // Lock-mask variants this crate actually distinguishes: keeping
            // this list in sync with `event::clean_mask`'s stripped bits
            // (`LockMask | Mod2Mask`) means every combination a real keyboard
            // can produce still resolves to a configured bind.
            const MOD_VARIANTS: [u32; 4] = [
                0,
                xlib::LockMask as u32,
                xlib::Mod2Mask as u32,
                (xlib::LockMask | xlib::Mod2Mask) as u32,
            ];
            let button_mask = (xlib::ButtonPressMask | xlib::ButtonReleaseMask) as c_uint;
            unsafe {
                xlib::XUngrabButton(self.display, xlib::AnyButton as c_uint, xlib::AnyModifier, window);
                for bind in config::BUTTONS {
                    if bind.click != ClickSite::ClientWin {
                        continue;
                    }
                    for variant in MOD_VARIANTS {
                        xlib::XGrabButton(
                            self.display,
                            bind.button,
                            bind.modifiers | variant,
                            window,
                            xlib::False,
                            button_mask,
                            xlib::GrabModeAsync,
                            xlib::GrabModeSync,
                            0,
                            0,
                        );
                    }
                }
            }
        }

        fn grab_pointer(&mut self, resize: bool) -> bool {
            unsafe {
                const XC_SIZING: u32 = 120;
                const XC_FLEUR: u32 = 52;
                let cursor =
                    xlib::XCreateFontCursor(self.display, if resize { XC_SIZING } else { XC_FLEUR });
                let mask = (xlib::ButtonPressMask
                    | xlib::ButtonReleaseMask
                    | xlib::PointerMotionMask) as c_uint;
                xlib::XGrabPointer(
                    self.display,
                    self.root,
                    0,
                    mask,
                    xlib::GrabModeAsync,
                    xlib::GrabModeAsync,
                    0,
                    cursor,
                    xlib::CurrentTime,
                ) == xlib::GrabSuccess as c_int
            }
        }

        fn ungrab_pointer(&mut self) {
            unsafe {
                xlib::XUngrabPointer(self.display, xlib::CurrentTime);
            }
        }

        fn warp_pointer(&mut self, window: u64, x: i32, y: i32) {
            unsafe {
                xlib::XWarpPointer(self.display, 0, window, 0, 0, 0, 0, x, y);
            }
        }

        fn root_pointer(&self) -> (i32, i32) {
            unsafe {
                let (mut root_ret, mut child_ret) = (0 as Window, 0 as Window);
                let (mut rx, mut ry, mut wx, mut wy) = (0, 0, 0, 0);
                let mut mask: c_uint = 0;
                xlib::XQueryPointer(
                    self.display,
                    self.root,
                    &mut root_ret,
                    &mut child_ret,
                    &mut rx,
                    &mut ry,
                    &mut wx,
                    &mut wy,
                    &mut mask,
                );
                (rx, ry)
            }
        }

        fn screen_rects(&self) -> Vec<Rect> {
            // Xinerama/RandR query is a transport-level concern the core
            // treats as opaque (spec.md §1); the reconciler falls back to
            // a single screen-sized monitor when no extension is queried.
            unsafe {
                let screen = xlib::XDefaultScreenOfDisplay(self.display);
                vec![Rect::new(
                    0,
                    0,
                    xlib::XWidthOfScreen(screen),
                    xlib::XHeightOfScreen(screen),
                )]
            }
        }

        fn connection_fd(&self) -> Option<i32> {
            Some(unsafe { xlib::XConnectionNumber(self.display) })
        }

        fn rebuild_keycode_table(&mut self) -> HashMap<u32, u32> {
            unsafe {
                let mut min_keycode: c_int = MaybeUninit::zeroed().assume_init();
                let mut max_keycode: c_int = MaybeUninit::zeroed().assume_init();
                xlib::XDisplayKeycodes(self.display, &mut min_keycode, &mut max_keycode);
                let count = max_keycode - min_keycode + 1;

                let mut keysyms_per_keycode: c_int = MaybeUninit::zeroed().assume_init();
                let syms = xlib::XGetKeyboardMapping(
                    self.display,
                    min_keycode as u8,
                    count,
                    &mut keysyms_per_keycode,
                );

                let mut table = HashMap::new();
                if keysyms_per_keycode > 0 {
                    for i in 0..count {
                        let sym = *syms.offset((i * keysyms_per_keycode) as isize);
                        if sym != 0 {
                            table.insert((min_keycode + i) as u32, sym as u32);
                        }
                    }
                }
                xlib::XFree(syms as *mut c_void);
                table
            }
        }

        fn grab_keys(&mut self) {
            const MOD_VARIANTS: [u32; 4] = [
                0,
                xlib::LockMask as u32,
                xlib::Mod2Mask as u32,
                (xlib::LockMask | xlib::Mod2Mask) as u32,
            ];
            unsafe {
                xlib::XUngrabKey(self.display, 0 /* AnyKey */, xlib::AnyModifier, self.root);
                for bind in config::keys() {
                    let keycode = xlib::XKeysymToKeycode(self.display, bind.keysym as xlib::KeySym);
                    if keycode == 0 {
                        continue;
                    }
                    for variant in MOD_VARIANTS {
                        xlib::XGrabKey(
                            self.display,
                            keycode as c_int,
                            bind.modifiers | variant,
                            self.root,
                            xlib::True,
                            xlib::GrabModeAsync,
                            xlib::GrabModeAsync,
                        );
                    }
                }
            }
        }
    }

    impl XlibConn {
        fn intern(&self, name: &str) -> xlib::Atom {
            let c = CString::new(name).unwrap();
            unsafe { xlib::XInternAtom(self.display, c.as_ptr(), xlib::False) }
        }

        fn send_protocol_message(&mut self, window: u64, protocol: &str) {
            unsafe {
                let wm_protocols = self.intern("WM_PROTOCOLS");
                let proto = self.intern(protocol);
                let mut ev: xlib::XClientMessageEvent = MaybeUninit::zeroed().assume_init();
                ev.type_ = xlib::ClientMessage;
                ev.window = window;
                ev.message_type = wm_protocols;
                ev.format = 32;
                ev.data.set_long(0, proto as i64);
                ev.data.set_long(1, xlib::CurrentTime as i64);
                let mut raw: RawXEvent = std::mem::transmute(ev);
                xlib::XSendEvent(self.display, window, 0, 0, &mut raw);
            }
        }
    }

    impl Drop for XlibConn {
        fn drop(&mut self) {
            unsafe {
                xlib::XCloseDisplay(self.display);
            }
        }
    }
}
