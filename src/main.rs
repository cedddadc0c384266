//! Entry point: argument parsing, X display bring-up, and the main event
//! loop. Everything here and in `xconn::xlib_conn` is the only code in the
//! crate that ever touches a live `Display*`; `wm`/`event`/`focus`/`layout`
//! only ever see `dyn XConn` and are exercised against `FakeXConn` instead.

#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

use std::collections::HashMap;
use std::ffi::CString;
use std::mem::MaybeUninit;
use std::process::exit;
use std::sync::Mutex;

use env_logger::WriteStyle::Auto;
use libc::*;
use x11::xlib::*;

use dwm_core::atoms::{Atoms, Cursors};
use dwm_core::config;
use dwm_core::error::{is_benign_error, FatalError, XError};
use dwm_core::event::EventDispatcher;
use dwm_core::wm::WindowManager;
use dwm_core::xconn::xlib_conn::XlibConn;
use dwm_core::xconn::XConn;

const VERSION: &str = "0.1";

lazy_static! {
    /// Set from `on_wm_detected`, the error handler installed only during
    /// `check_other_wm`'s probe. Mirrors the old `WM_DETECTED` flag, now
    /// scoped to setup instead of living for the process lifetime.
    static ref OTHER_WM_DETECTED: Mutex<bool> = Mutex::new(false);
}

fn usage() -> ! {
    eprintln!("usage: dwm [-v]");
    exit(1);
}

fn parse_args() {
    let mut args = std::env::args().skip(1);
    match args.next() {
        None => {}
        Some(ref a) if a == "-v" => {
            println!("dwm-{}", VERSION);
            exit(0);
        }
        Some(_) => usage(),
    }
    if args.next().is_some() {
        usage();
    }
}

/// Installed only for the `checkotherwm` probe; any error here means some
/// other process already holds `SubstructureRedirectMask` on the root
/// window. Mirrors dwm.c's `checkotherwm`/its temporary `xerrordummy`
/// handler (`examples/original_source/dwm.c:473`).
unsafe extern "C" fn on_wm_detected(_display: *mut Display, event: *mut XErrorEvent) -> c_int {
    assert_eq!(
        (*event).error_code,
        BadAccess,
        "expected BadAccess while probing for another window manager"
    );
    *OTHER_WM_DETECTED.lock().unwrap() = true;
    0
}

/// The steady-state error handler: most errors here are a client window
/// that vanished between a request being queued and the server processing
/// it, not worth more than a trace. Mirrors dwm.c's `xerror`
/// (`examples/original_source/dwm.c` ~1870).
unsafe extern "C" fn xerror(_display: *mut Display, event: *mut XErrorEvent) -> c_int {
    let e = XError {
        request_code: (*event).request_code,
        error_code: (*event).error_code,
    };
    if is_benign_error(e) {
        trace!("ignoring benign X error {:?}", e);
    } else {
        error!("X error: request {} code {}", e.request_code, e.error_code);
    }
    0
}

/// Aborts with [`FatalError::OtherWmRunning`] if some other process already
/// holds `SubstructureRedirectMask` on the root window.
unsafe fn check_other_wm(display: *mut Display, root: Window) -> Result<(), FatalError> {
    *OTHER_WM_DETECTED.lock().unwrap() = false;
    XSetErrorHandler(Some(on_wm_detected));
    XSelectInput(display, root, SubstructureRedirectMask);
    XSync(display, False);
    if *OTHER_WM_DETECTED.lock().unwrap() {
        return Err(FatalError::OtherWmRunning);
    }
    XSetErrorHandler(Some(xerror));
    XSync(display, False);
    Ok(())
}

/// Builds a keycode→keysym table from the server's current mapping (group
/// 0, level 0 of each keycode), the form [`WindowManager::set_keycode_table`]
/// and `config::keys()` match against.
unsafe fn build_keycode_table(display: *mut Display) -> HashMap<u32, u32> {
    let mut min_keycode: c_int = MaybeUninit::zeroed().assume_init();
    let mut max_keycode: c_int = MaybeUninit::zeroed().assume_init();
    XDisplayKeycodes(display, &mut min_keycode, &mut max_keycode);
    let count = max_keycode - min_keycode + 1;

    let mut keysyms_per_keycode: c_int = MaybeUninit::zeroed().assume_init();
    let syms = XGetKeyboardMapping(
        display,
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
    XFree(syms as *mut c_void);
    table
}

/// Grabs every bind in [`config::keys`] on the root window, across the
/// lock-mask variants `event::clean_mask` strips. Mirrors dwm.c's
/// `grabkeys` (`examples/original_source/dwm.c:995`).
unsafe fn grab_keys(display: *mut Display, root: Window) {
    const MOD_VARIANTS: [c_uint; 4] = [0, LockMask, Mod2Mask, LockMask | Mod2Mask];
    XUngrabKey(display, 0 /* AnyKey */, AnyModifier, root);
    for bind in config::keys() {
        let keycode = XKeysymToKeycode(display, bind.keysym as KeySym);
        if keycode == 0 {
            continue;
        }
        for variant in MOD_VARIANTS {
            XGrabKey(
                display,
                keycode as c_int,
                bind.modifiers | variant,
                root,
                True,
                GrabModeAsync,
                GrabModeAsync,
            );
        }
    }
}

/// Enumerates the root window's current children for the startup scan.
/// A one-shot setup query, so it goes straight to Xlib rather than through
/// `XConn`. Mirrors dwm.c's `scan` (`examples/original_source/dwm.c:1443`).
unsafe fn query_tree(display: *mut Display, root: Window) -> Vec<Window> {
    let mut root_ret: Window = MaybeUninit::zeroed().assume_init();
    let mut parent_ret: Window = MaybeUninit::zeroed().assume_init();
    let mut children: *mut Window = MaybeUninit::zeroed().assume_init();
    let mut n: c_uint = MaybeUninit::zeroed().assume_init();
    let ok = XQueryTree(
        display,
        root,
        &mut root_ret,
        &mut parent_ret,
        &mut children,
        &mut n,
    );
    if ok == 0 || children.is_null() {
        return Vec::new();
    }
    let windows = std::slice::from_raw_parts(children, n as usize).to_vec();
    XFree(children as *mut c_void);
    windows
}

fn main() {
    parse_args();
    env_logger::builder()
        .format_timestamp(None)
        .write_style(Auto)
        .init();
    info!("starting");

    unsafe {
        let empty = CString::new("").unwrap();
        if setlocale(LC_CTYPE, empty.as_ptr()).is_null() {
            warn!("no locale support, expect odd characters in client titles");
        }
    }

    let mut conn = match unsafe { XlibConn::open() } {
        Ok(conn) => conn,
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    if let Err(e) = unsafe { check_other_wm(conn.display(), conn.root()) } {
        error!("{}", e);
        exit(1);
    }

    let (atoms, cursors, keycode_table) = unsafe {
        (
            Atoms::intern(conn.display()),
            Cursors::create(conn.display()),
            build_keycode_table(conn.display()),
        )
    };
    unsafe { grab_keys(conn.display(), conn.root()) };

    let screens = conn.screen_rects();
    let mut wm = WindowManager::new(conn.root(), atoms, cursors, &screens);
    wm.set_keycode_table(keycode_table);
    wm.refresh_status_text(&mut conn);

    let existing = unsafe { query_tree(conn.display(), conn.root()) };
    wm.scan(&mut conn, &existing);
    conn.flush();

    info!("entering event loop");
    while wm.running {
        let ev = conn.next_event();
        EventDispatcher::dispatch(&mut wm, &mut conn, ev);
        conn.flush();
    }
    info!("exiting");
}
