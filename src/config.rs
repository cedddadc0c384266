//! Compiled-in configuration tables.
//!
//! Keybinds, mouse-binds, color triples, tag labels, rules and layouts are
//! static data the core consumes read-only, in the tradition of dwm's
//! `config.def.h`: there is no runtime config file and no parser. Building
//! a different window manager out of this crate means editing this file
//! and recompiling, same as the reference it is ported from.

use crate::layout::LayoutKind;
use crate::tags::TagMask;

/// Tag labels shown on the bar, one per bit of [`TagMask`].
pub const TAGS: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Modifier held for every window-manager keybind.
pub const MODKEY: u32 = x11::xlib::Mod1Mask;

pub const BORDERPX: u32 = 1;
/// Pixels within which an interactive drag snaps to a work-area edge.
pub const SNAP: i32 = 32;
pub const SHOWBAR: bool = true;
pub const TOPBAR: bool = true;
/// Master-area fraction for `tile`, in `[0.05, 0.95]`.
pub const MFACT: f32 = 0.55;
/// Whether to respect ICCCM size hints for *tiled* clients too (floating
/// clients always respect them).
pub const RESIZEHINTS: bool = true;

pub const NORM_BORDER_COLOR: u64 = 0x444444;
pub const SEL_BORDER_COLOR: u64 = 0x005577;

/// A class/instance/title match that assigns tags, floating state and a
/// home monitor to newly managed clients. See [`crate::rules::RuleMatcher`].
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub class: Option<&'static str>,
    pub instance: Option<&'static str>,
    pub title: Option<&'static str>,
    pub tags: TagMask,
    pub is_floating: bool,
    /// Target monitor index, or `-1` for "don't care".
    pub monitor: i32,
}

pub const RULES: &[Rule] = &[
    Rule {
        class: Some("Gimp"),
        instance: None,
        title: None,
        tags: TagMask::empty(),
        is_floating: true,
        monitor: -1,
    },
    Rule {
        class: Some("Firefox"),
        instance: None,
        title: None,
        tags: TagMask::T9,
        is_floating: false,
        monitor: -1,
    },
];

/// One of the named layout strategies a monitor can select between its two
/// slots. See [`crate::layout::LayoutKind`].
pub const LAYOUTS: &[LayoutKind] = &[LayoutKind::Tile, LayoutKind::Floating, LayoutKind::Monocle];

/// An action a key- or mouse-bind triggers. Mirrors dwm's `void (*func)(const Arg *)`
/// but as a closed enum, since the core has a fixed, known action set rather
/// than an open plugin surface.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    Spawn(&'static [&'static str]),
    ToggleBar,
    FocusStack(i32),
    SetMasterFactor(f32),
    Zoom,
    View(TagMask),
    ViewPrev,
    ViewNext,
    ToggleView(TagMask),
    KillClient,
    SetLayout(usize),
    ToggleFloating,
    Tag(TagMask),
    ToggleTag(TagMask),
    FocusMon(i32),
    TagMon(i32),
    MoveMouse,
    ResizeMouse,
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct Key {
    pub modifiers: u32,
    pub keysym: u32,
    pub action: Action,
}

pub const TERMCMD: &[&str] = &["uxterm"];

/// Expands to the four binds dwm.c's `TAGKEYS` macro produces per tag
/// (`examples/original_source/config.def.h`): plain modkey views the tag,
/// +Control toggles it into the view, +Shift moves the focused client to
/// it, +Control+Shift toggles the focused client's membership in it.
macro_rules! tag_keys {
    ($keysym:expr, $tag:expr) => {
        [
            Key {
                modifiers: MODKEY,
                keysym: $keysym,
                action: Action::View(TagMask::nth($tag)),
            },
            Key {
                modifiers: MODKEY | x11::xlib::ControlMask,
                keysym: $keysym,
                action: Action::ToggleView(TagMask::nth($tag)),
            },
            Key {
                modifiers: MODKEY | x11::xlib::ShiftMask,
                keysym: $keysym,
                action: Action::Tag(TagMask::nth($tag)),
            },
            Key {
                modifiers: MODKEY | x11::xlib::ControlMask | x11::xlib::ShiftMask,
                keysym: $keysym,
                action: Action::ToggleTag(TagMask::nth($tag)),
            },
        ]
    };
}

/// Every bind except the nine per-tag groups, which live in [`TAG_KEYS`].
const KEYS_BASE: &[Key] = &[
    Key {
        modifiers: MODKEY | x11::xlib::ShiftMask,
        keysym: x11::keysym::XK_Return,
        action: Action::Spawn(TERMCMD),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_b,
        action: Action::ToggleBar,
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_j,
        action: Action::FocusStack(1),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_k,
        action: Action::FocusStack(-1),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_h,
        action: Action::SetMasterFactor(-0.05),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_l,
        action: Action::SetMasterFactor(0.05),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_Return,
        action: Action::Zoom,
    },
    Key {
        modifiers: MODKEY | x11::xlib::ShiftMask,
        keysym: x11::keysym::XK_c,
        action: Action::KillClient,
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_t,
        action: Action::SetLayout(0),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_f,
        action: Action::SetLayout(1),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_m,
        action: Action::SetLayout(2),
    },
    Key {
        modifiers: MODKEY | x11::xlib::ShiftMask,
        keysym: x11::keysym::XK_space,
        action: Action::ToggleFloating,
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_Left,
        action: Action::ViewPrev,
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_Right,
        action: Action::ViewNext,
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_comma,
        action: Action::FocusMon(-1),
    },
    Key {
        modifiers: MODKEY,
        keysym: x11::keysym::XK_period,
        action: Action::FocusMon(1),
    },
    Key {
        modifiers: MODKEY | x11::xlib::ShiftMask,
        keysym: x11::keysym::XK_comma,
        action: Action::TagMon(-1),
    },
    Key {
        modifiers: MODKEY | x11::xlib::ShiftMask,
        keysym: x11::keysym::XK_period,
        action: Action::TagMon(1),
    },
    Key {
        modifiers: MODKEY | x11::xlib::ShiftMask,
        keysym: x11::keysym::XK_q,
        action: Action::Quit,
    },
];

const TAG_KEYS: [[Key; 4]; 9] = [
    tag_keys!(x11::keysym::XK_1, 0),
    tag_keys!(x11::keysym::XK_2, 1),
    tag_keys!(x11::keysym::XK_3, 2),
    tag_keys!(x11::keysym::XK_4, 3),
    tag_keys!(x11::keysym::XK_5, 4),
    tag_keys!(x11::keysym::XK_6, 5),
    tag_keys!(x11::keysym::XK_7, 6),
    tag_keys!(x11::keysym::XK_8, 7),
    tag_keys!(x11::keysym::XK_9, 8),
];

/// The full keybind table: [`KEYS_BASE`] followed by the flattened
/// per-tag groups. Built once per lookup rather than cached, since it's
/// only walked at grab-time and on every `KeyPress`.
pub fn keys() -> Vec<Key> {
    let mut all: Vec<Key> = KEYS_BASE.to_vec();
    for group in TAG_KEYS.iter() {
        all.extend_from_slice(group);
    }
    all
}

/// Site a mouse click landed on, identifying which bind table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickSite {
    TagBar,
    LtSymbol,
    StatusText,
    WinTitle,
    ClientWin,
    RootWin,
}

#[derive(Debug, Clone, Copy)]
pub struct MouseBind {
    pub click: ClickSite,
    pub modifiers: u32,
    pub button: u32,
    pub action: Action,
}

pub const BUTTONS: &[MouseBind] = &[
    MouseBind {
        click: ClickSite::LtSymbol,
        modifiers: 0,
        button: 1,
        action: Action::SetLayout(0),
    },
    MouseBind {
        click: ClickSite::WinTitle,
        modifiers: 0,
        button: 2,
        action: Action::Zoom,
    },
    MouseBind {
        click: ClickSite::ClientWin,
        modifiers: MODKEY,
        button: 1,
        action: Action::MoveMouse,
    },
    MouseBind {
        click: ClickSite::ClientWin,
        modifiers: MODKEY,
        button: 2,
        action: Action::ToggleFloating,
    },
    MouseBind {
        click: ClickSite::ClientWin,
        modifiers: MODKEY,
        button: 3,
        action: Action::ResizeMouse,
    },
    MouseBind {
        click: ClickSite::TagBar,
        modifiers: 0,
        button: 1,
        action: Action::View(TagMask::empty()),
    },
    MouseBind {
        click: ClickSite::TagBar,
        modifiers: 0,
        button: 3,
        action: Action::ToggleView(TagMask::empty()),
    },
];
