//! Per-window client records.

use bitflags::bitflags;

use crate::geometry::{Rect, SizeHints};
use crate::monitor::MonitorId;
use crate::tags::TagMask;

/// Stable small-integer handle for a managed client, replacing the
/// intrusive pointer links the reference implementation uses (see
/// `SPEC_FULL.md` §3 and the arena design note in `spec.md` §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub u32);

bitflags! {
    pub struct ClientFlags: u8 {
        /// `min == max` in both dimensions; can never be resized by a layout.
        const FIXED       = 1 << 0;
        /// Bypasses layout; positioned and sized freely.
        const FLOATING    = 1 << 1;
        /// `WM_HINTS.urgency` set and not currently selected on its monitor.
        const URGENT      = 1 << 2;
        /// `WM_HINTS.input == False`: never take X input focus directly.
        const NEVER_FOCUS = 1 << 3;
        /// `WM_PROTOCOLS` advertises `WM_TAKE_FOCUS`.
        const TAKES_FOCUS = 1 << 4;
        /// `WM_PROTOCOLS` advertises `WM_DELETE_WINDOW`.
        const SUPPORTS_DELETE = 1 << 5;
    }
}

pub const TITLE_CAP: usize = 256;

/// One managed top-level window.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub window: u64,
    pub geom: Rect,
    pub border_w: i32,
    pub old_border_w: i32,
    pub title: String,
    pub tags: TagMask,
    pub flags: ClientFlags,
    pub hints: SizeHints,
    pub mon: MonitorId,
}

impl Client {
    pub fn new(id: ClientId, window: u64, mon: MonitorId, geom: Rect, border_w: i32) -> Self {
        Client {
            id,
            window,
            geom,
            border_w,
            old_border_w: border_w,
            title: String::new(),
            tags: TagMask::empty(),
            flags: ClientFlags::empty(),
            hints: SizeHints::default(),
            mon,
        }
    }

    pub fn is_floating(&self) -> bool {
        self.flags.contains(ClientFlags::FLOATING)
    }

    pub fn is_fixed(&self) -> bool {
        self.flags.contains(ClientFlags::FIXED)
    }

    pub fn is_urgent(&self) -> bool {
        self.flags.contains(ClientFlags::URGENT)
    }

    pub fn set_title(&mut self, title: &str) {
        self.title.clear();
        self.title.push_str(title);
        self.title.truncate(TITLE_CAP);
    }

    pub fn visible_on(&self, tagset: TagMask) -> bool {
        self.tags.intersects(tagset)
    }

    pub fn refresh_fixed_flag(&mut self) {
        self.flags.set(ClientFlags::FIXED, self.hints.is_fixed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_capped() {
        let mut c = Client::new(ClientId(0), 1, MonitorId(0), Rect::default(), 0);
        c.set_title(&"x".repeat(1000));
        assert_eq!(c.title.len(), TITLE_CAP);
    }

    #[test]
    fn fixed_flag_follows_hints() {
        let mut c = Client::new(ClientId(0), 1, MonitorId(0), Rect::default(), 0);
        c.hints = SizeHints {
            min_w: 10,
            min_h: 10,
            max_w: 10,
            max_h: 10,
            ..Default::default()
        };
        c.refresh_fixed_flag();
        assert!(c.is_fixed());
    }
}
