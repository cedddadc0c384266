//! One output: screen rect, work area, bar geometry, tag/layout slots and
//! the two client orderings.

use crate::client::ClientId;
use crate::config;
use crate::geometry::Rect;
use crate::layout::LayoutKind;
use crate::tags::TagMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonitorId(pub u32);

/// Height of the status bar. An empirical minimum clients are also floored
/// to in `apply_size_hints`, matching dwm's `bh`.
pub const BAR_HEIGHT: i32 = 18;

#[derive(Debug, Clone)]
pub struct Monitor {
    pub id: MonitorId,
    pub num: i32,
    /// Full output rectangle.
    pub screen: Rect,
    /// Screen rect minus the bar.
    pub work: Rect,
    pub bar_y: i32,
    pub bar_window: Option<u64>,
    pub showbar: bool,
    pub topbar: bool,

    pub tagset: [TagMask; 2],
    pub sel_tagset: usize,

    pub layouts: [LayoutKind; 2],
    pub sel_layout: usize,
    pub layout_symbol: String,

    pub mfact: f32,

    /// Insertion order, traversed by layouts. Replaces the intrusive
    /// `next` link in the reference implementation.
    pub order: Vec<ClientId>,
    /// Most-recently-focused first. Replaces the intrusive `snext` link.
    pub stack: Vec<ClientId>,
    pub sel: Option<ClientId>,
}

impl Monitor {
    pub fn new(id: MonitorId, num: i32, screen: Rect) -> Self {
        let mut m = Monitor {
            id,
            num,
            screen,
            work: screen,
            bar_y: 0,
            bar_window: None,
            showbar: config::SHOWBAR,
            topbar: config::TOPBAR,
            tagset: [TagMask::nth(0), TagMask::nth(0)],
            sel_tagset: 0,
            layouts: [config::LAYOUTS[0], config::LAYOUTS[1 % config::LAYOUTS.len()]],
            sel_layout: 0,
            layout_symbol: config::LAYOUTS[0].symbol(0),
            mfact: config::MFACT,
            order: Vec::new(),
            stack: Vec::new(),
            sel: None,
        };
        m.update_bar_pos();
        m
    }

    pub fn current_tagset(&self) -> TagMask {
        self.tagset[self.sel_tagset]
    }

    pub fn current_layout(&self) -> LayoutKind {
        self.layouts[self.sel_layout]
    }

    /// Recomputes `work`/`bar_y` from `screen`/`showbar`/`topbar`. Invariant
    /// 6 (`spec.md` §3): hidden bar means negative `bar_y`; shown bar sits
    /// flush against the edge `topbar` selects and the work area shrinks by
    /// the bar height.
    pub fn update_bar_pos(&mut self) {
        self.work.x = self.screen.x;
        self.work.y = self.screen.y;
        self.work.w = self.screen.w;
        self.work.h = self.screen.h;
        if self.showbar {
            self.work.h -= BAR_HEIGHT;
            if self.topbar {
                self.bar_y = self.work.y;
                self.work.y += BAR_HEIGHT;
            } else {
                self.bar_y = self.work.y + self.work.h;
            }
        } else {
            self.bar_y = -BAR_HEIGHT;
        }
    }

    pub fn attach(&mut self, id: ClientId) {
        self.order.insert(0, id);
    }

    pub fn attach_stack(&mut self, id: ClientId) {
        self.stack.insert(0, id);
    }

    pub fn detach(&mut self, id: ClientId) {
        self.order.retain(|&c| c != id);
    }

    pub fn detach_stack(&mut self, id: ClientId) {
        self.stack.retain(|&c| c != id);
    }

    /// Moves `id` to the master (head) position of insertion order, as
    /// `zoom` does.
    pub fn promote_to_master(&mut self, id: ClientId) {
        self.detach(id);
        self.attach(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hiding_bar_makes_bar_y_negative() {
        let mut m = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080));
        m.showbar = false;
        m.update_bar_pos();
        assert!(m.bar_y < 0);
    }

    #[test]
    fn showing_bar_reduces_work_area() {
        let mut m = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080));
        assert_eq!(m.work.h, 1080 - BAR_HEIGHT);
        assert_eq!(m.bar_y, 0);
        assert_eq!(m.work.y, BAR_HEIGHT);
    }

    #[test]
    fn bottombar_sits_at_bottom_edge() {
        let mut m = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 1920, 1080));
        m.topbar = false;
        m.update_bar_pos();
        assert_eq!(m.work.y, 0);
        assert_eq!(m.bar_y, 1080 - BAR_HEIGHT);
    }

    #[test]
    fn attach_inserts_at_head() {
        let mut m = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 100, 100));
        m.attach(ClientId(1));
        m.attach(ClientId(2));
        assert_eq!(m.order, vec![ClientId(2), ClientId(1)]);
    }
}
