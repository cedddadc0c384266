//! Textual bar model: per-monitor tag/layout/title/status cells.
//!
//! Pixel-level font rendering is out of scope (`spec.md` §1); this module
//! stops at producing the ordered cell sequence dwm.c's `drawbar()`
//! (`examples/original_source/dwm.c:708`) walks, plus the `occupied`/
//! `urgent` bitmask precompute it does in the same pass over the client
//! list. A real renderer measures each cell with [`TextWidth`] and paints.

use crate::client::Client;
use crate::config;
use crate::monitor::Monitor;
use crate::tags::TagMask;

/// One cell of a bar's horizontal layout, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub enum BarCell {
    Tag {
        idx: usize,
        label: &'static str,
        /// Tag is in the monitor's currently viewed tagset.
        selected: bool,
        /// At least one client on this monitor carries this tag.
        occupied: bool,
        /// The monitor's selected client carries this tag (only meaningful
        /// on the currently-selected monitor).
        has_selected_client: bool,
        /// At least one client with this tag has the urgency hint set.
        urgent: bool,
    },
    LtSymbol(String),
    /// The selected client's title, filling the gap between the layout
    /// symbol and the status text.
    Title(String),
    /// Right-aligned, drawn only on the currently-selected monitor.
    Status(String),
}

/// The full ordered cell sequence for one monitor's bar, as a renderer
/// (outside this crate's scope) would lay them out left to right, with
/// `Status` right-aligned.
#[derive(Debug, Clone, Default)]
pub struct BarLayout {
    pub cells: Vec<BarCell>,
}

/// Out-of-scope collaborator: measures the pixel width a string would take
/// if drawn in the bar's font. A real implementation wraps Xft/fontconfig;
/// the core depends on the trait but never implements it (`spec.md` §1).
pub trait TextWidth {
    fn width(&self, text: &str) -> i32;
}

/// Builds the bar layout for `mon`. `is_selected_monitor` gates whether the
/// status text and the "has selected client" marker apply (`spec.md` §4.L:
/// "on the selected monitor only — the status text right-aligned").
pub fn layout_for(
    mon: &Monitor,
    clients: &[Client],
    is_selected_monitor: bool,
    status: &str,
) -> BarLayout {
    let (occupied, urgent) = occupied_and_urgent(mon, clients);
    let tagset = mon.current_tagset();
    let sel_tags = mon.sel.and_then(|id| clients.iter().find(|c| c.id == id)).map(|c| c.tags);

    let mut cells = Vec::with_capacity(config::TAGS.len() + 3);
    for (idx, &label) in config::TAGS.iter().enumerate() {
        let bit = TagMask::nth(idx);
        cells.push(BarCell::Tag {
            idx,
            label,
            selected: tagset.intersects(bit),
            occupied: occupied.intersects(bit),
            has_selected_client: is_selected_monitor
                && sel_tags.map(|t| t.intersects(bit)).unwrap_or(false),
            urgent: urgent.intersects(bit),
        });
    }
    cells.push(BarCell::LtSymbol(mon.layout_symbol.clone()));
    if let Some(sel) = mon.sel.and_then(|id| clients.iter().find(|c| c.id == id)) {
        cells.push(BarCell::Title(sel.title.clone()));
    }
    if is_selected_monitor {
        cells.push(BarCell::Status(status.to_string()));
    }
    BarLayout { cells }
}

/// One pass over `mon`'s client list precomputing which tags are occupied
/// and which carry an urgent client, matching dwm.c's `drawbar()` loop
/// (`occ |= c->tags; if (c->isurgent) urg |= c->tags;`).
fn occupied_and_urgent(mon: &Monitor, clients: &[Client]) -> (TagMask, TagMask) {
    let mut occupied = TagMask::empty();
    let mut urgent = TagMask::empty();
    for &id in &mon.order {
        if let Some(c) = clients.iter().find(|c| c.id == id) {
            occupied |= c.tags;
            if c.is_urgent() {
                urgent |= c.tags;
            }
        }
    }
    (occupied, urgent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Client, ClientFlags, ClientId};
    use crate::geometry::Rect;
    use crate::monitor::MonitorId;

    fn client(id: u32, tags: TagMask) -> Client {
        let mut c = Client::new(ClientId(id), id as u64 + 100, MonitorId(0), Rect::default(), 1);
        c.tags = tags;
        c
    }

    #[test]
    fn occupied_bitmask_covers_every_client_tag() {
        let mut mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        mon.order = vec![ClientId(0), ClientId(1)];
        let clients = vec![client(0, TagMask::nth(0)), client(1, TagMask::nth(3))];
        let (occ, urg) = occupied_and_urgent(&mon, &clients);
        assert!(occ.contains(TagMask::nth(0)));
        assert!(occ.contains(TagMask::nth(3)));
        assert!(urg.is_empty());
    }

    #[test]
    fn urgent_bitmask_only_set_for_urgent_clients() {
        let mut mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        mon.order = vec![ClientId(0)];
        let mut c = client(0, TagMask::nth(2));
        c.flags.insert(ClientFlags::URGENT);
        let (occ, urg) = occupied_and_urgent(&mon, &[c]);
        assert!(occ.contains(TagMask::nth(2)));
        assert!(urg.contains(TagMask::nth(2)));
    }

    #[test]
    fn layout_includes_status_only_on_selected_monitor() {
        let mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        let with_status = layout_for(&mon, &[], true, "dwm-0.1");
        let without_status = layout_for(&mon, &[], false, "dwm-0.1");
        assert!(with_status.cells.iter().any(|c| matches!(c, BarCell::Status(_))));
        assert!(!without_status.cells.iter().any(|c| matches!(c, BarCell::Status(_))));
    }

    #[test]
    fn layout_has_one_tag_cell_per_configured_tag() {
        let mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        let layout = layout_for(&mon, &[], true, "");
        let tag_cells = layout
            .cells
            .iter()
            .filter(|c| matches!(c, BarCell::Tag { .. }))
            .count();
        assert_eq!(tag_cells, config::TAGS.len());
    }
}
