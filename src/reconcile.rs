//! Multi-head reconciler: diffs an external screen-info list against the
//! monitor list and adds/removes/reassigns monitors to match.
//!
//! Invoked by the root `ConfigureNotify` handler and once at setup, mirrors
//! dwm.c's `updategeom()` (`examples/original_source/dwm.c:1813`). The
//! screen-info query itself (Xinerama/RandR) lives behind [`crate::xconn::XConn`]
//! and is opaque here; when no extension is available, the caller already
//! folds the root geometry into a single-element `screens` slice
//! (`spec.md` §4.K "If Xinerama is unavailable, treat the screen as a
//! single monitor").

use crate::geometry::Rect;
use crate::wm::WindowManager;
use crate::xconn::XConn;

/// Reconciles `wm`'s monitor list against `screens`, a list of output
/// rectangles as currently reported by the display server. Returns whether
/// anything changed.
pub fn reconcile(wm: &mut WindowManager, conn: &mut dyn XConn, screens: &[Rect]) -> bool {
    let unique = canonicalize(screens);
    if unique.is_empty() {
        return false;
    }

    let mut changed = false;
    let n = unique.len();
    let cur = wm.monitors.len();

    for screen in unique.iter().skip(cur) {
        wm.add_monitor(*screen);
        changed = true;
    }

    for (i, screen) in unique.iter().take(cur.min(n)).enumerate() {
        let mon = &mut wm.monitors[i];
        if mon.screen != *screen {
            mon.num = i as i32;
            mon.screen = *screen;
            mon.work = *screen;
            mon.update_bar_pos();
            changed = true;
        }
    }

    if n < cur {
        for _ in n..cur {
            let removed = wm.monitors.pop().expect("cur > n implies a monitor to pop");
            rehome_clients(wm, removed.id, removed.order, removed.stack);
            changed = true;
        }
    }

    if changed {
        let (px, py) = conn.root_pointer();
        wm.sel_mon = monitor_at(wm, px, py);
    }
    changed
}

/// Deduplicates by exact `(x, y, w, h)` equality, preserving first-seen
/// order (`spec.md` §4.K step 1).
fn canonicalize(screens: &[Rect]) -> Vec<Rect> {
    let mut out: Vec<Rect> = Vec::new();
    for &s in screens {
        if !out.contains(&s) {
            out.push(s);
        }
    }
    out
}

/// Moves every client that was on a removed monitor onto the head monitor,
/// re-homing both intrusive-list-replacement orderings and the client's
/// own `mon` back-reference. Mirrors dwm.c's `updategeom()` tail loop that
/// reattaches clients from a disappearing monitor onto `mons` (the head).
fn rehome_clients(
    wm: &mut WindowManager,
    _removed: crate::monitor::MonitorId,
    order: Vec<crate::client::ClientId>,
    stack: Vec<crate::client::ClientId>,
) {
    let Some(head) = wm.monitors.first().map(|m| m.id) else {
        return;
    };
    for id in &order {
        if let Some(c) = wm.client_mut(*id) {
            c.mon = head;
            c.tags = wm.monitor(head).map(|m| m.current_tagset()).unwrap_or(c.tags);
        }
    }
    if let Some(mon) = wm.monitor_mut(head) {
        for &id in order.iter().rev() {
            mon.attach(id);
        }
        for &id in stack.iter().rev() {
            mon.attach_stack(id);
        }
        if mon.sel.is_none() {
            mon.sel = stack.first().copied();
        }
    }
}

fn monitor_at(wm: &WindowManager, x: i32, y: i32) -> crate::monitor::MonitorId {
    wm.monitors
        .iter()
        .find(|m| x >= m.screen.x && x < m.screen.right() && y >= m.screen.y && y < m.screen.bottom())
        .map(|m| m.id)
        .unwrap_or(wm.sel_mon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{Atoms, Cursors};
    use crate::xconn::fake::FakeXConn;

    fn wm_with(screens: &[Rect]) -> WindowManager {
        let atoms = Atoms {
            wm_protocols: 1,
            wm_delete_window: 2,
            wm_take_focus: 3,
            wm_state: 4,
            net_supported: 5,
            net_wm_name: 6,
            net_wm_state: 7,
            net_wm_state_fullscreen: 8,
            net_wm_window_type: 9,
            net_wm_window_type_dialog: 10,
            net_active_window: 11,
            utf8_string: 12,
        };
        let cursors = Cursors { normal: 0, resize: 0, mv: 0 };
        WindowManager::new(1, atoms, cursors, screens)
    }

    #[test]
    fn adds_a_monitor_when_more_screens_appear() {
        let mut wm = wm_with(&[Rect::new(0, 0, 1920, 1080)]);
        let mut conn = FakeXConn::default();
        let changed = reconcile(
            &mut wm,
            &mut conn,
            &[Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1920, 1080)],
        );
        assert!(changed);
        assert_eq!(wm.monitors.len(), 2);
    }

    #[test]
    fn duplicate_geometries_are_collapsed() {
        let unique = canonicalize(&[
            Rect::new(0, 0, 1920, 1080),
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1920, 1080),
        ]);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn removing_a_monitor_rehomes_its_clients_onto_the_head() {
        let mut wm = wm_with(&[Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1920, 1080)]);
        let mut conn = FakeXConn::default();
        conn.windows.insert(100, Rect::new(0, 0, 200, 200));
        let second = wm.monitors[1].id;
        wm.sel_mon = second;
        wm.manage(&mut conn, 100);
        assert_eq!(wm.monitors[1].order.len(), 1);

        let changed = reconcile(&mut wm, &mut conn, &[Rect::new(0, 0, 1920, 1080)]);
        assert!(changed);
        assert_eq!(wm.monitors.len(), 1);
        let id = wm.client_for_window(100).unwrap();
        assert_eq!(wm.client(id).unwrap().mon, wm.monitors[0].id);
        assert!(wm.monitors[0].order.contains(&id));
    }

    #[test]
    fn unchanged_geometry_reports_no_change() {
        let mut wm = wm_with(&[Rect::new(0, 0, 1920, 1080)]);
        let mut conn = FakeXConn::default();
        let changed = reconcile(&mut wm, &mut conn, &[Rect::new(0, 0, 1920, 1080)]);
        assert!(!changed);
    }
}
