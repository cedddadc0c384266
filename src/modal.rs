//! Interactive move/resize: a pointer-grabbed inner loop entered from a
//! mouse-bind, with edge-snapping and a tiled-to-floating escape hatch.
//! Mirrors dwm.c's `movemouse()`/`resizemouse()`
//! (`examples/original_source/dwm.c:1224`, `:1355`).

use crate::client::{ClientFlags, ClientId};
use crate::config::SNAP;
use crate::event::EventDispatcher;
use crate::geometry::{apply_size_hints, Rect};
use crate::wm::WindowManager;
use crate::xconn::{XConn, XEvent};

/// Enters the move loop for `id`: on every `MotionNotify`, proposes a new
/// top-left at the original position plus the pointer's net delta, snaps it
/// to the monitor's work-area edges, and — if the client is tiled and the
/// drag has moved it more than [`SNAP`] pixels — flips it to floating before
/// applying the move. Exits on `ButtonRelease`; the grab is always released.
pub fn move_mouse(wm: &mut WindowManager, conn: &mut dyn XConn, id: ClientId) {
    let Some(mon_id) = wm.client(id).map(|c| c.mon) else {
        return;
    };
    if let Some(mon) = wm.monitor(mon_id) {
        crate::focus::FocusPolicy::restack(conn, mon, &wm.clients);
    }
    let Some((ocx, ocy)) = wm.client(id).map(|c| (c.geom.x, c.geom.y)) else {
        return;
    };
    if !conn.grab_pointer(false) {
        return;
    }
    let (ox, oy) = conn.root_pointer();

    loop {
        match conn.next_event() {
            ev @ (XEvent::ConfigureRequest { .. } | XEvent::Expose { .. } | XEvent::MapRequest { .. }) => {
                EventDispatcher::dispatch(wm, conn, ev);
            }
            XEvent::MotionNotify { root_x, root_y } => {
                let Some(work) = wm.monitor(mon_id).map(|m| m.work) else {
                    break;
                };
                let Some(c) = wm.client(id) else { break };
                let (w, h) = (c.geom.w, c.geom.h);
                let mut nx = ocx + (root_x - ox);
                let mut ny = ocy + (root_y - oy);

                if nx >= work.x
                    && nx <= work.right()
                    && ny >= work.y
                    && ny <= work.bottom()
                {
                    if (work.x - nx).abs() < SNAP {
                        nx = work.x;
                    } else if (work.right() - (nx + w)).abs() < SNAP {
                        nx = work.right() - w;
                    }
                    if (work.y - ny).abs() < SNAP {
                        ny = work.y;
                    } else if (work.bottom() - (ny + h)).abs() < SNAP {
                        ny = work.bottom() - h;
                    }
                    let arranges = wm.monitor(mon_id).map(|m| m.current_layout().arranges()).unwrap_or(false);
                    let is_floating = wm.client(id).map(|c| c.is_floating()).unwrap_or(false);
                    if !is_floating
                        && arranges
                        && ((nx - c.geom.x).abs() > SNAP || (ny - c.geom.y).abs() > SNAP)
                    {
                        if let Some(c) = wm.client_mut(id) {
                            c.flags.insert(ClientFlags::FLOATING);
                        }
                    }
                }

                let floating_or_unmanaged =
                    wm.client(id).map(|c| c.is_floating()).unwrap_or(false)
                        || !wm.monitor(mon_id).map(|m| m.current_layout().arranges()).unwrap_or(true);
                if floating_or_unmanaged {
                    resize_interactive(wm, conn, id, Rect::new(nx, ny, w, h));
                }
            }
            XEvent::ButtonRelease => break,
            _ => {}
        }
    }

    conn.ungrab_pointer();
    conn.flush();
    reassign_if_crossed_monitor(wm, conn, id);
}

/// Enters the resize loop for `id`: warps the pointer to the client's
/// bottom-right corner first (for a stable drag handle), then on every
/// `MotionNotify` proposes a new width/height from the pointer's offset from
/// the client's origin, with the same snap-to-floating escape hatch.
pub fn resize_mouse(wm: &mut WindowManager, conn: &mut dyn XConn, id: ClientId) {
    let Some(mon_id) = wm.client(id).map(|c| c.mon) else {
        return;
    };
    if let Some(mon) = wm.monitor(mon_id) {
        crate::focus::FocusPolicy::restack(conn, mon, &wm.clients);
    }
    let Some(c) = wm.client(id).cloned() else { return };
    if !conn.grab_pointer(true) {
        return;
    }
    let corner = |c: &crate::client::Client| {
        (c.geom.w + c.border_w - 1, c.geom.h + c.border_w - 1)
    };
    let (cx, cy) = corner(&c);
    conn.warp_pointer(c.window, cx, cy);

    loop {
        match conn.next_event() {
            ev @ (XEvent::ConfigureRequest { .. } | XEvent::Expose { .. } | XEvent::MapRequest { .. }) => {
                EventDispatcher::dispatch(wm, conn, ev);
            }
            XEvent::MotionNotify { root_x, root_y } => {
                let Some(cur) = wm.client(id).cloned() else { break };
                let nw = (root_x - cur.geom.x - 2 * cur.border_w + 1).max(1);
                let nh = (root_y - cur.geom.y - 2 * cur.border_w + 1).max(1);

                let Some(work) = wm.monitor(mon_id).map(|m| m.work) else {
                    break;
                };
                if nw >= work.x && nw <= work.right() && nh >= work.y && nh <= work.bottom() {
                    let arranges = wm.monitor(mon_id).map(|m| m.current_layout().arranges()).unwrap_or(false);
                    if !cur.is_floating()
                        && arranges
                        && ((nw - cur.geom.w).abs() > SNAP || (nh - cur.geom.h).abs() > SNAP)
                    {
                        if let Some(c) = wm.client_mut(id) {
                            c.flags.insert(ClientFlags::FLOATING);
                        }
                    }
                }

                let floating_or_unmanaged = wm.client(id).map(|c| c.is_floating()).unwrap_or(false)
                    || !wm.monitor(mon_id).map(|m| m.current_layout().arranges()).unwrap_or(true);
                if floating_or_unmanaged {
                    resize_interactive(wm, conn, id, Rect::new(cur.geom.x, cur.geom.y, nw, nh));
                }
            }
            XEvent::ButtonRelease => break,
            _ => {}
        }
    }

    if let Some(c) = wm.client(id) {
        let (cx, cy) = corner(c);
        conn.warp_pointer(c.window, cx, cy);
    }
    conn.ungrab_pointer();
    conn.flush();
    reassign_if_crossed_monitor(wm, conn, id);
}

/// Runs `proposed` through the size-hint engine with `interact = true` and,
/// if it differs from the client's stored geometry, writes it back to both
/// the model and the server.
fn resize_interactive(wm: &mut WindowManager, conn: &mut dyn XConn, id: ClientId, proposed: Rect) {
    use crate::config::{BORDERPX, RESIZEHINTS};

    let Some(c) = wm.client(id).cloned() else { return };
    let Some(mon) = wm.monitor(c.mon) else { return };
    let honor_hints = c.is_floating() || RESIZEHINTS;
    let screens = conn.screen_rects();
    let screen_rect = screens.first().copied().unwrap_or(mon.screen);

    let (rect, changed) = apply_size_hints(
        &c.hints,
        c.border_w,
        honor_hints,
        mon.screen,
        screen_rect,
        true,
        c.geom,
        proposed,
        crate::monitor::BAR_HEIGHT,
    );
    if !changed {
        return;
    }
    if let Some(c) = wm.client_mut(id) {
        c.geom = rect;
    }
    conn.move_resize(c.window, rect);
    let _ = BORDERPX;
}

/// If the client's center has drifted onto a different monitor than the one
/// it started the drag on, reassigns it there and refocuses. Mirrors
/// dwm.c's `ptrtomon`-guarded tail of `movemouse`/`resizemouse`.
fn reassign_if_crossed_monitor(wm: &mut WindowManager, conn: &mut dyn XConn, id: ClientId) {
    let Some(c) = wm.client(id) else { return };
    let cx = c.geom.x + c.geom.w / 2;
    let cy = c.geom.y + c.geom.h / 2;
    let target = wm
        .monitors
        .iter()
        .find(|m| cx >= m.work.x && cx < m.work.right() && cy >= m.work.y && cy < m.work.bottom())
        .map(|m| m.id);
    if let Some(target) = target {
        if target != wm.sel_mon {
            wm.move_client_to_monitor(conn, id, target);
            wm.sel_mon = target;
            wm.focus(conn, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{Atoms, Cursors};
    use crate::geometry::Rect as R;
    use crate::xconn::fake::FakeXConn;

    fn wm_with_one_client() -> (WindowManager, ClientId) {
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
        let mut wm = WindowManager::new(1, atoms, cursors, &[R::new(0, 0, 1920, 1080)]);
        let mut conn = FakeXConn::default();
        conn.windows.insert(100, R::new(0, 0, 200, 200));
        wm.manage(&mut conn, 100);
        let id = wm.client_for_window(100).unwrap();
        (wm, id)
    }

    #[test]
    fn zero_net_motion_leaves_geometry_unchanged() {
        let (mut wm, id) = wm_with_one_client();
        if let Some(c) = wm.client_mut(id) {
            c.flags.insert(ClientFlags::FLOATING);
        }
        let before = wm.client(id).unwrap().geom;
        let mut conn = FakeXConn::default();
        conn.events.push_back(XEvent::MotionNotify { root_x: 0, root_y: 0 });
        conn.events.push_back(XEvent::ButtonRelease);
        move_mouse(&mut wm, &mut conn, id);
        assert_eq!(wm.client(id).unwrap().geom, before);
    }

    #[test]
    fn grab_failure_aborts_without_moving() {
        let (mut wm, id) = wm_with_one_client();
        let before = wm.client(id).unwrap().geom;
        struct NoGrab(FakeXConn);
        impl XConn for NoGrab {
            fn next_event(&mut self) -> XEvent { self.0.next_event() }
            fn flush(&mut self) { self.0.flush() }
            fn get_window_rect(&self, w: u64) -> Rect { self.0.get_window_rect(w) }
            fn get_window_class(&self, w: u64) -> (Option<String>, Option<String>) { self.0.get_window_class(w) }
            fn get_transient_for(&self, w: u64) -> Option<u64> { self.0.get_transient_for(w) }
            fn get_title(&self, w: u64) -> Option<String> { self.0.get_title(w) }
            fn is_override_redirect(&self, w: u64) -> bool { self.0.is_override_redirect(w) }
            fn get_size_hints(&self, w: u64) -> crate::geometry::SizeHints { self.0.get_size_hints(w) }
            fn get_wm_hints(&self, w: u64) -> (bool, bool) { self.0.get_wm_hints(w) }
            fn window_protocols(&self, w: u64) -> (bool, bool) { self.0.window_protocols(w) }
            fn configure_window(&mut self, w: u64, g: Rect, b: i32) { self.0.configure_window(w, g, b) }
            fn move_resize(&mut self, w: u64, g: Rect) { self.0.move_resize(w, g) }
            fn set_border_width(&mut self, w: u64, b: i32) { self.0.set_border_width(w, b) }
            fn set_border_color(&mut self, w: u64, f: bool) { self.0.set_border_color(w, f) }
            fn raise_window(&mut self, w: u64) { self.0.raise_window(w) }
            fn restack_below(&mut self, w: u64, s: u64) { self.0.restack_below(w, s) }
            fn map_window(&mut self, w: u64) { self.0.map_window(w) }
            fn unmap_window(&mut self, w: u64) { self.0.unmap_window(w) }
            fn set_input_focus(&mut self, w: u64) { self.0.set_input_focus(w) }
            fn send_take_focus(&mut self, w: u64) { self.0.send_take_focus(w) }
            fn send_delete(&mut self, w: u64) { self.0.send_delete(w) }
            fn kill_client(&mut self, w: u64) { self.0.kill_client(w) }
            fn set_wm_state(&mut self, w: u64, s: i64) { self.0.set_wm_state(w, s) }
            fn grab_pointer(&mut self, _resize: bool) -> bool { false }
            fn ungrab_pointer(&mut self) { self.0.ungrab_pointer() }
            fn warp_pointer(&mut self, w: u64, x: i32, y: i32) { self.0.warp_pointer(w, x, y) }
            fn root_pointer(&self) -> (i32, i32) { self.0.root_pointer() }
            fn screen_rects(&self) -> Vec<Rect> { self.0.screen_rects() }
        }
        let mut conn = NoGrab(FakeXConn::default());
        move_mouse(&mut wm, &mut conn, id);
        assert_eq!(wm.client(id).unwrap().geom, before);
    }
}
