//! Focus and stacking policy: who holds input focus, what border color a
//! client draws, and in what order clients sit in the X stack.

use crate::client::{Client, ClientFlags, ClientId};
use crate::monitor::Monitor;
use crate::xconn::XConn;

/// Drives focus transitions and X stacking order. Holds no state of its
/// own; every decision is read out of the `Monitor`/`Client` it's given,
/// matching the reference implementation's habit of keeping `sel`/`stack`
/// on the monitor itself rather than in a separate focus manager.
pub struct FocusPolicy;

impl FocusPolicy {
    /// Sets the selected client on `mon` to `target` (or clears it),
    /// unfocusing whatever was selected before, reordering the focus
    /// stack, and issuing the X calls to move input and border color.
    /// Mirrors dwm.c's `focus()` (`examples/original_source/dwm.c:842`).
    pub fn focus(
        conn: &mut dyn XConn,
        mon: &mut Monitor,
        clients: &mut [Client],
        target: Option<ClientId>,
    ) {
        if let Some(prev) = mon.sel {
            if Some(prev) != target {
                Self::unfocus(conn, clients, prev, false);
            }
        }

        let target = target.and_then(|id| {
            let c = find(clients, id)?;
            if c.visible_on(mon.current_tagset()) {
                Some(id)
            } else {
                None
            }
        });

        if let Some(id) = target {
            mon.detach_stack(id);
            mon.attach_stack(id);
            Self::grab_focus(conn, clients, id);
        }
        mon.sel = target;
    }

    /// Sets border color and, unless the client declined input via
    /// `WM_HINTS.input == False`, moves X input focus there; clients that
    /// advertise `WM_TAKE_FOCUS` also get the ICCCM client message. Mirrors
    /// the tail of dwm.c's `focus()` and `setfocus()` (dwm.c:842, 1596).
    fn grab_focus(conn: &mut dyn XConn, clients: &mut [Client], id: ClientId) {
        if let Some(c) = find_mut(clients, id) {
            c.flags.remove(ClientFlags::URGENT);
            conn.set_border_color(c.window, true);
            if !c.flags.contains(ClientFlags::NEVER_FOCUS) {
                conn.set_input_focus(c.window);
            }
            if c.flags.contains(ClientFlags::TAKES_FOCUS) {
                conn.send_take_focus(c.window);
            }
        }
    }

    /// Clears input focus from `id` and resets its border color. `set_root`
    /// selects whether X input focus reverts to `PointerRoot` (used when no
    /// replacement client is being focused in the same step). Mirrors
    /// dwm.c's `unfocus()` (dwm.c:1928).
    pub fn unfocus(conn: &mut dyn XConn, clients: &mut [Client], id: ClientId, set_root: bool) {
        if let Some(c) = find_mut(clients, id) {
            conn.set_border_color(c.window, false);
        }
        if set_root {
            conn.set_input_focus(0);
        }
    }

    /// Picks the next (delta > 0) or previous (delta < 0) visible, tiled
    /// client after the current selection in `mon.order`, wrapping around;
    /// floating clients are skipped, matching dwm.c's `focusstack()`
    /// (dwm.c:885), which only walks `c->next` for non-floating entries
    /// when iterating forward and the reverse direction symmetrically.
    pub fn focus_stack(mon: &Monitor, clients: &[Client], delta: i32) -> Option<ClientId> {
        if mon.order.is_empty() {
            return None;
        }
        let visible: Vec<ClientId> = mon
            .order
            .iter()
            .copied()
            .filter(|&id| {
                find(clients, id)
                    .map(|c| c.visible_on(mon.current_tagset()))
                    .unwrap_or(false)
            })
            .collect();
        if visible.is_empty() {
            return None;
        }
        let cur_idx = mon
            .sel
            .and_then(|sel| visible.iter().position(|&id| id == sel));
        let next_idx = match cur_idx {
            Some(i) if delta > 0 => (i + 1) % visible.len(),
            Some(i) if delta < 0 => (i + visible.len() - 1) % visible.len(),
            _ => 0,
        };
        Some(visible[next_idx])
    }

    /// Restacks X windows to match the focus/order model: the selected
    /// floating client (if any) is raised above everything, then every
    /// tiled client is stacked immediately below it in `order`, per
    /// dwm.c's `restack()` (dwm.c:1408).
    pub fn restack(conn: &mut dyn XConn, mon: &Monitor, clients: &[Client]) {
        let sel = match mon.sel {
            Some(id) => id,
            None => return,
        };
        let sel_client = match find(clients, sel) {
            Some(c) => c,
            None => return,
        };
        if sel_client.is_floating() {
            conn.raise_window(sel_client.window);
        }
        if !mon.current_layout().arranges() {
            return;
        }
        let mut sibling = sel_client.window;
        for &id in &mon.order {
            if id == sel {
                continue;
            }
            if let Some(c) = find(clients, id) {
                if c.visible_on(mon.current_tagset()) && !c.is_floating() {
                    conn.restack_below(c.window, sibling);
                    sibling = c.window;
                }
            }
        }
    }
}

fn find(clients: &[Client], id: ClientId) -> Option<&Client> {
    clients.iter().find(|c| c.id == id)
}

fn find_mut(clients: &mut [Client], id: ClientId) -> Option<&mut Client> {
    clients.iter_mut().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::monitor::MonitorId;
    use crate::tags::TagMask;
    use crate::xconn::fake::FakeXConn;

    fn client(id: u32, tags: TagMask) -> Client {
        let mut c = Client::new(ClientId(id), id as u64 + 100, MonitorId(0), Rect::default(), 1);
        c.tags = tags;
        c
    }

    #[test]
    fn focus_stack_skips_invisible_clients() {
        let mut mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        mon.order = vec![ClientId(0), ClientId(1), ClientId(2)];
        mon.sel = Some(ClientId(0));
        let clients = vec![
            client(0, TagMask::nth(0)),
            client(1, TagMask::nth(1)),
            client(2, TagMask::nth(0)),
        ];
        let next = FocusPolicy::focus_stack(&mon, &clients, 1);
        assert_eq!(next, Some(ClientId(2)));
    }

    #[test]
    fn focus_stack_wraps_around() {
        let mut mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        mon.order = vec![ClientId(0), ClientId(1)];
        mon.sel = Some(ClientId(1));
        let clients = vec![client(0, TagMask::nth(0)), client(1, TagMask::nth(0))];
        assert_eq!(FocusPolicy::focus_stack(&mon, &clients, 1), Some(ClientId(0)));
    }

    #[test]
    fn focus_sets_border_and_input_focus() {
        let mut mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        mon.order = vec![ClientId(0)];
        let mut clients = vec![client(0, TagMask::nth(0))];
        let mut conn = FakeXConn::default();
        FocusPolicy::focus(&mut conn, &mut mon, &mut clients, Some(ClientId(0)));
        assert_eq!(mon.sel, Some(ClientId(0)));
        assert_eq!(conn.focused, Some(100));
    }

    #[test]
    fn focus_never_focus_client_does_not_take_input_focus() {
        let mut mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        mon.order = vec![ClientId(0)];
        let mut clients = vec![client(0, TagMask::nth(0))];
        clients[0].flags.insert(ClientFlags::NEVER_FOCUS);
        let mut conn = FakeXConn::default();
        FocusPolicy::focus(&mut conn, &mut mon, &mut clients, Some(ClientId(0)));
        assert_eq!(conn.focused, None);
    }

    #[test]
    fn focus_on_invisible_tag_clears_selection() {
        let mut mon = Monitor::new(MonitorId(0), 0, Rect::new(0, 0, 800, 600));
        mon.order = vec![ClientId(0)];
        let mut clients = vec![client(0, TagMask::nth(5))];
        let mut conn = FakeXConn::default();
        FocusPolicy::focus(&mut conn, &mut mon, &mut clients, Some(ClientId(0)));
        assert_eq!(mon.sel, None);
    }
}
