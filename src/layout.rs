//! Named layout strategies: `tile`, `monocle`, and floating (no-op).

use crate::client::ClientId;
use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Tile,
    Monocle,
    Floating,
}

impl LayoutKind {
    /// Whether this layout positions clients at all. `Floating` has no
    /// arrange function in the reference implementation; clients keep
    /// whatever geometry they already have.
    pub fn arranges(&self) -> bool {
        !matches!(self, LayoutKind::Floating)
    }

    /// The layout-symbol string shown on the bar, given the count of
    /// currently visible tiled clients (only `monocle` varies with it).
    pub fn symbol(&self, visible_count: usize) -> String {
        match self {
            LayoutKind::Tile => "[]=".to_string(),
            LayoutKind::Floating => "><>".to_string(),
            LayoutKind::Monocle => format!("[{}]", visible_count),
        }
    }

    /// Computes geometry for every visible, non-floating client in `order`,
    /// given the work area and current master fraction. Returns `(id, rect)`
    /// pairs in the same order layouts traverse clients in the reference
    /// implementation (master first, then stack top-to-bottom).
    ///
    /// `border_w` is subtracted twice per axis before calling resize, as
    /// dwm's `tile`/`monocle` do (`WIDTH`/`HEIGHT` macros add border back
    /// for window-extent math, but the X geometry passed to `resize` is the
    /// content size).
    pub fn arrange(
        &self,
        work: Rect,
        mfact: f32,
        border_w: i32,
        bar_height: i32,
        visible: &[ClientId],
    ) -> Vec<(ClientId, Rect)> {
        match self {
            LayoutKind::Floating => Vec::new(),
            LayoutKind::Monocle => visible
                .iter()
                .map(|&id| {
                    (
                        id,
                        Rect::new(
                            work.x,
                            work.y,
                            work.w - 2 * border_w,
                            work.h - 2 * border_w,
                        ),
                    )
                })
                .collect(),
            LayoutKind::Tile => tile(work, mfact, border_w, bar_height, visible),
        }
    }
}

fn tile(work: Rect, mfact: f32, border_w: i32, bar_height: i32, visible: &[ClientId]) -> Vec<(ClientId, Rect)> {
    let n = visible.len();
    if n == 0 {
        return Vec::new();
    }

    let mw = (mfact * work.w as f32).round() as i32;
    let master_w = if n > 1 { mw } else { work.w };
    let master = Rect::new(
        work.x,
        work.y,
        master_w - 2 * border_w,
        work.h - 2 * border_w,
    );

    let mut out = vec![(visible[0], master)];
    let stack = &visible[1..];
    if stack.is_empty() {
        return out;
    }

    // If size hints grew the master past `mw`, the stack column starts
    // where the master's actual right edge landed instead.
    let master_right = work.x + master.w + 2 * border_w;
    let stack_x = if work.x + mw > master_right {
        master_right
    } else {
        work.x + mw
    };
    let stack_w = if work.x + mw > master_right {
        work.x + work.w - stack_x
    } else {
        work.w - mw
    };

    let mut h = work.h / stack.len() as i32;
    let degenerate = h < bar_height;
    if degenerate {
        h = work.h;
    }

    let mut y = work.y;
    for (i, &id) in stack.iter().enumerate() {
        let last = i + 1 == stack.len();
        let this_h = if last {
            work.y + work.h - y
        } else {
            h
        };
        let rect = Rect::new(stack_x, y, stack_w - 2 * border_w, this_h - 2 * border_w);
        out.push((id, rect));
        if !degenerate {
            y += this_h;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work() -> Rect {
        Rect::new(0, 0, 1920, 1080)
    }

    #[test]
    fn empty_visible_list_produces_nothing() {
        assert!(LayoutKind::Tile.arrange(work(), 0.55, 1, 18, &[]).is_empty());
    }

    #[test]
    fn single_client_fills_full_work_area() {
        let ids = vec![ClientId(0)];
        let out = LayoutKind::Tile.arrange(work(), 0.55, 0, 18, &ids);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].1, work());
    }

    #[test]
    fn tile_partitions_the_work_area_exactly() {
        let ids = vec![ClientId(0), ClientId(1), ClientId(2), ClientId(3)];
        let out = LayoutKind::Tile.arrange(work(), 0.55, 0, 18, &ids);
        assert_eq!(out.len(), 4);
        let sum: i64 = out.iter().map(|(_, r)| r.area()).sum();
        assert_eq!(sum, work().area());
    }

    #[test]
    fn last_stack_client_absorbs_the_remainder() {
        let ids = vec![ClientId(0), ClientId(1), ClientId(2)];
        let out = LayoutKind::Tile.arrange(Rect::new(0, 0, 900, 100), 0.5, 0, 18, &ids);
        let last = out.last().unwrap();
        assert_eq!(last.1.y + last.1.h, 100);
    }

    #[test]
    fn monocle_fills_work_area_for_every_client() {
        let ids = vec![ClientId(0), ClientId(1)];
        let out = LayoutKind::Monocle.arrange(work(), 0.55, 2, 18, &ids);
        for (_, r) in &out {
            assert_eq!(r.w, work().w - 4);
            assert_eq!(r.h, work().h - 4);
        }
    }

    #[test]
    fn monocle_symbol_shows_count() {
        assert_eq!(LayoutKind::Monocle.symbol(3), "[3]");
    }

    #[test]
    fn floating_never_arranges() {
        assert!(!LayoutKind::Floating.arranges());
        assert!(LayoutKind::Floating
            .arrange(work(), 0.55, 1, 18, &[ClientId(0)])
            .is_empty());
    }
}
