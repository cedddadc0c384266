//! Pure geometry and ICCCM size-hint arithmetic. No I/O, no X calls —
//! ported line-for-line from dwm's `applysizehints`.

/// An axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }
}

/// ICCCM `WM_NORMAL_HINTS` cache for one client. Zero fields mean
/// "unspecified" per ICCCM 4.1.2.3.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeHints {
    pub base_w: i32,
    pub base_h: i32,
    pub inc_w: i32,
    pub inc_h: i32,
    pub min_w: i32,
    pub min_h: i32,
    pub max_w: i32,
    pub max_h: i32,
    pub min_aspect: f32,
    pub max_aspect: f32,
}

impl SizeHints {
    /// A client whose min and max size agree exactly in both dimensions can
    /// never be resized by a layout and is forced floating on placement.
    pub fn is_fixed(&self) -> bool {
        self.max_w > 0
            && self.max_h > 0
            && self.min_w > 0
            && self.min_h > 0
            && self.max_w == self.min_w
            && self.max_h == self.min_h
    }
}

/// Clamp a proposed geometry against on-screen bounds and, if the client
/// calls for it, ICCCM size hints. Returns the clamped rect and whether it
/// differs from `current`.
///
/// `interact` is true for user-driven drags (clamped against the full
/// screen rect so a window being dragged can cross monitor boundaries);
/// otherwise the client's own monitor rect is used.
#[allow(clippy::too_many_arguments)]
pub fn apply_size_hints(
    hints: &SizeHints,
    border_w: i32,
    honor_hints: bool,
    mon_rect: Rect,
    screen_rect: Rect,
    interact: bool,
    current: Rect,
    mut proposed: Rect,
    bar_height: i32,
) -> (Rect, bool) {
    proposed.w = proposed.w.max(1);
    proposed.h = proposed.h.max(1);

    let bound = if interact { screen_rect } else { mon_rect };
    let width = proposed.w + 2 * border_w;
    let height = proposed.h + 2 * border_w;
    if proposed.x > bound.right() {
        proposed.x = bound.right() - width;
    }
    if proposed.y > bound.bottom() {
        proposed.y = bound.bottom() - height;
    }
    if proposed.x + width < bound.x {
        proposed.x = bound.x;
    }
    if proposed.y + height < bound.y {
        proposed.y = bound.y;
    }

    proposed.h = proposed.h.max(bar_height);
    proposed.w = proposed.w.max(bar_height);

    if honor_hints {
        let base_is_min = hints.base_w == hints.min_w && hints.base_h == hints.min_h;
        if !base_is_min {
            proposed.w -= hints.base_w;
            proposed.h -= hints.base_h;
        }
        if hints.min_aspect > 0.0 && hints.max_aspect > 0.0 {
            let w = proposed.w as f32;
            let h = proposed.h as f32;
            if hints.max_aspect < w / h {
                proposed.w = (h * hints.max_aspect + 0.5) as i32;
            } else if hints.min_aspect < h / w {
                proposed.h = (w * hints.min_aspect + 0.5) as i32;
            }
        }
        if base_is_min {
            proposed.w -= hints.base_w;
            proposed.h -= hints.base_h;
        }
        if hints.inc_w != 0 {
            proposed.w -= proposed.w % hints.inc_w;
        }
        if hints.inc_h != 0 {
            proposed.h -= proposed.h % hints.inc_h;
        }
        proposed.w += hints.base_w;
        proposed.h += hints.base_h;
        proposed.w = proposed.w.max(hints.min_w);
        proposed.h = proposed.h.max(hints.min_h);
        if hints.max_w > 0 {
            proposed.w = proposed.w.min(hints.max_w);
        }
        if hints.max_h > 0 {
            proposed.h = proposed.h.min(hints.max_h);
        }
    }

    let changed = proposed != current;
    (proposed, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon() -> Rect {
        Rect::new(0, 0, 1920, 1080)
    }

    #[test]
    fn floors_width_and_height_at_one() {
        let (r, _) = apply_size_hints(
            &SizeHints::default(),
            0,
            false,
            mon(),
            mon(),
            false,
            Rect::new(0, 0, 100, 100),
            Rect::new(10, 10, -5, 0),
            16,
        );
        assert!(r.w >= 1 && r.h >= 1);
    }

    #[test]
    fn respects_bar_height_floor() {
        let (r, _) = apply_size_hints(
            &SizeHints::default(),
            0,
            false,
            mon(),
            mon(),
            false,
            Rect::new(0, 0, 100, 100),
            Rect::new(10, 10, 2, 2),
            16,
        );
        assert_eq!(r.w, 16);
        assert_eq!(r.h, 16);
    }

    #[test]
    fn is_idempotent() {
        let hints = SizeHints {
            min_w: 50,
            min_h: 50,
            inc_w: 10,
            inc_h: 10,
            base_w: 0,
            base_h: 0,
            ..Default::default()
        };
        let start = Rect::new(10, 10, 123, 87);
        let (once, _) = apply_size_hints(&hints, 1, true, mon(), mon(), false, start, start, 16);
        let (twice, changed) =
            apply_size_hints(&hints, 1, true, mon(), mon(), false, once, once, 16);
        assert_eq!(once, twice);
        assert!(!changed);
    }

    #[test]
    fn increment_rounds_down_to_multiple() {
        let hints = SizeHints {
            inc_w: 10,
            inc_h: 10,
            ..Default::default()
        };
        let (r, _) = apply_size_hints(
            &hints,
            0,
            true,
            mon(),
            mon(),
            false,
            Rect::new(0, 0, 100, 100),
            Rect::new(0, 0, 107, 93),
            0,
        );
        assert_eq!(r.w % 10, 0);
        assert_eq!(r.h % 10, 0);
    }

    #[test]
    fn aspect_corridor_shortens_offending_dimension() {
        // 2:1 max aspect (w/h), proposed is far wider than that.
        let hints = SizeHints {
            min_aspect: 0.0,
            max_aspect: 2.0,
            ..Default::default()
        };
        let (r, _) = apply_size_hints(
            &hints,
            0,
            true,
            mon(),
            mon(),
            false,
            Rect::new(0, 0, 100, 100),
            Rect::new(0, 0, 400, 100),
            0,
        );
        // w/h should now respect the 2:1 corridor (w <= h * 2.0, with +0.5 rounding slack).
        assert!(r.w as f32 <= r.h as f32 * 2.0 + 1.0);
    }

    #[test]
    fn min_equals_max_marks_fixed() {
        let hints = SizeHints {
            min_w: 200,
            min_h: 100,
            max_w: 200,
            max_h: 100,
            ..Default::default()
        };
        assert!(hints.is_fixed());
    }

    #[test]
    fn zero_hints_are_not_fixed() {
        assert!(!SizeHints::default().is_fixed());
    }

    #[test]
    fn reports_unchanged_when_geometry_matches() {
        let r = Rect::new(5, 5, 200, 200);
        let (out, changed) =
            apply_size_hints(&SizeHints::default(), 0, false, mon(), mon(), false, r, r, 0);
        assert_eq!(out, r);
        assert!(!changed);
    }
}
