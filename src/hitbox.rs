//! Rotated rectangular hit region centred on a vertex.

use crate::geometry::{point_in_rotated_rect, Point, Rect};

#[derive(Clone, Debug)]
pub struct Hitbox {
    angle: f64,  // string orientation, fixed
    length: f64, // span along the string (vertex separation), fixed
    width: f64,  // span across the string
    coords: Rect,
    hitting: bool,
}

impl Hitbox {
    pub fn new(center: Point, angle: f64, length: f64, width: f64) -> Self {
        Self {
            angle,
            length,
            width,
            coords: Rect::from_center(center, angle, length, width),
            hitting: false,
        }
    }

    pub fn set_coords_by_center(&mut self, center: Point) {
        self.coords = Rect::from_center(center, self.angle, self.length, self.width);
    }

    pub fn coords(&self) -> &Rect {
        &self.coords
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn hitting(&self) -> bool {
        self.hitting
    }

    /// Drops the latch without a hit test; `true` if it was set.
    pub fn release(&mut self) -> bool {
        std::mem::take(&mut self.hitting)
    }

    /// Calls `on_inside` on every test that lands inside, and `on_leave` once
    /// when a previously hitting test lands outside. Returns the latched state.
    pub fn hit_test<I, L>(&mut self, position: Point, on_inside: I, on_leave: L) -> bool
    where
        I: FnOnce(),
        L: FnOnce(),
    {
        if point_in_rotated_rect(position, &self.coords) {
            on_inside();
            self.hitting = true;
        } else if self.hitting {
            self.hitting = false;
            on_leave();
        }
        self.hitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn horizontal() -> Hitbox {
        // 40 wide along x, 20 tall, centred on (100, 100)
        Hitbox::new(Point::new(100.0, 100.0), 0.0, 40.0, 20.0)
    }

    #[test]
    fn inside_fires_every_frame_and_leave_once() {
        let mut hb = horizontal();
        let inside = Cell::new(0);
        let leave = Cell::new(0);
        let test = |hb: &mut Hitbox, p: Point| {
            hb.hit_test(p, || inside.set(inside.get() + 1), || leave.set(leave.get() + 1))
        };

        assert!(!test(&mut hb, Point::new(0.0, 0.0)));
        assert_eq!((inside.get(), leave.get()), (0, 0));

        for x in [95.0, 100.0, 105.0] {
            assert!(test(&mut hb, Point::new(x, 102.0)));
        }
        assert_eq!(inside.get(), 3);
        assert_eq!(leave.get(), 0);

        assert!(!test(&mut hb, Point::new(150.0, 100.0)));
        assert!(!test(&mut hb, Point::new(160.0, 100.0)));
        assert_eq!(leave.get(), 1);
        assert_eq!(inside.get(), 3);
    }

    #[test]
    fn release_clears_latch_without_leave() {
        let mut hb = horizontal();
        assert!(!hb.release());
        hb.hit_test(Point::new(100.0, 100.0), || {}, || {});
        assert!(hb.release());
        assert!(!hb.hitting());
        let leave = Cell::new(false);
        hb.hit_test(Point::new(0.0, 0.0), || {}, || leave.set(true));
        assert!(!leave.get());
    }

    #[test]
    fn hitting_transitions_once_per_crossing() {
        let mut hb = horizontal();
        let mut transitions = Vec::new();
        let path = [
            Point::new(50.0, 100.0),
            Point::new(90.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(110.0, 100.0),
            Point::new(130.0, 100.0),
            Point::new(140.0, 100.0),
            Point::new(100.0, 95.0),
        ];
        let mut was = hb.hitting();
        for p in path {
            let now = hb.hit_test(p, || {}, || {});
            if now != was {
                transitions.push(now);
            }
            was = now;
        }
        assert_eq!(transitions, vec![true, false, true]);
    }

    #[test]
    fn recentring_moves_the_region() {
        let mut hb = horizontal();
        let probe = Point::new(200.0, 100.0);
        assert!(!hb.hit_test(probe, || {}, || {}));
        hb.set_coords_by_center(Point::new(195.0, 100.0));
        assert!(hb.hit_test(probe, || {}, || {}));
        assert!((hb.length() - 40.0).abs() < 1e-12);
        assert!((hb.width() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn rotated_box_follows_angle() {
        // Vertical string: the long side runs along y.
        let hb_angle = std::f64::consts::FRAC_PI_2;
        let mut hb = Hitbox::new(Point::new(0.0, 0.0), hb_angle, 60.0, 10.0);
        assert!(hb.hit_test(Point::new(0.0, -25.0), || {}, || {}));
        assert!(!hb.hit_test(Point::new(25.0, 0.0), || {}, || {}));
        assert!((hb.angle() - hb_angle).abs() < 1e-12);
    }
}
