//! Plane geometry helpers for canvas space.
//!
//! Canvas y grows downward while angles follow the mathematical convention
//! (counter-clockwise from +x), so every conversion between the two flips y.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// A 2D coordinate in canvas pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Rotated rectangle. Corners wind a -> b -> c -> d so that the interior lies
/// on the positive side of every edge's implicit line equation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub a: Point,
    pub b: Point,
    pub c: Point,
    pub d: Point,
}

impl Rect {
    /// Rectangle of `length` along `angle` and `width` across it, centred on `center`.
    pub fn from_center(center: Point, angle: f64, length: f64, width: f64) -> Self {
        let half_len = length / 2.0;
        let half_width = width / 2.0;
        let p1 = point_from_angle(center, angle + PI, half_len);
        let p2 = point_from_angle(center, angle, half_len);
        Rect {
            a: point_from_angle(p1, angle + FRAC_PI_2, half_width),
            b: point_from_angle(p2, angle + FRAC_PI_2, half_width),
            c: point_from_angle(p2, angle - FRAC_PI_2, half_width),
            d: point_from_angle(p1, angle - FRAC_PI_2, half_width),
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

/// Angle of the vector a -> b, counter-clockwise from +x, in `[0, 2π)`.
/// Coincident points yield `0`.
pub fn angle_between(a: Point, b: Point) -> f64 {
    let angle = -(b.y - a.y).atan2(b.x - a.x);
    let angle = if angle < 0.0 { angle + TAU } else { angle };
    // -0.0 and tiny negatives can round up to exactly TAU
    if angle >= TAU { 0.0 } else { angle }
}

pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point {
        x: t * b.x + (1.0 - t) * a.x,
        y: t * b.y + (1.0 - t) * a.y,
    }
}

pub fn point_from_angle(origin: Point, angle: f64, distance: f64) -> Point {
    Point {
        x: origin.x + angle.cos() * distance,
        y: origin.y - angle.sin() * distance,
    }
}

pub fn length(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Strict containment: a point lying exactly on an edge is outside.
pub fn point_in_rotated_rect(p: Point, rect: &Rect) -> bool {
    let edges = [
        (rect.a, rect.b),
        (rect.b, rect.c),
        (rect.c, rect.d),
        (rect.d, rect.a),
    ];
    edges.iter().all(|&(from, to)| {
        let a = -(to.y - from.y);
        let b = to.x - from.x;
        let c = -(a * from.x + b * from.y);
        a * p.x + b * p.y + c > 0.0
    })
}
