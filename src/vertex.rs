//! A single point of a spaghetti string: spring-damper integration towards
//! its rest position, pointer dragging, and strum detection.

use crate::geometry::Point;
use crate::hitbox::Hitbox;
use crate::pointer::PointerState;
use crate::throttle::RateLimiter;

/// Velocities at or below this magnitude count as "at rest" and snap.
pub const VELOCITY_EPSILON: f64 = 0.01;
/// Fraction of the way a held vertex follows the pointer.
pub const DRAG_FOLLOW: f64 = 0.8;
/// Pointer speed is divided by this to get the launch velocity of a strum.
pub const STRUM_SPEED_DIVISOR: f64 = 20.0;
/// Minimum time between two strums of the same vertex.
pub const STRUM_INTERVAL_MS: f64 = 400.0;

/// Spring parameters shared by every vertex of a string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Physics {
    /// Fraction of velocity lost per frame, in `(0, 1)`.
    pub damping: f64,
    /// Divisor of the restoring pull; larger is slower.
    pub viscosity: f64,
}

impl Physics {
    /// Viscosity at or below this bound makes the per-frame update diverge
    /// for the given damping.
    pub fn viscosity_floor(damping: f64) -> f64 {
        (1.0 - damping) / (2.0 * (2.0 - damping))
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, p: &Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    fn of_mut(self, p: &mut Point) -> &mut f64 {
        match self {
            Axis::X => &mut p.x,
            Axis::Y => &mut p.y,
        }
    }
}

#[derive(Clone, Debug)]
pub struct InteractiveVertex {
    initial: Point,
    pub(crate) current: Point,
    control: Point,
    pub(crate) velocity: Point,
    hitbox: Option<Hitbox>, // None for anchors
    physics: Physics,
    strum_gate: RateLimiter,
}

impl InteractiveVertex {
    /// Pinned string end: never moves, never hit-tested.
    pub fn anchor(position: Point, physics: Physics) -> Self {
        Self {
            initial: position,
            current: position,
            control: position,
            velocity: Point::default(),
            hitbox: None,
            physics,
            strum_gate: RateLimiter::new(STRUM_INTERVAL_MS),
        }
    }

    /// Free vertex with a hitbox spanning `vertex_separation` along `angle`.
    pub fn free(
        position: Point,
        angle: f64,
        vertex_separation: f64,
        hitbox_width: f64,
        physics: Physics,
    ) -> Self {
        Self {
            hitbox: Some(Hitbox::new(position, angle, vertex_separation, hitbox_width)),
            ..Self::anchor(position, physics)
        }
    }

    pub fn is_anchor(&self) -> bool {
        self.hitbox.is_none()
    }

    pub fn initial(&self) -> Point {
        self.initial
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn control(&self) -> Point {
        self.control
    }

    pub fn velocity(&self) -> Point {
        self.velocity
    }

    pub fn hitbox(&self) -> Option<&Hitbox> {
        self.hitbox.as_ref()
    }

    fn held(&self) -> bool {
        self.hitbox.as_ref().is_some_and(Hitbox::hitting)
    }

    /// Bezier control point: halfway to the next vertex.
    pub fn set_control_point(&mut self, next: &InteractiveVertex) {
        self.control = self.current.midpoint(next.current);
    }

    /// The last vertex of a string has no successor and controls itself.
    pub(crate) fn reset_control_point(&mut self) {
        self.control = self.current;
    }

    /// Advances one frame. Returns `true` when the pointer strummed this
    /// vertex, i.e. the caller should play the string's note.
    pub fn render(&mut self, pointer: &PointerState, now_ms: f64) -> bool {
        if self.is_anchor() {
            return false;
        }

        self.integrate(Axis::X);
        self.integrate(Axis::Y);

        let center = self.current;
        let Some(hitbox) = self.hitbox.as_mut() else {
            return false;
        };
        hitbox.set_coords_by_center(center);

        let Some(position) = pointer.current else {
            // Finger lifted while holding the vertex: let go of it.
            return hitbox.release() && pointer.speed > 0.0 && self.strum(pointer, now_ms);
        };
        if pointer.drawing || pointer.speed == 0.0 {
            return false;
        }

        let mut dragged_to = None;
        let mut left = false;
        hitbox.hit_test(
            position,
            || dragged_to = Some(drag_towards(self.initial, position)),
            || left = true,
        );

        if let Some(target) = dragged_to {
            self.current = target;
        }
        left && self.strum(pointer, now_ms)
    }

    fn integrate(&mut self, axis: Axis) {
        let held = self.held();
        let Physics { damping, viscosity } = self.physics;
        let initial = axis.of(&self.initial);
        let velocity = axis.of(&self.velocity);

        if velocity.abs() > VELOCITY_EPSILON {
            let v = velocity * (1.0 - damping);
            let current = axis.of(&self.current) + v;
            *axis.of_mut(&mut self.current) = current;
            *axis.of_mut(&mut self.velocity) = if held {
                v
            } else {
                v + (initial - current) / viscosity
            };
        } else if velocity != 0.0 {
            *axis.of_mut(&mut self.velocity) = 0.0;
            *axis.of_mut(&mut self.current) = initial;
        } else if !held && axis.of(&self.current) != initial {
            // Released after a drag without a strum: pull back from rest.
            *axis.of_mut(&mut self.velocity) = (initial - axis.of(&self.current)) / viscosity;
        }
    }

    fn strum(&mut self, pointer: &PointerState, now_ms: f64) -> bool {
        if !self.strum_gate.try_fire(now_ms) {
            return false;
        }
        let launch = |sign: i8| {
            let sign = if sign == 0 { 1.0 } else { f64::from(sign) };
            sign * pointer.speed / STRUM_SPEED_DIVISOR
        };
        self.velocity = Point::new(launch(pointer.direction.x), launch(pointer.direction.y));
        true
    }
}

fn drag_towards(initial: Point, pointer: Point) -> Point {
    Point::new(
        (pointer.x - initial.x) * DRAG_FOLLOW + initial.x,
        (pointer.y - initial.y) * DRAG_FOLLOW + initial.y,
    )
}
