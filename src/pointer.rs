//! Mouse and touch input folded into one drag gesture plus a pointer speed
//! estimate.
//!
//! [`GestureTracker`] knows about presses, releases and the two-finger touch
//! gesture. [`PointerTracker`] wraps it with the time-based parts (position
//! throttling and speed sampling) and hands out [`PointerState`] snapshots,
//! which is all the simulation ever reads.

use crate::geometry::Point;
use crate::throttle::RateLimiter;

/// Pointer moves closer together than this are dropped.
pub const POSITION_TRACKER_INTERVAL_MS: f64 = 20.0;
/// Speed is re-estimated on this period, not every frame.
pub const SPEED_TRACKER_INTERVAL_MS: f64 = 100.0;

/// Per-axis movement sign of the last tracked step, each component in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Direction {
    pub x: i8,
    pub y: i8,
}

impl Direction {
    fn between(from: Option<Point>, to: Point) -> Self {
        match from {
            Some(from) => Direction {
                x: axis_sign(to.x - from.x),
                y: axis_sign(to.y - from.y),
            },
            None => Direction::default(),
        }
    }
}

fn axis_sign(delta: f64) -> i8 {
    if delta > 0.0 {
        1
    } else if delta < 0.0 {
        -1
    } else {
        0
    }
}

/// One changed touch from a touch event, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: i32,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, position: Point::new(x, y) }
    }
}

/// A finished drag: the two endpoints of a prospective string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub start: Point,
    pub end: Point,
}

/// Read-only view of the pointer handed to every vertex each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub current: Option<Point>,
    pub direction: Direction,
    /// Travel speed in px/s, refreshed every [`SPEED_TRACKER_INTERVAL_MS`].
    pub speed: f64,
    pub drawing: bool,
    pub start_pos: Option<Point>,
    pub end_pos: Option<Point>,
}

impl PointerState {
    /// Where the live drag preview should end: the second finger for a touch
    /// gesture, otherwise the pointer itself.
    pub fn preview_end(&self) -> Option<Point> {
        self.end_pos.or(self.current)
    }
}

// --- Gesture detection -------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct GestureTracker {
    current: Option<Point>,
    last: Option<Point>,
    direction: Direction,
    travel: f64, // manhattan distance since the last speed sample
    drawing: bool,
    start_pos: Option<Point>,
    end_pos: Option<Point>,
    touch_start: Option<TouchPoint>,
    touch_end: Option<TouchPoint>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawing(&self) -> bool {
        self.drawing
    }

    /// True while at least one finger of the touch gesture is down.
    pub fn touching(&self) -> bool {
        self.touch_start.is_some() || self.touch_end.is_some()
    }

    pub(crate) fn take_travel(&mut self) -> f64 {
        std::mem::take(&mut self.travel)
    }

    /// Records a pointer position: direction, travel and (for mouse drags)
    /// the live end of the drag.
    pub(crate) fn track(&mut self, next: Point, extends_drag: bool) {
        self.direction = Direction::between(self.current, next);
        if self.drawing && extends_drag {
            self.end_pos = Some(next);
        }
        self.current = Some(next);
        if let Some(last) = self.last {
            self.travel += (next.x - last.x).abs() + (next.y - last.y).abs();
        }
        self.last = Some(next);
    }

    pub fn mouse_down(&mut self, position: Point) {
        self.drawing = true;
        self.start_pos = Some(position);
        self.end_pos = None;
    }

    pub fn mouse_move(&mut self, position: Point) {
        self.track(position, true);
    }

    /// Ends a mouse drag at `position`; `None` when no drag was in progress.
    pub fn mouse_up(&mut self, position: Point) -> Option<Gesture> {
        if !self.drawing {
            return None;
        }
        self.track(position, true);
        self.finish_drag()
    }

    /// The pointer left the document mid-drag; treated as a release where it was last seen.
    pub fn leave_document(&mut self) -> Option<Gesture> {
        if !self.drawing || self.touching() {
            return None;
        }
        self.finish_drag()
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        for touch in touches {
            if self.touch_start.is_none() {
                self.touch_start = Some(*touch);
                self.start_pos = Some(touch.position);
            } else if self.touch_end.is_none() {
                self.touch_end = Some(*touch);
                self.end_pos = Some(touch.position);
            }
        }
    }

    /// Moves the touch anchors. With a single finger down, returns the
    /// position that should be tracked like a mouse move (strumming).
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> Option<Point> {
        for touch in touches {
            if self.touch_start.is_some_and(|t| t.id == touch.id) {
                self.touch_start = Some(*touch);
                self.start_pos = Some(touch.position);
            } else if self.touch_end.is_some_and(|t| t.id == touch.id) {
                self.touch_end = Some(*touch);
                self.end_pos = Some(touch.position);
            }
        }

        if self.touch_end.is_none() {
            touches.first().map(|t| t.position)
        } else {
            if self.touch_start.is_some() {
                self.drawing = true;
            }
            None
        }
    }

    /// Lifts fingers; completes the gesture once both anchors are released.
    pub fn touch_end(&mut self, touches: &[TouchPoint]) -> Option<Gesture> {
        for touch in touches {
            if self.touch_start.is_some_and(|t| t.id == touch.id) {
                self.touch_start = None;
            } else if self.touch_end.is_some_and(|t| t.id == touch.id) {
                self.touch_end = None;
            }
        }

        if self.touching() {
            return None;
        }
        let gesture = if self.drawing { self.finish_drag() } else { None };
        // No finger left on the surface: there is no pointer position any more.
        self.current = None;
        self.last = None;
        gesture
    }

    fn finish_drag(&mut self) -> Option<Gesture> {
        let gesture = match (self.start_pos, self.end_pos.or(self.current)) {
            (Some(start), Some(end)) => Some(Gesture { start, end }),
            _ => None,
        };
        self.drawing = false;
        self.start_pos = None;
        self.end_pos = None;
        gesture
    }

    fn state(&self, speed: f64) -> PointerState {
        PointerState {
            current: self.current,
            direction: self.direction,
            speed,
            drawing: self.drawing,
            start_pos: self.start_pos,
            end_pos: self.end_pos,
        }
    }
}

// --- Speed estimation --------------------------------------------------------

/// Gesture tracking plus throttled position updates and a periodically
/// sampled travel speed. Timestamps are milliseconds on the frame clock.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    gesture: GestureTracker,
    position_gate: RateLimiter,
    speed: f64,
    last_sample_ms: Option<f64>,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            gesture: GestureTracker::new(),
            position_gate: RateLimiter::new(POSITION_TRACKER_INTERVAL_MS),
            speed: 0.0,
            last_sample_ms: None,
        }
    }

    pub fn gesture(&self) -> &GestureTracker {
        &self.gesture
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn mouse_down(&mut self, position: Point) {
        self.gesture.mouse_down(position);
    }

    pub fn mouse_move(&mut self, position: Point, now_ms: f64) {
        if self.position_gate.try_fire(now_ms) {
            self.gesture.mouse_move(position);
        }
    }

    pub fn mouse_up(&mut self, position: Point) -> Option<Gesture> {
        self.gesture.mouse_up(position)
    }

    pub fn leave_document(&mut self) -> Option<Gesture> {
        self.gesture.leave_document()
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        self.gesture.touch_start(touches);
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint], now_ms: f64) {
        if let Some(position) = self.gesture.touch_move(touches) {
            if self.position_gate.try_fire(now_ms) {
                self.gesture.track(position, false);
            }
        }
    }

    pub fn touch_end(&mut self, touches: &[TouchPoint]) -> Option<Gesture> {
        self.gesture.touch_end(touches)
    }

    /// Re-estimates speed once per [`SPEED_TRACKER_INTERVAL_MS`]; cheap to
    /// call every frame. The first call only starts the clock.
    pub fn sample(&mut self, now_ms: f64) {
        match self.last_sample_ms {
            None => {
                self.gesture.take_travel();
                self.last_sample_ms = Some(now_ms);
            }
            Some(last) if now_ms - last >= SPEED_TRACKER_INTERVAL_MS => {
                let travel = self.gesture.take_travel();
                self.speed = (travel / (now_ms - last) * 1000.0).round();
                self.last_sample_ms = Some(now_ms);
            }
            Some(_) => {}
        }
    }

    pub fn snapshot(&self) -> PointerState {
        self.gesture.state(self.speed)
    }
}
