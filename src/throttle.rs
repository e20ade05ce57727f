//! Time gates measured in milliseconds on the host's frame clock
//! (`performance.now()` / the `requestAnimationFrame` timestamp).

/// Leading-edge throttle: the first call passes, later calls inside the
/// window are dropped (no trailing call).
#[derive(Clone, Copy, Debug)]
pub struct RateLimiter {
    interval_ms: f64,
    last_fired_ms: Option<f64>,
}

impl RateLimiter {
    pub const fn new(interval_ms: f64) -> Self {
        Self { interval_ms, last_fired_ms: None }
    }

    /// Whether a call at `now_ms` would pass, without recording it.
    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last_fired_ms {
            None => true,
            Some(last) => now_ms - last >= self.interval_ms,
        }
    }

    /// Records and returns `true` when the call passes the gate.
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if self.ready(now_ms) {
            self.last_fired_ms = Some(now_ms);
            true
        } else {
            false
        }
    }
}
