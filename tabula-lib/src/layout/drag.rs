//! Border drag sessions and pointer-move throttling

use std::time::Duration;
use std::time::Instant;

/// An in-progress drag of the border between two adjacent columns.
///
/// Widths are derived from the total pointer displacement since the drag
/// started, never from the previous move, so any subset of the pointer
/// positions that ends at the same place yields the same widths. A container
/// rescale mid-drag re-anchors the session at the last pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BorderDrag {
    pub left: usize,
    pub right: usize,
    pub start_x: f64,
    pub last_x: f64,
    pub left_start: u32,
}

impl BorderDrag {
    /// Requested width of the left column for a pointer at `x`.
    pub fn left_target(&self, x: f64) -> i64 {
        i64::from(self.left_start) + (x - self.start_x).round() as i64
    }

    /// Restarts the displacement from the last pointer position, with the
    /// left column now at `left_width`.
    pub fn rebase(&mut self, left_width: u32) {
        self.start_x = self.last_x;
        self.left_start = left_width;
    }
}

/// Rate limiter for pointer-move streams, firing on the leading and
/// trailing edge of each window.
///
/// The caller supplies the clock so the throttle stays deterministic.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use tabula_lib::layout::Throttle;
///
/// let mut throttle = Throttle::new(Duration::from_millis(50));
/// let t0 = Instant::now();
/// assert_eq!(throttle.offer(10.0, t0), Some(10.0));
/// assert_eq!(throttle.offer(12.0, t0 + Duration::from_millis(10)), None);
/// assert_eq!(throttle.flush(), Some(12.0));
/// ```
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    window: Duration,
    last_fired: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
            pending: None,
        }
    }

    /// Offers a value. Returns it if it should be applied now, otherwise
    /// keeps it as the pending trailing value.
    pub fn offer(&mut self, value: T, now: Instant) -> Option<T> {
        if self.window_elapsed(now) {
            self.last_fired = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Releases the pending value once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.window_elapsed(now) {
            self.last_fired = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Releases the pending value immediately and resets the window.
    pub fn flush(&mut self) -> Option<T> {
        self.last_fired = None;
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        self.last_fired
            .is_none_or(|last| now.saturating_duration_since(last) >= self.window)
    }
}
