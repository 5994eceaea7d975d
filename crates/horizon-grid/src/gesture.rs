//! Long-press recognition for grid cells.
//!
//! Host toolkits usually recognize long-presses themselves; this recognizer
//! exists for hosts that only deliver raw press/move/release input. Feed it
//! input, call [`LongPressRecognizer::poll`] from a timer, and forward the
//! resulting [`PressEvent`] to [`Cell::long_press`](crate::Cell::long_press).
//!
//! # Example
//!
//! ```
//! use horizon_grid::{CellCoord, LongPressRecognizer, PressPoint};
//! use std::time::{Duration, Instant};
//!
//! let mut recognizer = LongPressRecognizer::with_delay(Duration::from_millis(100));
//! let start = Instant::now();
//!
//! recognizer.press_at(CellCoord::new(2, 1), PressPoint::new(5.0, 5.0), start);
//! assert!(recognizer.poll_at(start + Duration::from_millis(50)).is_none());
//!
//! let event = recognizer.poll_at(start + Duration::from_millis(120)).unwrap();
//! assert_eq!(event.origin, CellCoord::new(2, 1));
//! ```

use std::time::{Duration, Instant};

use horizon_grid_core::logging::targets;

use crate::events::{CellCoord, PressEvent, PressPoint};
use crate::style::DEFAULT_LONG_PRESS_DELAY_MS;

/// Default maximum movement, in host units, before a press is abandoned.
pub const DEFAULT_PRESS_SLOP: f32 = 10.0;

/// Configuration for the long-press recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPressConfig {
    /// How long a press must be held.
    pub delay: Duration,
    /// Maximum movement allowed while holding.
    pub slop: f32,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_LONG_PRESS_DELAY_MS),
            slop: DEFAULT_PRESS_SLOP,
        }
    }
}

#[derive(Debug, Clone)]
struct ActivePress {
    origin: CellCoord,
    start_time: Instant,
    start_pos: PressPoint,
    current_pos: PressPoint,
    moved_beyond_slop: bool,
    recognized: bool,
}

/// How a tracked press ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// No press was being tracked.
    Idle,
    /// Released before the delay elapsed, or after moving too far.
    Short,
    /// Released after a long-press was recognized.
    LongPress,
}

/// Turns a press held in place into a single [`PressEvent`].
#[derive(Debug, Default)]
pub struct LongPressRecognizer {
    config: LongPressConfig,
    active: Option<ActivePress>,
}

impl LongPressRecognizer {
    /// Creates a recognizer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recognizer with the given configuration.
    pub fn with_config(config: LongPressConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Creates a recognizer with the default slop and a custom delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self::with_config(LongPressConfig {
            delay,
            ..LongPressConfig::default()
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &LongPressConfig {
        &self.config
    }

    /// Returns `true` while a press is being tracked.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Start tracking a press on `origin` now.
    pub fn press(&mut self, origin: CellCoord, position: PressPoint) {
        self.press_at(origin, position, Instant::now());
    }

    /// Start tracking a press on `origin` at `now`.
    ///
    /// A press already in progress is replaced.
    pub fn press_at(&mut self, origin: CellCoord, position: PressPoint, now: Instant) {
        self.active = Some(ActivePress {
            origin,
            start_time: now,
            start_pos: position,
            current_pos: position,
            moved_beyond_slop: false,
            recognized: false,
        });
    }

    /// Report pointer movement while pressed.
    pub fn move_to(&mut self, position: PressPoint) {
        if let Some(press) = self.active.as_mut() {
            press.current_pos = position;
            if !press.recognized && press.start_pos.distance_to(position) > self.config.slop {
                tracing::trace!(
                    target: targets::GESTURE,
                    origin = %press.origin,
                    "press moved beyond slop"
                );
                press.moved_beyond_slop = true;
            }
        }
    }

    /// Check for a long-press now.
    pub fn poll(&mut self) -> Option<PressEvent> {
        self.poll_at(Instant::now())
    }

    /// Check whether the tracked press has been held for the configured delay
    /// at `now`.
    ///
    /// Returns the event exactly once per press.
    pub fn poll_at(&mut self, now: Instant) -> Option<PressEvent> {
        let press = self.active.as_mut()?;
        if press.moved_beyond_slop || press.recognized {
            return None;
        }
        let held_for = now.saturating_duration_since(press.start_time);
        if held_for < self.config.delay {
            return None;
        }

        press.recognized = true;
        Some(PressEvent {
            origin: press.origin,
            position: press.current_pos,
            held_for,
        })
    }

    /// Stop tracking and report how the press ended.
    pub fn release(&mut self) -> PressOutcome {
        match self.active.take() {
            None => PressOutcome::Idle,
            Some(press) if press.recognized => PressOutcome::LongPress,
            Some(_) => PressOutcome::Short,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_recognized_once_after_delay() {
        let mut recognizer = LongPressRecognizer::new();
        let start = Instant::now();
        recognizer.press_at(CellCoord::new(0, 0), PressPoint::default(), start);

        assert!(recognizer.poll_at(start + ms(99)).is_none());
        let event = recognizer.poll_at(start + ms(100)).unwrap();
        assert_eq!(event.held_for, ms(100));
        assert!(recognizer.poll_at(start + ms(500)).is_none());

        assert_eq!(recognizer.release(), PressOutcome::LongPress);
        assert!(!recognizer.is_active());
    }

    #[test]
    fn test_short_press() {
        let mut recognizer = LongPressRecognizer::new();
        let start = Instant::now();
        recognizer.press_at(CellCoord::new(1, 1), PressPoint::default(), start);
        assert!(recognizer.poll_at(start + ms(20)).is_none());
        assert_eq!(recognizer.release(), PressOutcome::Short);
        assert_eq!(recognizer.release(), PressOutcome::Idle);
    }

    #[test]
    fn test_movement_cancels() {
        let mut recognizer = LongPressRecognizer::new();
        let start = Instant::now();
        recognizer.press_at(CellCoord::new(0, 2), PressPoint::new(0.0, 0.0), start);

        recognizer.move_to(PressPoint::new(3.0, 4.0));
        recognizer.move_to(PressPoint::new(30.0, 0.0));
        assert!(recognizer.poll_at(start + ms(1000)).is_none());
        assert_eq!(recognizer.release(), PressOutcome::Short);
    }

    #[test]
    fn test_small_movement_keeps_press() {
        let mut recognizer = LongPressRecognizer::with_delay(ms(250));
        let start = Instant::now();
        recognizer.press_at(CellCoord::new(3, 0), PressPoint::new(10.0, 10.0), start);
        recognizer.move_to(PressPoint::new(12.0, 11.0));

        let event = recognizer.poll_at(start + ms(250)).unwrap();
        assert_eq!(event.position, PressPoint::new(12.0, 11.0));
        assert_eq!(event.origin, CellCoord::new(3, 0));
    }
}
