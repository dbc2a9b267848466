//! Tick↔millisecond time axis.
//!
//! The real axis is owned by the editor's tempo/time-signature engine; the
//! phonemizer only needs the two conversions and their derived helpers.
//! [`ConstTempo`] provides a fixed-tempo implementation for tests and
//! standalone use.

/// Ticks per quarter note.
pub const TICKS_PER_QUARTER: i32 = 480;

/// Tick↔ms conversion collaborator.
///
/// Both conversions must be monotonic and mutually near-inverse; alignment
/// anchors are round-tripped through them and are expected to land within
/// 1 ms of their source position.
pub trait TimeAxis {
    /// Absolute tick position to absolute milliseconds.
    fn tick_to_ms(&self, tick: i32) -> f64;

    /// Absolute milliseconds to absolute tick position.
    fn ms_to_tick(&self, ms: f64) -> i32;

    /// Milliseconds between two tick positions.
    fn ms_between_ticks(&self, start: i32, end: i32) -> f64 {
        self.tick_to_ms(end) - self.tick_to_ms(start)
    }

    /// Ticks from the tick position at `start_ms` to the one at `end_ms`.
    fn ticks_between_ms(&self, start_ms: f64, end_ms: f64) -> i32 {
        self.ms_to_tick(end_ms) - self.ms_to_tick(start_ms)
    }
}

/// Fixed-tempo time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstTempo {
    bpm: f64,
}

impl ConstTempo {
    pub fn new(bpm: f64) -> Self {
        Self { bpm }
    }

    #[inline]
    fn ms_per_tick(&self) -> f64 {
        60_000.0 / (self.bpm * TICKS_PER_QUARTER as f64)
    }
}

impl Default for ConstTempo {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl TimeAxis for ConstTempo {
    fn tick_to_ms(&self, tick: i32) -> f64 {
        tick as f64 * self.ms_per_tick()
    }

    fn ms_to_tick(&self, ms: f64) -> i32 {
        (ms / self.ms_per_tick()).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quarter_note_at_120bpm() {
        let axis = ConstTempo::new(120.0);
        assert_abs_diff_eq!(axis.tick_to_ms(480), 500.0, epsilon = 1e-9);
        assert_abs_diff_eq!(axis.tick_to_ms(960), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let axis = ConstTempo::new(97.3);
        for tick in [0, 1, 15, 480, 481, 9600, 123_456] {
            assert_eq!(axis.ms_to_tick(axis.tick_to_ms(tick)), tick);
        }
    }

    #[test]
    fn test_between_helpers() {
        let axis = ConstTempo::new(120.0);
        assert_abs_diff_eq!(axis.ms_between_ticks(480, 960), 500.0, epsilon = 1e-9);
        assert_eq!(axis.ticks_between_ms(500.0, 1000.0), 480);
        assert_eq!(axis.ticks_between_ms(1000.0, 500.0), -480);
    }
}
