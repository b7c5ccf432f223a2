//! Frame time sources.

use std::time::Instant;

/// Supplies the elapsed animation time, sampled once per frame.
///
/// Implementations must be monotonic: successive samples never decrease and
/// never go below zero.
pub trait Clock {
    /// Seconds since the clock started.
    fn elapsed_s(&mut self) -> f32;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn elapsed_s(&mut self) -> f32 {
        (**self).elapsed_s()
    }
}

/// Wall-clock time since construction
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_s(&mut self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Deterministic clock that advances exactly one frame per sample
///
/// Used for recording (every captured frame is 1/fps apart regardless of how
/// long capture takes) and for tests.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    fps: u32,
    frame: u64,
}

impl FixedStepClock {
    /// `fps` must be non-zero
    pub fn new(fps: u32) -> Self {
        debug_assert!(fps > 0);
        Self { fps, frame: 0 }
    }

    /// Number of samples taken so far
    pub fn frames(&self) -> u64 {
        self.frame
    }
}

impl Clock for FixedStepClock {
    fn elapsed_s(&mut self) -> f32 {
        let t = (self.frame as f64 / self.fps as f64) as f32;
        self.frame += 1;
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step_sequence() {
        let mut clock = FixedStepClock::new(4);
        assert_eq!(clock.elapsed_s(), 0.0);
        assert_eq!(clock.elapsed_s(), 0.25);
        assert_eq!(clock.elapsed_s(), 0.5);
        assert_eq!(clock.frames(), 3);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.elapsed_s();
        let b = clock.elapsed_s();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn test_boxed_clock_delegates() {
        let mut clock: Box<dyn Clock> = Box::new(FixedStepClock::new(2));
        assert_eq!(clock.elapsed_s(), 0.0);
        assert_eq!(clock.elapsed_s(), 0.5);
    }
}
