//! Frame timing.
//!
//! A browser host stamps each frame with the display-refresh timestamp; a
//! headless host uses [`FrameClock`] to produce the same stamps at a fixed
//! rate.

use serde::{Deserialize, Serialize};

/// Default headless frame rate.
pub const DEFAULT_FPS: f64 = 60.0;

/// Stamp for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Zero-based frame counter.
    pub index: u64,
    /// Milliseconds since the host started the loop.
    pub now_ms: f64,
}

/// Fixed-rate frame source for headless runs and tests.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_ms: f64,
    next_index: u64,
}

impl FrameClock {
    pub fn new(fps: f64) -> Self {
        Self {
            frame_ms: 1000.0 / fps,
            next_index: 0,
        }
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Returns the stamp for the next frame. The first frame is at 0 ms.
    pub fn tick(&mut self) -> FrameTime {
        let time = FrameTime {
            index: self.next_index,
            now_ms: self.next_index as f64 * self.frame_ms,
        };
        self.next_index += 1;
        time
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_at_fixed_rate_from_zero() {
        let mut clock = FrameClock::new(50.0);
        let t0 = clock.tick();
        let t1 = clock.tick();
        let t2 = clock.tick();
        assert_eq!((t0.index, t0.now_ms), (0, 0.0));
        assert_eq!(t1.now_ms, 20.0);
        assert_eq!((t2.index, t2.now_ms), (2, 40.0));
    }

    #[test]
    fn default_is_sixty_hz() {
        let clock = FrameClock::default();
        assert!((clock.frame_ms() - 1000.0 / 60.0).abs() < 1e-12);
    }
}
