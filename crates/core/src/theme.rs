//! Light/dark theme signal and per-frame color interpolation.
//!
//! The host owns one [`ThemeSignal`] (the only writer) and hands a
//! [`ThemeReader`] to every animator at construction. Animators poll the
//! reader once per frame and move their colors toward the target for the
//! current mode with a [`Smoothed`] value, so a toggle never produces a
//! visible jump.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::color::Srgb;

/// Per-frame interpolation rate used by the persistent animators.
pub const THEME_LERP_RATE: f64 = 0.06;

/// Writer side of the dark-mode flag. Not `Clone`: there is one writer.
#[derive(Debug)]
pub struct ThemeSignal {
    dark: Arc<AtomicBool>,
}

/// Read-only handle to a [`ThemeSignal`].
#[derive(Debug, Clone)]
pub struct ThemeReader {
    dark: Arc<AtomicBool>,
}

impl ThemeSignal {
    pub fn new(dark: bool) -> Self {
        Self {
            dark: Arc::new(AtomicBool::new(dark)),
        }
    }

    pub fn subscribe(&self) -> ThemeReader {
        ThemeReader {
            dark: Arc::clone(&self.dark),
        }
    }

    pub fn set_dark(&self, dark: bool) {
        self.dark.store(dark, Ordering::Relaxed);
    }

    /// Flips the mode and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.dark.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }
}

impl Default for ThemeSignal {
    /// Dark mode, the site's default theme.
    fn default() -> Self {
        Self::new(true)
    }
}

impl ThemeReader {
    /// A reader detached from any writer, pinned to one mode.
    pub fn fixed(dark: bool) -> Self {
        ThemeSignal::new(dark).subscribe()
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }

    /// Picks the value for the current mode.
    pub fn pick<T>(&self, dark: T, light: T) -> T {
        if self.is_dark() {
            dark
        } else {
            light
        }
    }
}

/// Values that can be blended linearly.
pub trait Lerp: Copy {
    fn lerp(self, target: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, target: Self, t: f64) -> Self {
        self + (target - self) * t
    }
}

impl Lerp for Srgb {
    fn lerp(self, target: Self, t: f64) -> Self {
        Srgb::lerp(self, target, t)
    }
}

/// A value that approaches a moving target exponentially, one step per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed<T> {
    value: T,
    rate: f64,
}

impl<T: Lerp> Smoothed<T> {
    pub fn new(value: T, rate: f64) -> Self {
        Self { value, rate }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Moves `rate` of the remaining distance toward `target` and returns the new value.
    pub fn approach(&mut self, target: T) -> T {
        self.value = self.value.lerp(target, self.rate);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_observe_writer() {
        let signal = ThemeSignal::new(false);
        let a = signal.subscribe();
        let b = a.clone();
        assert!(!a.is_dark());
        signal.set_dark(true);
        assert!(a.is_dark() && b.is_dark());
    }

    #[test]
    fn toggle_returns_new_mode() {
        let signal = ThemeSignal::new(true);
        assert!(!signal.toggle());
        assert!(!signal.is_dark());
        assert!(signal.toggle());
        assert!(signal.is_dark());
    }

    #[test]
    fn default_signal_is_dark() {
        assert!(ThemeSignal::default().is_dark());
    }

    #[test]
    fn fixed_reader_and_pick() {
        assert_eq!(ThemeReader::fixed(true).pick(1.0, 0.5), 1.0);
        assert_eq!(ThemeReader::fixed(false).pick(1.0, 0.5), 0.5);
    }

    #[test]
    fn smoothed_moves_fraction_of_gap() {
        let mut s = Smoothed::new(0.0, 0.1);
        assert!((s.approach(100.0) - 10.0).abs() < 1e-12);
        assert!((s.approach(100.0) - 19.0).abs() < 1e-12);
    }

    #[test]
    fn smoothed_converges_without_overshoot() {
        let mut s = Smoothed::new(0.5, THEME_LERP_RATE);
        let mut prev = s.get();
        for _ in 0..300 {
            let v = s.approach(1.0);
            assert!(v >= prev && v <= 1.0, "{prev} -> {v}");
            prev = v;
        }
        assert!((1.0 - prev).abs() < 1e-6);
    }

    #[test]
    fn smoothed_color_has_no_jump_on_toggle() {
        let dark = Srgb::from_rgb8(5, 5, 5);
        let light = Srgb::from_rgb8(249, 250, 251);
        let mut s = Smoothed::new(dark, THEME_LERP_RATE);
        let before = s.get();
        let after = s.approach(light);
        // One frame covers only 6% of the way.
        assert!((after.r - before.r) <= (light.r - dark.r) * THEME_LERP_RATE + 1e-12);
    }
}
