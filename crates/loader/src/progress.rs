//! Synthetic progress curve, page-load pacing and the exit sequence.
//!
//! Progress is not tied to real resource loading. It creeps toward 100
//! while the page is loading and accelerates once the host reports the
//! page as loaded, so the counter never stalls and never lags real content.

use canvas_fx_core::prng::Xorshift64;

pub const MAX_PROGRESS: f64 = 100.0;
/// Fraction of the remaining gap the displayed value closes per frame.
pub const SMOOTHING: f64 = 0.1;

/// Settle delay after the document was already complete on mount.
pub const DOCUMENT_COMPLETE_SETTLE_MS: f64 = 500.0;
/// Settle delay after the window `load` event.
pub const WINDOW_LOAD_SETTLE_MS: f64 = 1000.0;

/// Increment before jitter.
///
/// Waiting for the page: 0.5, dropping to 0.05 above 70 and 0.01 above 90.
/// Once loaded: `1 + progress * 0.05`.
pub fn base_increment(progress: f64, loaded: bool) -> f64 {
    if loaded {
        1.0 + progress * 0.05
    } else if progress > 90.0 {
        0.01
    } else if progress > 70.0 {
        0.05
    } else {
        0.5
    }
}

/// One frame of raw progress with jitter drawn from `[0.5, 1.5)`.
pub fn advance(progress: f64, loaded: bool, rng: &mut Xorshift64) -> f64 {
    if progress >= MAX_PROGRESS {
        return MAX_PROGRESS;
    }
    let jitter = rng.next_range(0.5, 1.5);
    (progress + base_increment(progress, loaded) * jitter).min(MAX_PROGRESS)
}

/// Which host signal marked the page as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadCue {
    DocumentComplete,
    WindowLoad,
}

impl LoadCue {
    fn settle_ms(self) -> f64 {
        match self {
            LoadCue::DocumentComplete => DOCUMENT_COMPLETE_SETTLE_MS,
            LoadCue::WindowLoad => WINDOW_LOAD_SETTLE_MS,
        }
    }
}

/// Page-load flag with a settle delay. The earliest deadline wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadSignal {
    deadline_ms: Option<f64>,
}

impl LoadSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `cue` observed at `now_ms`.
    pub fn signal(&mut self, cue: LoadCue, now_ms: f64) {
        let at = now_ms + cue.settle_ms();
        self.deadline_ms = Some(self.deadline_ms.map_or(at, |d| d.min(at)));
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    pub fn is_loaded(&self, now_ms: f64) -> bool {
        self.deadline_ms.is_some_and(|d| now_ms >= d)
    }
}

/// Lifecycle of the loading screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Loading,
    /// Progress hit 100 after the minimum duration; exit starts at `at_ms`.
    ExitScheduled { at_ms: f64 },
    /// Exit transition running since `since_ms`.
    Exiting { since_ms: f64 },
    /// Completion callback has run.
    Done,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::ExitScheduled { .. } => "exit-scheduled",
            Phase::Exiting { .. } => "exiting",
            Phase::Done => "done",
        }
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self, Phase::Exiting { .. } | Phase::Done)
    }
}

/// Timing of the exit sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitTiming {
    /// Earliest time after the first frame the exit can be scheduled.
    pub min_duration_ms: f64,
    /// Delay between scheduling and starting the exit.
    pub delay_ms: f64,
    /// Length of the exit transition.
    pub transition_ms: f64,
}

impl Default for ExitTiming {
    fn default() -> Self {
        Self {
            min_duration_ms: 1500.0,
            delay_ms: 200.0,
            transition_ms: 800.0,
        }
    }
}

impl ExitTiming {
    /// Next phase at `elapsed_ms` since the first frame.
    pub fn next(&self, phase: Phase, progress: f64, elapsed_ms: f64) -> Phase {
        match phase {
            Phase::Loading if progress >= MAX_PROGRESS && elapsed_ms >= self.min_duration_ms => {
                Phase::ExitScheduled {
                    at_ms: elapsed_ms + self.delay_ms,
                }
            }
            Phase::ExitScheduled { at_ms } if elapsed_ms >= at_ms => Phase::Exiting {
                since_ms: elapsed_ms,
            },
            Phase::Exiting { since_ms } if elapsed_ms - since_ms >= self.transition_ms => {
                Phase::Done
            }
            other => other,
        }
    }
}

/// Target styles of the overlay's CSS transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitStyle {
    pub opacity: f64,
    pub scale: f64,
    pub blur_px: f64,
    pub pointer_events: bool,
}

impl ExitStyle {
    pub const RESTING: ExitStyle = ExitStyle {
        opacity: 1.0,
        scale: 1.0,
        blur_px: 0.0,
        pointer_events: true,
    };

    pub const EXITED: ExitStyle = ExitStyle {
        opacity: 0.0,
        scale: 2.5,
        blur_px: 10.0,
        pointer_events: false,
    };

    pub fn for_phase(phase: Phase) -> Self {
        if phase.is_exiting() {
            Self::EXITED
        } else {
            Self::RESTING
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_increments_step_down() {
        assert_eq!(base_increment(0.0, false), 0.5);
        assert_eq!(base_increment(70.0, false), 0.5);
        assert_eq!(base_increment(70.5, false), 0.05);
        assert_eq!(base_increment(90.0, false), 0.05);
        assert_eq!(base_increment(90.5, false), 0.01);
    }

    #[test]
    fn loaded_increment_accelerates() {
        assert_eq!(base_increment(0.0, true), 1.0);
        assert!((base_increment(50.0, true) - 3.5).abs() < 1e-12);
        assert!((base_increment(95.0, true) - 5.75).abs() < 1e-12);
    }

    #[test]
    fn advance_is_clamped_and_stops_at_max() {
        let mut rng = Xorshift64::new(1);
        assert_eq!(advance(99.9, true, &mut rng), 100.0);
        assert_eq!(advance(100.0, true, &mut rng), 100.0);
    }

    #[test]
    fn unloaded_progress_stalls_below_max() {
        let mut rng = Xorshift64::new(2);
        let mut p = 0.0;
        for _ in 0..1000 {
            p = advance(p, false, &mut rng);
        }
        assert!(p > 90.0 && p < 100.0, "{p}");
    }

    #[test]
    fn earliest_load_deadline_wins() {
        let mut s = LoadSignal::new();
        assert!(!s.is_loaded(1e9));
        s.signal(LoadCue::WindowLoad, 100.0);
        assert_eq!(s.deadline_ms(), Some(1100.0));
        s.signal(LoadCue::DocumentComplete, 200.0);
        assert_eq!(s.deadline_ms(), Some(700.0));
        s.signal(LoadCue::WindowLoad, 300.0);
        assert_eq!(s.deadline_ms(), Some(700.0));
        assert!(!s.is_loaded(699.0));
        assert!(s.is_loaded(700.0));
    }

    #[test]
    fn exit_waits_for_progress_and_minimum_duration() {
        let t = ExitTiming::default();
        assert_eq!(t.next(Phase::Loading, 99.0, 5000.0), Phase::Loading);
        assert_eq!(t.next(Phase::Loading, 100.0, 1499.0), Phase::Loading);
        assert_eq!(
            t.next(Phase::Loading, 100.0, 1500.0),
            Phase::ExitScheduled { at_ms: 1700.0 }
        );
    }

    #[test]
    fn exit_sequence_timing() {
        let t = ExitTiming::default();
        let scheduled = Phase::ExitScheduled { at_ms: 1700.0 };
        assert_eq!(t.next(scheduled, 100.0, 1690.0), scheduled);
        let exiting = t.next(scheduled, 100.0, 1700.0);
        assert_eq!(exiting, Phase::Exiting { since_ms: 1700.0 });
        assert_eq!(t.next(exiting, 100.0, 2499.0), exiting);
        assert_eq!(t.next(exiting, 100.0, 2500.0), Phase::Done);
        assert_eq!(t.next(Phase::Done, 100.0, 1e9), Phase::Done);
    }

    #[test]
    fn exit_style_follows_phase() {
        assert_eq!(ExitStyle::for_phase(Phase::Loading), ExitStyle::RESTING);
        assert_eq!(
            ExitStyle::for_phase(Phase::ExitScheduled { at_ms: 0.0 }),
            ExitStyle::RESTING
        );
        assert_eq!(
            ExitStyle::for_phase(Phase::Exiting { since_ms: 0.0 }),
            ExitStyle::EXITED
        );
        assert_eq!(ExitStyle::for_phase(Phase::Done).scale, 2.5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn progress_is_monotone_and_bounded(
                seed in any::<u64>(),
                loaded_at in 0usize..600,
                frames in 1usize..800,
            ) {
                let mut rng = Xorshift64::new(seed);
                let mut p = 0.0;
                for frame in 0..frames {
                    let next = advance(p, frame >= loaded_at, &mut rng);
                    prop_assert!(next >= p);
                    prop_assert!(next <= MAX_PROGRESS);
                    p = next;
                }
            }
        }
    }
}
