#![deny(unsafe_code)]
//! Loading progress animator.
//!
//! A one-shot intro shown while the page loads: traces radiate from a ring
//! around the center, particles travel along the drawn traces, and a
//! progress ring fills as a synthetic percentage climbs to 100. Once the
//! counter is full and a minimum duration has passed, the screen plays its
//! exit transition and then runs the completion callback exactly once.
//!
//! Colors are snapshotted at construction; later theme changes are ignored.

pub mod palette;
pub mod particle;
pub mod progress;
pub mod trace;

use std::f64::consts::{FRAC_PI_2, TAU};

use canvas_fx_core::params::{param_f64, param_usize};
use canvas_fx_core::prng::Xorshift64;
use canvas_fx_core::theme::ThemeReader;
use canvas_fx_core::{Animator, FrameTime, FxError, HostEvent, Shadow, Size, Stroke, Surface};
use glam::DVec2;
use serde_json::{json, Value};

pub use palette::LoaderPalette;
pub use particle::ProgressParticle;
pub use progress::{ExitStyle, ExitTiming, LoadCue, LoadSignal, Phase};
pub use trace::LoaderTrace;

use progress::{MAX_PROGRESS, SMOOTHING};

const DEFAULT_TRACE_COUNT: usize = 80;
const DEFAULT_PARTICLE_COUNT: usize = 150;

const RING_RADIUS: f64 = 100.0;
const RING_THICKNESS: f64 = 10.0;
const RING_BACKGROUND_ALPHA: f64 = 0.15;
const RING_GLOW_BLUR: f64 = 15.0;
const RING_GLOW_ALPHA: f64 = 0.6;
const GUIDE_RADIUS: f64 = RING_RADIUS - 15.0;
const GUIDE_ALPHA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoaderParams {
    pub trace_count: usize,
    pub particle_count: usize,
    pub timing: ExitTiming,
}

impl Default for LoaderParams {
    fn default() -> Self {
        Self {
            trace_count: DEFAULT_TRACE_COUNT,
            particle_count: DEFAULT_PARTICLE_COUNT,
            timing: ExitTiming::default(),
        }
    }
}

impl LoaderParams {
    pub fn from_json(params: &Value) -> Self {
        let timing = ExitTiming::default();
        Self {
            trace_count: param_usize(params, "trace_count", DEFAULT_TRACE_COUNT),
            particle_count: param_usize(params, "particle_count", DEFAULT_PARTICLE_COUNT),
            timing: ExitTiming {
                min_duration_ms: param_f64(params, "min_duration_ms", timing.min_duration_ms),
                delay_ms: param_f64(params, "exit_delay_ms", timing.delay_ms),
                transition_ms: param_f64(params, "exit_transition_ms", timing.transition_ms),
            },
        }
    }
}

type Callback = Box<dyn FnOnce()>;

pub struct Loader {
    size: Size,
    params: LoaderParams,
    palette: LoaderPalette,
    traces: Vec<LoaderTrace>,
    particles: Vec<ProgressParticle>,
    rng: Xorshift64,
    load: LoadSignal,
    pending_cues: Vec<LoadCue>,
    progress: f64,
    smoothed: f64,
    phase: Phase,
    start_ms: Option<f64>,
    on_complete: Option<Callback>,
}

impl Loader {
    pub fn new(size: Size, seed: u64, params: LoaderParams, palette: LoaderPalette) -> Self {
        let mut rng = Xorshift64::new(seed);
        let (traces, particles) = build_scene(size, &params, &mut rng);
        Self {
            size,
            params,
            palette,
            traces,
            particles,
            rng,
            load: LoadSignal::new(),
            pending_cues: Vec::new(),
            progress: 0.0,
            smoothed: 0.0,
            phase: Phase::Loading,
            start_ms: None,
            on_complete: None,
        }
    }

    /// Builds a loader from JSON params. The palette is resolved from the
    /// theme's current mode plus the optional `background` and `primary`
    /// color overrides in `json_params`.
    pub fn from_json(size: Size, seed: u64, json_params: &Value, theme: &ThemeReader) -> Self {
        let palette = LoaderPalette::resolve(theme.is_dark(), json_params);
        Self::new(size, seed, LoaderParams::from_json(json_params), palette)
    }

    /// Sets the callback run once when the exit transition has finished.
    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn timing(&self) -> ExitTiming {
        self.params.timing
    }

    pub fn palette(&self) -> LoaderPalette {
        self.palette
    }

    pub fn traces(&self) -> &[LoaderTrace] {
        &self.traces
    }

    pub fn particles(&self) -> &[ProgressParticle] {
        &self.particles
    }

    /// Raw synthetic progress in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Smoothed progress driving the ring.
    pub fn smoothed_progress(&self) -> f64 {
        self.smoothed
    }

    /// Integer percentage shown in the counter.
    pub fn displayed_percent(&self) -> u8 {
        self.smoothed.round().clamp(0.0, MAX_PROGRESS) as u8
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Overlay style the host applies with an `exit_transition_ms` CSS transition.
    pub fn exit_style(&self) -> ExitStyle {
        ExitStyle::for_phase(self.phase)
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        let (traces, particles) = build_scene(size, &self.params, &mut self.rng);
        self.traces = traces;
        self.particles = particles;
        log::debug!(
            "loader scene rebuilt: {} traces, {} particles at {}x{}",
            self.traces.len(),
            self.particles.len(),
            size.width,
            size.height
        );
    }

    fn advance_phase(&mut self, elapsed_ms: f64) {
        let next = self.params.timing.next(self.phase, self.progress, elapsed_ms);
        if next == self.phase {
            return;
        }
        log::info!("loader phase {:?} -> {:?} at {elapsed_ms:.0} ms", self.phase, next);
        self.phase = next;
        if next == Phase::Done {
            if let Some(callback) = self.on_complete.take() {
                callback();
            }
        }
    }
}

fn build_scene(
    size: Size,
    params: &LoaderParams,
    rng: &mut Xorshift64,
) -> (Vec<LoaderTrace>, Vec<ProgressParticle>) {
    let traces: Vec<LoaderTrace> = (0..params.trace_count)
        .map(|_| LoaderTrace::build(size, rng))
        .collect();
    let particles = (0..params.particle_count)
        .map(|_| ProgressParticle::random(traces.len(), rng))
        .collect();
    (traces, particles)
}

impl Animator for Loader {
    fn step(&mut self, time: FrameTime) -> Result<(), FxError> {
        let start = *self.start_ms.get_or_insert(time.now_ms);
        for cue in self.pending_cues.drain(..) {
            self.load.signal(cue, time.now_ms);
        }

        for trace in &mut self.traces {
            trace.advance();
        }
        for p in &mut self.particles {
            particle::step(p, &self.traces, &mut self.rng);
        }

        self.smoothed =
            (self.smoothed + (self.progress - self.smoothed) * SMOOTHING).clamp(0.0, MAX_PROGRESS);

        if self.phase == Phase::Loading {
            let loaded = self.load.is_loaded(time.now_ms);
            self.progress = progress::advance(self.progress, loaded, &mut self.rng);
        }
        self.advance_phase(time.now_ms - start);
        Ok(())
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let primary = self.palette.primary;
        surface.clear(Some(self.palette.background.with_alpha(1.0)));

        for trace in self.traces.iter().filter(|t| !t.is_delayed()) {
            surface.stroke_polyline(
                &trace.drawn_points(),
                Stroke {
                    color: primary.with_alpha(trace.alpha()),
                    width: trace.width(),
                },
            );
        }

        for p in &self.particles {
            if let Some(at) = particle::position(p, &self.traces) {
                surface.fill_rect(
                    at - DVec2::splat(p.size / 2.0),
                    DVec2::splat(p.size),
                    primary.with_alpha(p.alpha),
                );
            }
        }

        let center = self.size.center();
        surface.set_shadow(None);
        surface.stroke_arc(
            center,
            RING_RADIUS,
            0.0,
            TAU,
            Stroke {
                color: primary.with_alpha(RING_BACKGROUND_ALPHA),
                width: RING_THICKNESS,
            },
        );

        let sweep = TAU * self.smoothed / MAX_PROGRESS;
        if sweep > 0.0 {
            surface.set_shadow(Some(Shadow {
                blur: RING_GLOW_BLUR,
                color: primary.with_alpha(RING_GLOW_ALPHA),
            }));
            surface.stroke_arc(
                center,
                RING_RADIUS,
                -FRAC_PI_2,
                -FRAC_PI_2 + sweep,
                Stroke {
                    color: primary.with_alpha(1.0),
                    width: RING_THICKNESS,
                },
            );
            surface.set_shadow(None);
        }

        surface.stroke_arc(
            center,
            GUIDE_RADIUS,
            0.0,
            TAU,
            Stroke {
                color: primary.with_alpha(GUIDE_ALPHA),
                width: 1.0,
            },
        );
    }

    fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resize(size) => self.resize(size),
            HostEvent::DocumentComplete => self.pending_cues.push(LoadCue::DocumentComplete),
            HostEvent::WindowLoad => self.pending_cues.push(LoadCue::WindowLoad),
            _ => {}
        }
    }

    fn size(&self) -> Size {
        self.size
    }

    fn params(&self) -> Value {
        json!({
            "trace_count": self.params.trace_count,
            "particle_count": self.params.particle_count,
            "min_duration_ms": self.params.timing.min_duration_ms,
            "exit_delay_ms": self.params.timing.delay_ms,
            "exit_transition_ms": self.params.timing.transition_ms,
            "background": self.palette.background.to_hex(),
            "primary": self.palette.primary.to_hex(),
        })
    }

    fn param_schema(&self) -> Value {
        let timing = ExitTiming::default();
        json!({
            "trace_count": {
                "type": "integer",
                "default": DEFAULT_TRACE_COUNT,
                "min": 0,
                "max": 400,
                "description": "Number of radiating traces"
            },
            "particle_count": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_COUNT,
                "min": 0,
                "max": 1000,
                "description": "Number of particles traveling along the traces"
            },
            "min_duration_ms": {
                "type": "number",
                "default": timing.min_duration_ms,
                "min": 0.0,
                "max": 10000.0,
                "description": "Minimum time on screen before the exit can start"
            },
            "exit_delay_ms": {
                "type": "number",
                "default": timing.delay_ms,
                "min": 0.0,
                "max": 5000.0,
                "description": "Delay between reaching 100 and starting the exit"
            },
            "exit_transition_ms": {
                "type": "number",
                "default": timing.transition_ms,
                "min": 0.0,
                "max": 5000.0,
                "description": "Length of the exit transition before completion"
            },
            "background": {
                "type": "color",
                "default": "",
                "description": "CSS background color override"
            },
            "primary": {
                "type": "color",
                "default": "",
                "description": "CSS primary color override"
            }
        })
    }
}
