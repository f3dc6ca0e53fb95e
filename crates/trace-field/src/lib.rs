#![deny(unsafe_code)]
//! Background trace field.
//!
//! A fixed pool of [`Tracer`]s walks an invisible square grid across the
//! full viewport. Each tracer grows a polyline from an edge, turning at
//! random grid points, then fades out and respawns at a new edge position.
//! Line, node and background colors follow the injected theme signal
//! through per-frame interpolation, so a theme toggle cross-fades instead
//! of snapping.

pub mod tracer;

use canvas_fx_core::params::{param_f64, param_usize};
use canvas_fx_core::prng::Xorshift64;
use canvas_fx_core::theme::{Smoothed, ThemeReader, THEME_LERP_RATE};
use canvas_fx_core::{Animator, FrameTime, FxError, HostEvent, Shadow, Size, Srgb, Stroke, Surface};
use serde_json::{json, Value};

pub use tracer::{step, StepOutcome, Tracer, TracerState};

const DEFAULT_TRACER_COUNT: usize = 15;
const DEFAULT_GRID_SIZE: f64 = 30.0;
const DEFAULT_MAX_GRID_STEPS: usize = 50;
const DEFAULT_MOVEMENT_SPEED: f64 = 1.7;
const DEFAULT_TURN_CHANCE: f64 = 0.2;
const DEFAULT_FADE_STEP: f64 = 0.02;

const LINE_WIDTH: f64 = 1.5;
const NODE_RADIUS: f64 = 1.5;
const LINE_ALPHA: f64 = 0.3;
const NODE_ALPHA: f64 = 0.25;
const GLOW_BLUR: f64 = 3.0;
const GLOW_ALPHA: f64 = 0.4;

/// Global opacity multiplier per mode; light backgrounds need fainter lines.
const OPACITY_DARK: f64 = 1.0;
const OPACITY_LIGHT: f64 = 0.5;

/// Colors for one theme mode.
#[derive(Debug, Clone, Copy)]
struct ThemeColors {
    background: Srgb,
    line: Srgb,
    node: Srgb,
    opacity: f64,
}

impl ThemeColors {
    fn dark() -> Self {
        Self {
            background: Srgb::from_rgb8(5, 5, 5),
            line: Srgb::from_rgb8(50, 100, 50),
            node: Srgb::from_rgb8(60, 120, 60),
            opacity: OPACITY_DARK,
        }
    }

    fn light() -> Self {
        Self {
            background: Srgb::from_rgb8(249, 250, 251),
            line: Srgb::from_rgb8(34, 120, 60),
            node: Srgb::from_rgb8(34, 120, 60),
            opacity: OPACITY_LIGHT,
        }
    }

    fn for_theme(theme: &ThemeReader) -> Self {
        if theme.is_dark() {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Interpolated colors, advanced once per drawn frame.
#[derive(Debug, Clone, Copy)]
struct ThemeState {
    background: Smoothed<Srgb>,
    line: Smoothed<Srgb>,
    node: Smoothed<Srgb>,
    opacity: Smoothed<f64>,
}

impl ThemeState {
    fn new(start: ThemeColors) -> Self {
        Self {
            background: Smoothed::new(start.background, THEME_LERP_RATE),
            line: Smoothed::new(start.line, THEME_LERP_RATE),
            node: Smoothed::new(start.node, THEME_LERP_RATE),
            opacity: Smoothed::new(start.opacity, THEME_LERP_RATE),
        }
    }

    fn approach(&mut self, target: ThemeColors) -> ThemeColors {
        ThemeColors {
            background: self.background.approach(target.background),
            line: self.line.approach(target.line),
            node: self.node.approach(target.node),
            opacity: self.opacity.approach(target.opacity),
        }
    }
}

/// Tunable constants of the trace field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceFieldParams {
    /// Number of tracers in the pool.
    pub tracer_count: usize,
    /// Grid cell size in pixels.
    pub grid_size: f64,
    /// Grid steps after which a tracer starts fading.
    pub max_grid_steps: usize,
    /// Pixels moved per frame.
    pub movement_speed: f64,
    /// Probability of a 90 degree turn at each grid point.
    pub turn_chance: f64,
    /// Opacity lost per frame while fading.
    pub fade_step: f64,
}

impl Default for TraceFieldParams {
    fn default() -> Self {
        Self {
            tracer_count: DEFAULT_TRACER_COUNT,
            grid_size: DEFAULT_GRID_SIZE,
            max_grid_steps: DEFAULT_MAX_GRID_STEPS,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            turn_chance: DEFAULT_TURN_CHANCE,
            fade_step: DEFAULT_FADE_STEP,
        }
    }
}

impl TraceFieldParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            tracer_count: param_usize(params, "tracer_count", DEFAULT_TRACER_COUNT),
            grid_size: param_f64(params, "grid_size", DEFAULT_GRID_SIZE),
            max_grid_steps: param_usize(params, "max_grid_steps", DEFAULT_MAX_GRID_STEPS),
            movement_speed: param_f64(params, "movement_speed", DEFAULT_MOVEMENT_SPEED),
            turn_chance: param_f64(params, "turn_chance", DEFAULT_TURN_CHANCE),
            fade_step: param_f64(params, "fade_step", DEFAULT_FADE_STEP),
        }
    }
}

/// Full-viewport animation of grid-walking tracers.
pub struct TraceField {
    size: Size,
    params: TraceFieldParams,
    tracers: Vec<Tracer>,
    rng: Xorshift64,
    theme: ThemeReader,
    colors: ThemeState,
}

impl TraceField {
    /// Creates a trace field covering `size` with a fresh tracer pool.
    ///
    /// Colors start at the values for the theme's current mode.
    pub fn new(size: Size, seed: u64, params: TraceFieldParams, theme: ThemeReader) -> Self {
        let mut rng = Xorshift64::new(seed);
        let tracers = build_pool(size, &params, &mut rng);
        let colors = ThemeState::new(ThemeColors::for_theme(&theme));
        Self {
            size,
            params,
            tracers,
            rng,
            theme,
            colors,
        }
    }

    pub fn from_json(size: Size, seed: u64, json_params: &Value, theme: ThemeReader) -> Self {
        Self::new(size, seed, TraceFieldParams::from_json(json_params), theme)
    }

    pub fn tracers(&self) -> &[Tracer] {
        &self.tracers
    }

    pub fn growing_count(&self) -> usize {
        self.tracers.iter().filter(|t| t.is_growing()).count()
    }

    /// Rebuilds the whole pool for a new viewport size.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.tracers = build_pool(size, &self.params, &mut self.rng);
        log::debug!(
            "trace field rebuilt: {} tracers at {}x{}",
            self.tracers.len(),
            size.width,
            size.height
        );
    }
}

/// Spawns a complete pool. Initial step counts are randomized so the pool
/// does not start fading in lock-step.
fn build_pool(size: Size, params: &TraceFieldParams, rng: &mut Xorshift64) -> Vec<Tracer> {
    (0..params.tracer_count)
        .map(|_| {
            let mut tracer = Tracer::spawn(size, params.grid_size, rng);
            tracer.set_grid_steps(rng.next_usize(params.max_grid_steps.max(1)));
            tracer
        })
        .collect()
}

impl Animator for TraceField {
    fn step(&mut self, _time: FrameTime) -> Result<(), FxError> {
        for tracer in &mut self.tracers {
            step(tracer, self.size, &self.params, &mut self.rng);
        }
        Ok(())
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let colors = self.colors.approach(ThemeColors::for_theme(&self.theme));

        surface.clear(Some(colors.background.with_alpha(1.0)));
        surface.set_shadow(Some(Shadow {
            blur: GLOW_BLUR,
            color: colors.line.with_alpha(GLOW_ALPHA),
        }));

        for tracer in &self.tracers {
            if tracer.history().is_empty() {
                continue;
            }
            let line_alpha = tracer.opacity() * LINE_ALPHA * colors.opacity;
            surface.stroke_polyline(
                &tracer.line_points(),
                Stroke {
                    color: colors.line.with_alpha(line_alpha),
                    width: LINE_WIDTH,
                },
            );

            let node_color = colors
                .node
                .with_alpha(tracer.opacity() * NODE_ALPHA * colors.opacity);
            for node in tracer.nodes() {
                surface.fill_circle(node, NODE_RADIUS, node_color);
            }
            if tracer.is_growing() {
                surface.fill_circle(tracer.position(), NODE_RADIUS, node_color);
            }
        }

        surface.set_shadow(None);
    }

    fn handle(&mut self, event: HostEvent) {
        if let HostEvent::Resize(size) = event {
            self.resize(size);
        }
    }

    fn size(&self) -> Size {
        self.size
    }

    fn params(&self) -> Value {
        json!({
            "tracer_count": self.params.tracer_count,
            "grid_size": self.params.grid_size,
            "max_grid_steps": self.params.max_grid_steps,
            "movement_speed": self.params.movement_speed,
            "turn_chance": self.params.turn_chance,
            "fade_step": self.params.fade_step,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "tracer_count": {
                "type": "integer",
                "default": DEFAULT_TRACER_COUNT,
                "min": 0,
                "max": 200,
                "description": "Number of tracers in the pool"
            },
            "grid_size": {
                "type": "number",
                "default": DEFAULT_GRID_SIZE,
                "min": 4.0,
                "max": 200.0,
                "description": "Grid cell size in pixels"
            },
            "max_grid_steps": {
                "type": "integer",
                "default": DEFAULT_MAX_GRID_STEPS,
                "min": 1,
                "max": 1000,
                "description": "Grid steps before a tracer starts fading"
            },
            "movement_speed": {
                "type": "number",
                "default": DEFAULT_MOVEMENT_SPEED,
                "min": 0.1,
                "max": 30.0,
                "description": "Pixels moved per frame"
            },
            "turn_chance": {
                "type": "number",
                "default": DEFAULT_TURN_CHANCE,
                "min": 0.0,
                "max": 1.0,
                "description": "Probability of a 90 degree turn at each grid point"
            },
            "fade_step": {
                "type": "number",
                "default": DEFAULT_FADE_STEP,
                "min": 0.001,
                "max": 1.0,
                "description": "Opacity lost per frame while fading"
            }
        })
    }
}
