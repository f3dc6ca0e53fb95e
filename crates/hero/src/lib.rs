#![deny(unsafe_code)]
//! Hero particle field.
//!
//! A pool of slow particles drifting inside the hero container with
//! toroidal wraparound. Nearby pairs are joined by lines that fade with
//! distance, and a radial glow sits at the container center. Colors,
//! alphas and glow blur follow a smoothed theme factor: `1.0` in dark mode,
//! `0.0` in light mode.

pub mod particle;

use canvas_fx_core::color::hsl_to_srgb;
use canvas_fx_core::params::{param_f64, param_usize};
use canvas_fx_core::prng::Xorshift64;
use canvas_fx_core::theme::{Smoothed, ThemeReader, THEME_LERP_RATE};
use canvas_fx_core::{
    Animator, FrameTime, FxError, HostEvent, Rgba, Shadow, Size, Srgb, Stroke, Surface,
};
use serde_json::{json, Value};

pub use particle::{connection_alpha, step, Particle};

const DEFAULT_PARTICLE_COUNT: usize = 60;
const DEFAULT_CONNECTION_DISTANCE: f64 = 80.0;

const CONNECTION_WIDTH: f64 = 0.5;
const GLOW_RADIUS_FACTOR: f64 = 0.6;
const GLOW_SATURATION: f64 = 100.0;
const GLOW_LIGHTNESS: f64 = 70.0;
const GLOW_ALPHA: f64 = 0.6;

fn lerp(light: f64, dark: f64, f: f64) -> f64 {
    light + (dark - light) * f
}

/// Values derived from the theme factor for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroStyle {
    pub glow_color: Srgb,
    pub glow_alpha: f64,
    pub connection_color: Srgb,
    pub connection_max_alpha: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha_scale: f64,
    pub particle_blur: f64,
}

impl HeroStyle {
    /// Style at theme factor `f` (`0` light, `1` dark).
    pub fn at(f: f64) -> Self {
        let f = f.clamp(0.0, 1.0);
        let glow_color = Srgb::from_rgb8(65, 105, 50).lerp(Srgb::from_rgb8(192, 255, 64), f);
        Self {
            glow_color,
            glow_alpha: lerp(0.02, 0.04, f),
            connection_color: glow_color,
            connection_max_alpha: lerp(0.12, 0.15, f),
            saturation: lerp(100.0, 90.0, f),
            lightness: lerp(25.0, 75.0, f),
            alpha_scale: lerp(0.8, 1.0, f),
            particle_blur: lerp(0.0, 4.0, f),
        }
    }

    fn particle_color(&self, p: &Particle) -> Rgba {
        hsl_to_srgb(p.hue, self.saturation, self.lightness).with_alpha(p.alpha * self.alpha_scale)
    }

    /// Glow around a particle: same hue, brighter and fainter than the fill.
    pub fn particle_glow(&self, p: &Particle) -> Rgba {
        hsl_to_srgb(p.hue, GLOW_SATURATION, GLOW_LIGHTNESS)
            .with_alpha(p.alpha * self.alpha_scale * GLOW_ALPHA)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroParams {
    pub particle_count: usize,
    /// Distance below which two particles are connected.
    pub connection_distance: f64,
}

impl Default for HeroParams {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
        }
    }
}

impl HeroParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            particle_count: param_usize(params, "particle_count", DEFAULT_PARTICLE_COUNT),
            connection_distance: param_f64(
                params,
                "connection_distance",
                DEFAULT_CONNECTION_DISTANCE,
            ),
        }
    }
}

pub struct HeroField {
    size: Size,
    params: HeroParams,
    particles: Vec<Particle>,
    rng: Xorshift64,
    theme: ThemeReader,
    factor: Smoothed<f64>,
}

impl HeroField {
    pub fn new(size: Size, seed: u64, params: HeroParams, theme: ThemeReader) -> Self {
        let mut rng = Xorshift64::new(seed);
        let particles = build_pool(size, &params, &mut rng);
        let factor = Smoothed::new(theme_target(&theme), THEME_LERP_RATE);
        Self {
            size,
            params,
            particles,
            rng,
            theme,
            factor,
        }
    }

    pub fn from_json(size: Size, seed: u64, json_params: &Value, theme: ThemeReader) -> Self {
        Self::new(size, seed, HeroParams::from_json(json_params), theme)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Current smoothed theme factor.
    pub fn theme_factor(&self) -> f64 {
        self.factor.get()
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.particles = build_pool(size, &self.params, &mut self.rng);
        log::debug!(
            "hero field rebuilt: {} particles at {}x{}",
            self.particles.len(),
            size.width,
            size.height
        );
    }

    /// Every unordered pair closer than the connection distance, with the
    /// alpha its line is drawn at.
    pub fn connections(&self, max_alpha: f64) -> Vec<(usize, usize, f64)> {
        let threshold = self.params.connection_distance;
        let mut pairs = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let d2 = a.position.distance_squared(b.position);
                if d2 < threshold * threshold {
                    pairs.push((i, j, connection_alpha(d2.sqrt(), threshold, max_alpha)));
                }
            }
        }
        pairs
    }
}

fn theme_target(theme: &ThemeReader) -> f64 {
    theme.pick(1.0, 0.0)
}

fn build_pool(size: Size, params: &HeroParams, rng: &mut Xorshift64) -> Vec<Particle> {
    (0..params.particle_count)
        .map(|_| Particle::random(size, rng))
        .collect()
}

impl Animator for HeroField {
    fn step(&mut self, _time: FrameTime) -> Result<(), FxError> {
        for particle in &mut self.particles {
            *particle = step(*particle, self.size);
        }
        Ok(())
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        let style = HeroStyle::at(self.factor.approach(theme_target(&self.theme)));

        surface.clear(None);

        surface.fill_radial_gradient(
            self.size.center(),
            self.size.min_side() * GLOW_RADIUS_FACTOR,
            style.glow_color.with_alpha(style.glow_alpha),
            style.glow_color.with_alpha(0.0),
        );

        for (i, j, alpha) in self.connections(style.connection_max_alpha) {
            surface.stroke_polyline(
                &[self.particles[i].position, self.particles[j].position],
                Stroke {
                    color: style.connection_color.with_alpha(alpha),
                    width: CONNECTION_WIDTH,
                },
            );
        }

        let glow = style.particle_blur > 0.1;
        for particle in &self.particles {
            if glow {
                surface.set_shadow(Some(Shadow {
                    blur: style.particle_blur,
                    color: style.particle_glow(particle),
                }));
            }
            surface.fill_circle(particle.position, particle.radius, style.particle_color(particle));
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
            "particle_count": self.params.particle_count,
            "connection_distance": self.params.connection_distance,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "particle_count": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_COUNT,
                "min": 0,
                "max": 500,
                "description": "Number of particles"
            },
            "connection_distance": {
                "type": "number",
                "default": DEFAULT_CONNECTION_DISTANCE,
                "min": 1.0,
                "max": 400.0,
                "description": "Distance below which two particles are joined by a line"
            }
        })
    }
}
