#![deny(unsafe_code)]
//! Animator registry: maps animator names to implementations and provides
//! CPU-side snapshot rendering.
//!
//! This crate sits between `canvas-fx-core` (which defines the `Animator`
//! trait) and the individual animator crates. Both the CLI and the WASM
//! bindings depend on it so name-based dispatch lives in one place.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

use canvas_fx_core::theme::ThemeReader;
use canvas_fx_core::{Animator, FrameTime, FxError, HostEvent, Seed, Size, Surface};
use serde_json::{json, Value};

const ANIMATOR_NAMES: &[&str] = &["trace-field", "hero", "loader", "cursor"];

/// Every available animator, delegating the [`Animator`] trait.
///
/// Use [`AnimatorKind::from_name`] for string-based construction.
pub enum AnimatorKind {
    /// Full-viewport grid tracers.
    TraceField(canvas_fx_trace_field::TraceField),
    /// Wrapping particles with proximity connections.
    Hero(canvas_fx_hero::HeroField),
    /// One-shot loading screen.
    Loader(canvas_fx_loader::Loader),
    /// Pointer dot and trailing ring.
    Cursor(canvas_fx_cursor::Cursor),
}

impl AnimatorKind {
    /// Constructs an animator by name.
    ///
    /// Returns `FxError::UnknownAnimator` if the name is not recognized.
    pub fn from_name(
        name: &str,
        size: Size,
        seed: u64,
        params: &Value,
        theme: ThemeReader,
    ) -> Result<Self, FxError> {
        match name {
            "trace-field" => Ok(AnimatorKind::TraceField(
                canvas_fx_trace_field::TraceField::from_json(size, seed, params, theme),
            )),
            "hero" => Ok(AnimatorKind::Hero(canvas_fx_hero::HeroField::from_json(
                size, seed, params, theme,
            ))),
            "loader" => Ok(AnimatorKind::Loader(canvas_fx_loader::Loader::from_json(
                size, seed, params, &theme,
            ))),
            "cursor" => Ok(AnimatorKind::Cursor(canvas_fx_cursor::Cursor::from_json(
                size, params, theme,
            ))),
            _ => Err(FxError::UnknownAnimator(name.to_string())),
        }
    }

    /// Constructs the animator a [`Seed`] describes.
    pub fn from_seed(seed: &Seed, theme: ThemeReader) -> Result<Self, FxError> {
        Self::from_name(&seed.animator, seed.size()?, seed.seed, &seed.params, theme)
    }

    pub fn list_animators() -> &'static [&'static str] {
        ANIMATOR_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimatorKind::TraceField(_) => "trace-field",
            AnimatorKind::Hero(_) => "hero",
            AnimatorKind::Loader(_) => "loader",
            AnimatorKind::Cursor(_) => "cursor",
        }
    }

    /// Headline state for headless runs, as a JSON object.
    pub fn summary(&self) -> Value {
        match self {
            AnimatorKind::TraceField(a) => json!({
                "tracers": a.tracers().len(),
                "growing": a.growing_count(),
            }),
            AnimatorKind::Hero(a) => json!({
                "particles": a.particles().len(),
                "theme_factor": a.theme_factor(),
            }),
            AnimatorKind::Loader(a) => json!({
                "progress": a.progress(),
                "displayed_percent": a.displayed_percent(),
                "phase": a.phase().name(),
                "done": a.is_done(),
            }),
            AnimatorKind::Cursor(a) => json!({
                "visible": a.is_visible(),
                "ring": [a.ring_position().x, a.ring_position().y],
            }),
        }
    }

    fn inner(&self) -> &dyn Animator {
        match self {
            AnimatorKind::TraceField(a) => a,
            AnimatorKind::Hero(a) => a,
            AnimatorKind::Loader(a) => a,
            AnimatorKind::Cursor(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Animator {
        match self {
            AnimatorKind::TraceField(a) => a,
            AnimatorKind::Hero(a) => a,
            AnimatorKind::Loader(a) => a,
            AnimatorKind::Cursor(a) => a,
        }
    }
}

impl Animator for AnimatorKind {
    fn step(&mut self, time: FrameTime) -> Result<(), FxError> {
        self.inner_mut().step(time)
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        self.inner_mut().draw(surface);
    }

    fn handle(&mut self, event: HostEvent) {
        self.inner_mut().handle(event);
    }

    fn size(&self) -> Size {
        self.inner().size()
    }

    fn params(&self) -> Value {
        self.inner().params()
    }

    fn param_schema(&self) -> Value {
        self.inner().param_schema()
    }
}
