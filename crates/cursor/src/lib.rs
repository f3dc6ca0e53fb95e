#![deny(unsafe_code)]
//! Cursor follower: a dot pinned to the pointer and a ring that trails it.
//!
//! The ring closes a fixed fraction of the gap to the pointer every frame.
//! Both shapes grow or shrink while the pointer is over an interactive
//! element and shrink while a button is held.

use std::f64::consts::TAU;

use canvas_fx_core::params::{param_color, param_f64};
use canvas_fx_core::theme::ThemeReader;
use canvas_fx_core::{Animator, FrameTime, FxError, HostEvent, Size, Srgb, Stroke, Surface};
use glam::DVec2;
use serde_json::{json, Value};

const DEFAULT_FOLLOW_RATE: f64 = 0.4;

/// Pointer position before the first move, off-screen.
pub const OFFSCREEN: DVec2 = DVec2::new(-100.0, -100.0);

const RING_DIAMETER: f64 = 36.0;
const RING_DIAMETER_HOVER: f64 = 64.0;
const DOT_DIAMETER: f64 = 8.0;
const DOT_DIAMETER_HOVER: f64 = 6.0;
const RING_BORDER: f64 = 1.5;
const HOVER_FILL_ALPHA: f64 = 0.08;
const PRESSED_DOT_SCALE: f64 = 0.6;
const PRESSED_RING_SCALE: f64 = 0.85;

/// Rendered geometry for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorShape {
    pub dot_center: DVec2,
    pub dot_radius: f64,
    pub ring_center: DVec2,
    pub ring_radius: f64,
    /// Whether the ring gets a translucent fill.
    pub ring_filled: bool,
}

pub struct Cursor {
    size: Size,
    pointer: DVec2,
    ring: DVec2,
    follow_rate: f64,
    hovering: bool,
    pressed: bool,
    visible: bool,
    theme: ThemeReader,
    primary: Option<Srgb>,
}

impl Cursor {
    pub fn new(size: Size, theme: ThemeReader) -> Self {
        Self {
            size,
            pointer: OFFSCREEN,
            ring: OFFSCREEN,
            follow_rate: DEFAULT_FOLLOW_RATE,
            hovering: false,
            pressed: false,
            visible: false,
            theme,
            primary: None,
        }
    }

    /// `follow_rate` and an optional `primary` color override.
    pub fn from_json(size: Size, json_params: &Value, theme: ThemeReader) -> Self {
        Self {
            follow_rate: param_f64(json_params, "follow_rate", DEFAULT_FOLLOW_RATE),
            primary: param_color(json_params, "primary"),
            ..Self::new(size, theme)
        }
    }

    pub fn pointer(&self) -> DVec2 {
        self.pointer
    }

    pub fn ring_position(&self) -> DVec2 {
        self.ring
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn primary(&self) -> Srgb {
        self.primary.unwrap_or_else(|| {
            self.theme
                .pick(Srgb::from_rgb8(0xc0, 0xff, 0x40), Srgb::from_rgb8(0xa3, 0xd9, 0x44))
        })
    }

    pub fn shape(&self) -> CursorShape {
        let (ring_d, dot_d) = if self.hovering {
            (RING_DIAMETER_HOVER, DOT_DIAMETER_HOVER)
        } else {
            (RING_DIAMETER, DOT_DIAMETER)
        };
        let (ring_scale, dot_scale) = if self.pressed {
            (PRESSED_RING_SCALE, PRESSED_DOT_SCALE)
        } else {
            (1.0, 1.0)
        };
        CursorShape {
            dot_center: self.pointer,
            dot_radius: dot_d / 2.0 * dot_scale,
            ring_center: self.ring,
            ring_radius: ring_d / 2.0 * ring_scale,
            ring_filled: self.hovering,
        }
    }
}

impl Animator for Cursor {
    fn step(&mut self, _time: FrameTime) -> Result<(), FxError> {
        self.ring = self.ring.lerp(self.pointer, self.follow_rate);
        Ok(())
    }

    fn draw(&mut self, surface: &mut dyn Surface) {
        surface.clear(None);
        if !self.visible {
            return;
        }
        let primary = self.primary();
        let shape = self.shape();
        if shape.ring_filled {
            surface.fill_circle(
                shape.ring_center,
                shape.ring_radius,
                Srgb::from_rgb8(163, 217, 68).with_alpha(HOVER_FILL_ALPHA),
            );
        }
        surface.stroke_arc(
            shape.ring_center,
            shape.ring_radius,
            0.0,
            TAU,
            Stroke {
                color: primary.with_alpha(1.0),
                width: RING_BORDER,
            },
        );
        surface.fill_circle(shape.dot_center, shape.dot_radius, primary.with_alpha(1.0));
    }

    fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resize(size) => self.size = size,
            HostEvent::PointerMove(at) => {
                self.pointer = at;
                self.visible = true;
            }
            HostEvent::PointerLeave => self.visible = false,
            HostEvent::PointerDown => self.pressed = true,
            HostEvent::PointerUp => self.pressed = false,
            HostEvent::Hover(hovering) => self.hovering = hovering,
            HostEvent::DocumentComplete | HostEvent::WindowLoad => {}
        }
    }

    fn size(&self) -> Size {
        self.size
    }

    fn params(&self) -> Value {
        json!({
            "follow_rate": self.follow_rate,
            "primary": self.primary().to_hex(),
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "follow_rate": {
                "type": "number",
                "default": DEFAULT_FOLLOW_RATE,
                "min": 0.01,
                "max": 1.0,
                "description": "Fraction of the gap the ring closes per frame"
            },
            "primary": {
                "type": "color",
                "default": "",
                "description": "Cursor color; follows the theme when unset"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_fx_core::theme::ThemeSignal;
    use canvas_fx_core::{DrawOp, FrameClock, Recorder};

    fn cursor() -> Cursor {
        Cursor::new(Size::new(800.0, 600.0).unwrap(), ThemeReader::fixed(true))
    }

    fn run(c: &mut Cursor, frames: usize) {
        let mut clock = FrameClock::default();
        for _ in 0..frames {
            c.step(clock.tick()).unwrap();
        }
    }

    #[test]
    fn hidden_and_offscreen_until_first_move() {
        let mut c = cursor();
        assert!(!c.is_visible());
        assert_eq!(c.pointer(), OFFSCREEN);
        let mut rec = Recorder::new(c.size());
        c.draw(&mut rec);
        assert_eq!(rec.ops(), &[DrawOp::Clear(None)]);
        c.handle(HostEvent::PointerMove(DVec2::new(10.0, 20.0)));
        assert!(c.is_visible());
        c.handle(HostEvent::PointerLeave);
        assert!(!c.is_visible());
    }

    #[test]
    fn ring_closes_forty_percent_per_frame() {
        let mut c = cursor();
        c.handle(HostEvent::PointerMove(DVec2::new(0.0, 0.0)));
        run(&mut c, 1);
        assert!(c.ring_position().distance(DVec2::new(-60.0, -60.0)) < 1e-9);
        run(&mut c, 60);
        assert!(c.ring_position().length() < 1e-6);
    }

    #[test]
    fn hover_and_press_change_sizes() {
        let mut c = cursor();
        assert_eq!(c.shape().ring_radius, 18.0);
        assert_eq!(c.shape().dot_radius, 4.0);
        c.handle(HostEvent::Hover(true));
        assert_eq!(c.shape().ring_radius, 32.0);
        assert_eq!(c.shape().dot_radius, 3.0);
        assert!(c.shape().ring_filled);
        c.handle(HostEvent::PointerDown);
        assert!((c.shape().ring_radius - 32.0 * 0.85).abs() < 1e-12);
        assert!((c.shape().dot_radius - 1.8).abs() < 1e-12);
        c.handle(HostEvent::PointerUp);
        c.handle(HostEvent::Hover(false));
        assert_eq!(c.shape().ring_radius, 18.0);
        assert!(!c.is_pressed() && !c.is_hovering());
    }

    #[test]
    fn draw_follows_theme_primary() {
        let signal = ThemeSignal::new(true);
        let mut c = Cursor::new(Size::new(100.0, 100.0).unwrap(), signal.subscribe());
        c.handle(HostEvent::PointerMove(DVec2::new(50.0, 50.0)));
        let dot_color = |c: &mut Cursor| {
            let mut rec = Recorder::new(c.size());
            c.draw(&mut rec);
            rec.ops()
                .iter()
                .rev()
                .find_map(|op| match op {
                    DrawOp::Circle { color, .. } => Some(color.color.to_hex()),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(dot_color(&mut c), "#c0ff40");
        signal.set_dark(false);
        assert_eq!(dot_color(&mut c), "#a3d944");
    }

    #[test]
    fn from_json_overrides() {
        let c = Cursor::from_json(
            Size::new(100.0, 100.0).unwrap(),
            &json!({"follow_rate": 1.0, "primary": "#112233"}),
            ThemeReader::fixed(true),
        );
        let p = c.params();
        assert_eq!(p["follow_rate"], 1.0);
        assert_eq!(p["primary"], "#112233");
        for key in p.as_object().unwrap().keys() {
            assert!(c.param_schema().get(key).is_some());
        }
    }
}
