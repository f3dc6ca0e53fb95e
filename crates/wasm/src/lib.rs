#![deny(unsafe_code)]
//! Browser bindings: animators drawn onto a `CanvasRenderingContext2d`.
//!
//! JS owns the `requestAnimationFrame` loop and the DOM listeners. It
//! creates one [`Theme`] for the page, one [`CanvasFx`] per canvas, calls
//! [`CanvasFx::frame`] with the rAF timestamp and forwards resize, load and
//! pointer events. Dropping the view (`free()`) tears the animator down.

use canvas_fx_core::{
    Animator, FrameTime, FxError, HostEvent, Rgba, Shadow, Size, Stroke, Surface, ThemeSignal,
};
use canvas_fx_engines::AnimatorKind;
use canvas_fx_loader::Loader;
use glam::DVec2;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const NO_SHADOW: &str = "rgba(0, 0, 0, 0)";

fn to_js(err: FxError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Parses the params object handed over from JS. An empty string means
/// "all defaults".
fn parse_params(json: &str) -> Result<Value, FxError> {
    if json.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(json).map_err(|e| FxError::InvalidParams(e.to_string()))
}

/// Runs a callback through `defer`, or through `run_now` when deferring is
/// unavailable. A failure of the immediate run goes to `report`.
fn deliver<E>(
    defer: impl FnOnce() -> Result<(), E>,
    run_now: impl FnOnce() -> Result<(), E>,
    report: impl FnOnce(E),
) {
    if defer().is_ok() {
        return;
    }
    if let Err(err) = run_now() {
        report(err);
    }
}

/// Hands the completion callback to a fresh task, so a host that frees the
/// view from inside it never re-enters a view that is mid-`frame`.
fn notify_complete(callback: &js_sys::Function) {
    deliver(
        || match web_sys::window() {
            Some(window) => window.set_timeout_with_callback(callback).map(drop),
            None => Err(JsValue::UNDEFINED),
        },
        || callback.call0(&JsValue::NULL).map(drop),
        |err| web_sys::console::error_1(&err),
    );
}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}

/// [`Surface`] over a 2d canvas context, in CSS pixels.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Size,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, size: Size) -> Result<Self, FxError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| FxError::SurfaceUnavailable(format!("{e:?}")))?
            .ok_or_else(|| FxError::SurfaceUnavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FxError::SurfaceUnavailable("not a 2d context".into()))?;
        let mut surface = Self { canvas, ctx, size };
        surface.resize(size);
        Ok(surface)
    }

    /// Sizes the backing store to physical pixels and scales the context
    /// so drawing stays in CSS pixels.
    pub fn resize(&mut self, size: Size) {
        let dpr = device_pixel_ratio();
        self.canvas.set_width((size.width * dpr) as u32);
        self.canvas.set_height((size.height * dpr) as u32);
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
        self.size = size;
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Option<Rgba>) {
        let (w, h) = (self.size.width, self.size.height);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if let Some(color) = color {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn fill_rect(&mut self, origin: DVec2, extent: DVec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(origin.x, origin.y, extent.x, extent.y);
    }

    fn stroke_polyline(&mut self, points: &[DVec2], stroke: Stroke) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .ok();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: Stroke) {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, start, end).ok();
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_stroke_style_str(&stroke.color.to_css());
        self.ctx.stroke();
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
        else {
            return;
        };
        gradient.add_color_stop(0.0, &inner.to_css()).ok();
        gradient.add_color_stop(1.0, &outer.to_css()).ok();
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx
            .fill_rect(0.0, 0.0, self.size.width, self.size.height);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        match shadow {
            Some(s) => {
                self.ctx.set_shadow_blur(s.blur);
                self.ctx.set_shadow_color(&s.color.to_css());
            }
            None => {
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_shadow_color(NO_SHADOW);
            }
        }
    }
}

/// Page-wide light/dark mode. Every view created with the same handle
/// follows its changes.
#[wasm_bindgen]
pub struct Theme {
    signal: ThemeSignal,
}

#[wasm_bindgen]
impl Theme {
    #[wasm_bindgen(constructor)]
    pub fn new(dark: bool) -> Theme {
        Theme {
            signal: ThemeSignal::new(dark),
        }
    }

    pub fn set_dark(&self, dark: bool) {
        self.signal.set_dark(dark);
    }

    /// Flips the mode and returns the new `is_dark`.
    pub fn toggle(&self) -> bool {
        self.signal.toggle()
    }

    pub fn is_dark(&self) -> bool {
        self.signal.is_dark()
    }
}

/// One animator bound to one canvas.
#[wasm_bindgen]
pub struct CanvasFx {
    animator: AnimatorKind,
    surface: CanvasSurface,
    next_index: u64,
}

#[wasm_bindgen]
impl CanvasFx {
    /// Binds the animator named `name` (`trace-field`, `hero`, `loader`,
    /// `cursor`) to `canvas`, sized to the canvas' client box.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        name: &str,
        seed: u32,
        params_json: &str,
        theme: &Theme,
    ) -> Result<CanvasFx, JsValue> {
        let size = client_size(&canvas).map_err(to_js)?;
        let params = parse_params(params_json).map_err(to_js)?;
        let animator =
            AnimatorKind::from_name(name, size, u64::from(seed), &params, theme.signal.subscribe())
                .map_err(to_js)?;
        Self::bind(canvas, size, animator).map_err(to_js)
    }

    /// Loading screen whose `on_complete` runs once, after the exit
    /// transition has finished.
    pub fn loader(
        canvas: HtmlCanvasElement,
        seed: u32,
        params_json: &str,
        theme: &Theme,
        on_complete: js_sys::Function,
    ) -> Result<CanvasFx, JsValue> {
        let size = client_size(&canvas).map_err(to_js)?;
        let params = parse_params(params_json).map_err(to_js)?;
        let loader = Loader::from_json(size, u64::from(seed), &params, &theme.signal.subscribe())
            .on_complete(move || notify_complete(&on_complete));
        Self::bind(canvas, size, AnimatorKind::Loader(loader)).map_err(to_js)
    }

    pub fn name(&self) -> String {
        self.animator.name().to_string()
    }

    /// Steps and draws one frame. `now_ms` is the rAF timestamp.
    pub fn frame(&mut self, now_ms: f64) -> Result<(), JsValue> {
        let time = FrameTime {
            index: self.next_index,
            now_ms,
        };
        self.next_index += 1;
        self.animator.frame(time, &mut self.surface).map_err(to_js)
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        let size = Size::new(width, height).map_err(to_js)?;
        self.surface.resize(size);
        self.animator.handle(HostEvent::Resize(size));
        Ok(())
    }

    pub fn document_complete(&mut self) {
        self.animator.handle(HostEvent::DocumentComplete);
    }

    pub fn window_load(&mut self) {
        self.animator.handle(HostEvent::WindowLoad);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.animator.handle(HostEvent::PointerMove(DVec2::new(x, y)));
    }

    pub fn pointer_leave(&mut self) {
        self.animator.handle(HostEvent::PointerLeave);
    }

    pub fn pointer_down(&mut self) {
        self.animator.handle(HostEvent::PointerDown);
    }

    pub fn pointer_up(&mut self) {
        self.animator.handle(HostEvent::PointerUp);
    }

    pub fn hover(&mut self, hovering: bool) {
        self.animator.handle(HostEvent::Hover(hovering));
    }

    /// Current params as a JSON string.
    pub fn params(&self) -> String {
        self.animator.params().to_string()
    }

    /// Headline state as a JSON string; for the loader this carries the
    /// displayed percentage and phase.
    pub fn summary(&self) -> String {
        self.animator.summary().to_string()
    }

    /// Overlay style for the loader's exit transition, as JSON
    /// (`opacity`, `scale`, `blur_px`, `pointer_events`, `transition_ms`).
    /// `undefined` for other animators.
    pub fn exit_style(&self) -> Option<String> {
        let AnimatorKind::Loader(loader) = &self.animator else {
            return None;
        };
        let style = loader.exit_style();
        Some(
            serde_json::json!({
                "opacity": style.opacity,
                "scale": style.scale,
                "blur_px": style.blur_px,
                "pointer_events": style.pointer_events,
                "transition_ms": loader.timing().transition_ms,
            })
            .to_string(),
        )
    }
}

impl CanvasFx {
    fn bind(
        canvas: HtmlCanvasElement,
        size: Size,
        animator: AnimatorKind,
    ) -> Result<CanvasFx, FxError> {
        Ok(CanvasFx {
            animator,
            surface: CanvasSurface::new(canvas, size)?,
            next_index: 0,
        })
    }
}

fn client_size(canvas: &HtmlCanvasElement) -> Result<Size, FxError> {
    Size::new(
        f64::from(canvas.client_width()),
        f64::from(canvas.client_height()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_are_defaults() {
        assert_eq!(parse_params("").unwrap(), serde_json::json!({}));
        assert_eq!(parse_params("  ").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn params_parse_objects() {
        let v = parse_params(r#"{"particle_count": 12}"#).unwrap();
        assert_eq!(v["particle_count"], 12);
    }

    #[test]
    fn deferred_delivery_skips_immediate_run() {
        let ran_now = std::cell::Cell::new(false);
        deliver(
            || Ok::<(), String>(()),
            || {
                ran_now.set(true);
                Ok(())
            },
            |_| panic!("nothing to report"),
        );
        assert!(!ran_now.get());
    }

    #[test]
    fn falls_back_to_immediate_run_and_reports_failure() {
        let reported = std::cell::RefCell::new(None);
        deliver(
            || Err("no window".to_string()),
            || Err("callback threw".to_string()),
            |err| *reported.borrow_mut() = Some(err),
        );
        assert_eq!(reported.borrow().as_deref(), Some("callback threw"));
    }

    #[test]
    fn immediate_success_reports_nothing() {
        let ran_now = std::cell::Cell::new(false);
        deliver(
            || Err("no window".to_string()),
            || {
                ran_now.set(true);
                Ok(())
            },
            |_| panic!("nothing to report"),
        );
        assert!(ran_now.get());
    }

    #[test]
    fn malformed_params_error() {
        assert!(parse_params("{particle_count").is_err());
    }
}
