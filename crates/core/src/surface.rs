//! The drawing surface every animator renders through.
//!
//! [`Surface`] is a small immediate-mode subset of a 2d canvas: rectangles,
//! polylines, circles, arcs and a radial gradient, plus an optional glow
//! shadow. Coordinates are CSS pixels with y pointing down; angles are in
//! radians and increase clockwise on screen, as in a 2d canvas.
//!
//! Implementations in this crate are [`Recorder`] (captures [`DrawOp`]s for
//! assertions) and [`Raster`](crate::raster::Raster) (software rendering).

use glam::DVec2;

use crate::color::Rgba;
use crate::geometry::Size;

/// Line style for stroked shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

/// Glow applied to subsequent draw calls until replaced or cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub blur: f64,
    pub color: Rgba,
}

pub trait Surface {
    fn size(&self) -> Size;

    /// Fills the whole surface with `color`, or makes it fully transparent on `None`.
    fn clear(&mut self, color: Option<Rgba>);

    fn fill_rect(&mut self, origin: DVec2, extent: DVec2, color: Rgba);

    fn stroke_polyline(&mut self, points: &[DVec2], stroke: Stroke);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);

    /// Strokes the arc from `start` to `end` (radians, clockwise).
    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: Stroke);

    /// Fills the surface with a radial gradient from `inner` at `center`
    /// to `outer` at `radius` and beyond.
    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba);

    fn set_shadow(&mut self, shadow: Option<Shadow>);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Option<Rgba>),
    FillRect {
        origin: DVec2,
        extent: DVec2,
        color: Rgba,
    },
    Polyline {
        points: Vec<DVec2>,
        stroke: Stroke,
    },
    Circle {
        center: DVec2,
        radius: f64,
        color: Rgba,
    },
    Arc {
        center: DVec2,
        radius: f64,
        start: f64,
        end: f64,
        stroke: Stroke,
    },
    RadialGradient {
        center: DVec2,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    },
    Shadow(Option<Shadow>),
}

/// A surface that records draw calls instead of producing pixels.
#[derive(Debug, Clone)]
pub struct Recorder {
    size: Size,
    ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Returns the recorded ops and starts a fresh frame.
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }
}

impl Surface for Recorder {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Option<Rgba>) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, origin: DVec2, extent: DVec2, color: Rgba) {
        self.ops.push(DrawOp::FillRect {
            origin,
            extent,
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[DVec2], stroke: Stroke) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: Stroke) {
        self.ops.push(DrawOp::Arc {
            center,
            radius,
            start,
            end,
            stroke,
        });
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        self.ops.push(DrawOp::RadialGradient {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.ops.push(DrawOp::Shadow(shadow));
    }
}

/// A surface that discards every draw call.
///
/// Used to advance an animator headlessly, since theme interpolation runs
/// in the draw pass and must still happen once per frame.
#[derive(Debug, Clone, Copy)]
pub struct NullSurface {
    size: Size,
}

impl NullSurface {
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

impl Surface for NullSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, _color: Option<Rgba>) {}

    fn fill_rect(&mut self, _origin: DVec2, _extent: DVec2, _color: Rgba) {}

    fn stroke_polyline(&mut self, _points: &[DVec2], _stroke: Stroke) {}

    fn fill_circle(&mut self, _center: DVec2, _radius: f64, _color: Rgba) {}

    fn stroke_arc(&mut self, _center: DVec2, _radius: f64, _start: f64, _end: f64, _stroke: Stroke) {
    }

    fn fill_radial_gradient(&mut self, _center: DVec2, _radius: f64, _inner: Rgba, _outer: Rgba) {}

    fn set_shadow(&mut self, _shadow: Option<Shadow>) {}
}
