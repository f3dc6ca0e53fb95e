//! Software implementation of [`Surface`].
//!
//! Pixels are stored as straight-alpha RGBA `f32` and composed with
//! source-over blending. Edges get one pixel of coverage falloff. Shadows
//! are accepted and ignored, so snapshots show shapes without glow.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::color::{Rgba, Srgb};
use crate::error::FxError;
use crate::geometry::Size;
use crate::surface::{Shadow, Stroke, Surface};

/// An RGBA pixel buffer that animators can draw into.
#[derive(Debug, Clone)]
pub struct Raster {
    size: Size,
    width: usize,
    height: usize,
    pixels: Vec<[f32; 4]>,
}

impl Raster {
    /// Creates a fully transparent raster covering `size`, rounded up to whole pixels.
    pub fn new(size: Size) -> Result<Self, FxError> {
        let width = size.width.ceil() as usize;
        let height = size.height.ceil() as usize;
        let len = width
            .checked_mul(height)
            .ok_or(FxError::InvalidDimensions {
                width: size.width,
                height: size.height,
            })?;
        Ok(Self {
            size,
            width,
            height,
            pixels: vec![[0.0; 4]; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads back one pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = self.pixels[y * self.width + x];
        Some(Rgba {
            color: Srgb {
                r: r as f64,
                g: g as f64,
                b: b as f64,
            },
            a: a as f64,
        })
    }

    /// Row-major RGBA8 bytes, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }

    /// Blends `color` into one pixel with the given coverage in [0, 1].
    fn blend(&mut self, x: usize, y: usize, color: Rgba, coverage: f64) {
        let sa = (color.a * coverage) as f32;
        if sa <= 0.0 {
            return;
        }
        let px = &mut self.pixels[y * self.width + x];
        let da = px[3];
        let out_a = sa + da * (1.0 - sa);
        let src = [color.color.r as f32, color.color.g as f32, color.color.b as f32];
        for (i, s) in src.iter().enumerate() {
            px[i] = (s * sa + px[i] * da * (1.0 - sa)) / out_a;
        }
        px[3] = out_a;
    }

    /// Visits every pixel whose center lies in the box `[min, max]`, clipped
    /// to the buffer, passing the pixel center.
    fn for_each_in_box(&mut self, min: DVec2, max: DVec2, mut f: impl FnMut(&mut Self, usize, usize, DVec2)) {
        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                f(self, x, y, center);
            }
        }
    }

    fn stroke_segment(&mut self, a: DVec2, b: DVec2, stroke: Stroke) {
        let half = (stroke.width / 2.0).max(0.5);
        let pad = DVec2::splat(half + 1.0);
        self.for_each_in_box(a.min(b) - pad, a.max(b) + pad, |r, x, y, p| {
            let coverage = (half + 0.5 - distance_to_segment(p, a, b)).clamp(0.0, 1.0);
            r.blend(x, y, stroke.color, coverage);
        });
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// True if `angle` lies on the clockwise sweep from `start` to `end`.
fn in_sweep(angle: f64, start: f64, end: f64) -> bool {
    let sweep = end - start;
    if sweep <= 0.0 {
        return false;
    }
    if sweep >= TAU {
        return true;
    }
    (angle - start).rem_euclid(TAU) <= sweep
}

impl Surface for Raster {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Option<Rgba>) {
        let fill = match color {
            Some(c) => [c.color.r as f32, c.color.g as f32, c.color.b as f32, c.a as f32],
            None => [0.0; 4],
        };
        self.pixels.fill(fill);
    }

    fn fill_rect(&mut self, origin: DVec2, extent: DVec2, color: Rgba) {
        let a = origin;
        let b = origin + extent;
        let (min, max) = (a.min(b), a.max(b));
        self.for_each_in_box(min, max, |r, x, y, p| {
            if p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y {
                r.blend(x, y, color, 1.0);
            }
        });
    }

    fn stroke_polyline(&mut self, points: &[DVec2], stroke: Stroke) {
        match points {
            [] => {}
            [single] => self.stroke_segment(*single, *single, stroke),
            _ => {
                for pair in points.windows(2) {
                    self.stroke_segment(pair[0], pair[1], stroke);
                }
            }
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba) {
        let pad = DVec2::splat(radius + 1.0);
        self.for_each_in_box(center - pad, center + pad, |r, x, y, p| {
            let coverage = (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0);
            r.blend(x, y, color, coverage);
        });
    }

    fn stroke_arc(&mut self, center: DVec2, radius: f64, start: f64, end: f64, stroke: Stroke) {
        let half = (stroke.width / 2.0).max(0.5);
        let pad = DVec2::splat(radius + half + 1.0);
        self.for_each_in_box(center - pad, center + pad, |r, x, y, p| {
            let d = p - center;
            if !in_sweep(d.y.atan2(d.x), start, end) {
                return;
            }
            let coverage = (half + 0.5 - (d.length() - radius).abs()).clamp(0.0, 1.0);
            r.blend(x, y, stroke.color, coverage);
        });
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        let max = DVec2::new(self.width as f64, self.height as f64);
        self.for_each_in_box(DVec2::ZERO, max, |r, x, y, p| {
            let t = if radius > 0.0 {
                (p.distance(center) / radius).clamp(0.0, 1.0)
            } else {
                1.0
            };
            // Interpolate premultiplied, so a transparent stop does not darken the ramp.
            let a = inner.a + (outer.a - inner.a) * t;
            if a <= 0.0 {
                return;
            }
            let mix = |i: f64, o: f64| (i * inner.a * (1.0 - t) + o * outer.a * t) / a;
            let color = Srgb {
                r: mix(inner.color.r, outer.color.r),
                g: mix(inner.color.g, outer.color.g),
                b: mix(inner.color.b, outer.color.b),
            };
            r.blend(x, y, Rgba { color, a }, 1.0);
        });
    }

    fn set_shadow(&mut self, _shadow: Option<Shadow>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(w: f64, h: f64) -> Raster {
        Raster::new(Size::new(w, h).unwrap()).unwrap()
    }

    fn white(a: f64) -> Rgba {
        Srgb::from_rgb8(255, 255, 255).with_alpha(a)
    }

    #[test]
    fn new_rounds_up_to_whole_pixels() {
        let r = raster(10.5, 3.2);
        assert_eq!((r.width(), r.height()), (11, 4));
        assert_eq!(r.to_rgba8().len(), 11 * 4 * 4);
    }

    #[test]
    fn starts_transparent_and_clear_fills() {
        let mut r = raster(4.0, 4.0);
        assert_eq!(r.pixel(0, 0).unwrap().a, 0.0);
        r.clear(Some(Srgb::from_rgb8(5, 5, 5).with_alpha(1.0)));
        assert_eq!(r.to_rgba8()[..4], [5, 5, 5, 255]);
        r.clear(None);
        assert!(r.to_rgba8().iter().all(|&b| b == 0));
    }

    #[test]
    fn pixel_out_of_range_is_none() {
        let r = raster(4.0, 4.0);
        assert!(r.pixel(4, 0).is_none());
        assert!(r.pixel(0, 4).is_none());
    }

    #[test]
    fn half_alpha_over_opaque_black_gives_mid_gray() {
        let mut r = raster(2.0, 2.0);
        r.clear(Some(Srgb::BLACK.with_alpha(1.0)));
        r.fill_rect(DVec2::ZERO, DVec2::new(2.0, 2.0), white(0.5));
        let px = r.pixel(1, 1).unwrap();
        assert!((px.color.r - 0.5).abs() < 1e-6);
        assert!((px.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fill_rect_respects_bounds() {
        let mut r = raster(10.0, 10.0);
        r.fill_rect(DVec2::new(2.0, 2.0), DVec2::new(3.0, 3.0), white(1.0));
        assert_eq!(r.pixel(2, 2).unwrap().a, 1.0);
        assert_eq!(r.pixel(4, 4).unwrap().a, 1.0);
        assert_eq!(r.pixel(5, 5).unwrap().a, 0.0);
        assert_eq!(r.pixel(1, 2).unwrap().a, 0.0);
    }

    #[test]
    fn shapes_outside_buffer_are_clipped() {
        let mut r = raster(8.0, 8.0);
        r.fill_circle(DVec2::new(-50.0, -50.0), 3.0, white(1.0));
        r.stroke_polyline(
            &[DVec2::new(-10.0, 4.0), DVec2::new(20.0, 4.0)],
            Stroke {
                color: white(1.0),
                width: 1.0,
            },
        );
        assert_eq!(r.pixel(0, 0).unwrap().a, 0.0);
        assert!(r.pixel(7, 4).unwrap().a > 0.0);
    }

    #[test]
    fn circle_covers_center_not_corner() {
        let mut r = raster(20.0, 20.0);
        r.fill_circle(DVec2::new(10.0, 10.0), 4.0, white(1.0));
        assert_eq!(r.pixel(10, 10).unwrap().a, 1.0);
        assert_eq!(r.pixel(0, 0).unwrap().a, 0.0);
    }

    #[test]
    fn polyline_marks_pixels_along_path() {
        let mut r = raster(20.0, 20.0);
        let stroke = Stroke {
            color: white(1.0),
            width: 2.0,
        };
        r.stroke_polyline(
            &[DVec2::new(2.0, 5.0), DVec2::new(15.0, 5.0), DVec2::new(15.0, 15.0)],
            stroke,
        );
        assert!(r.pixel(8, 5).unwrap().a > 0.9);
        assert!(r.pixel(15, 12).unwrap().a > 0.9);
        assert_eq!(r.pixel(5, 12).unwrap().a, 0.0);
    }

    #[test]
    fn quarter_arc_from_top_goes_clockwise_to_the_right() {
        let mut r = raster(40.0, 40.0);
        let c = DVec2::new(20.0, 20.0);
        let start = -std::f64::consts::FRAC_PI_2;
        r.stroke_arc(
            c,
            10.0,
            start,
            start + std::f64::consts::FRAC_PI_2,
            Stroke {
                color: white(1.0),
                width: 2.0,
            },
        );
        // Upper-right quadrant is drawn, upper-left is not.
        assert!(r.pixel(27, 12).unwrap().a > 0.5);
        assert_eq!(r.pixel(12, 12).unwrap().a, 0.0);
    }

    #[test]
    fn empty_sweep_draws_nothing() {
        let mut r = raster(20.0, 20.0);
        r.stroke_arc(
            DVec2::new(10.0, 10.0),
            5.0,
            1.0,
            1.0,
            Stroke {
                color: white(1.0),
                width: 3.0,
            },
        );
        assert!(r.to_rgba8().iter().all(|&b| b == 0));
    }

    #[test]
    fn radial_gradient_fades_to_outer() {
        let mut r = raster(21.0, 21.0);
        r.fill_radial_gradient(DVec2::new(10.5, 10.5), 10.0, white(1.0), Rgba::TRANSPARENT);
        let center = r.pixel(10, 10).unwrap();
        let corner = r.pixel(0, 0).unwrap();
        assert!(center.a > 0.9);
        assert_eq!(corner.a, 0.0);
        // Premultiplied interpolation keeps the hue instead of fading to black.
        let mid = r.pixel(15, 10).unwrap();
        assert!(mid.a > 0.0 && (mid.color.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn in_sweep_handles_wrap_and_full_turn() {
        assert!(in_sweep(0.1, 6.0, 6.6));
        assert!(!in_sweep(3.0, 6.0, 6.6));
        assert!(in_sweep(2.0, 0.0, TAU));
        assert!(!in_sweep(0.0, 1.0, 0.5));
    }
}
