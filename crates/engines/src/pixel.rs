//! Conversion of a [`Raster`] into an RGBA8 buffer for image output.
//!
//! Kept free of the `image` crate so it stays available without the `png`
//! feature.

use canvas_fx_core::{Raster, Srgb};

/// Returns the raster as RGBA8 bytes.
///
/// With a `backdrop`, every pixel is composited over that opaque color and
/// the result is fully opaque. Animators that draw on a transparent canvas
/// (hero, cursor) need this to look the way they do on the page.
pub fn raster_to_rgba(raster: &Raster, backdrop: Option<Srgb>) -> Vec<u8> {
    let Some(backdrop) = backdrop else {
        return raster.to_rgba8();
    };
    let [br, bg, bb] = [backdrop.r, backdrop.g, backdrop.b];
    raster
        .to_rgba8()
        .chunks_exact(4)
        .flat_map(|px| {
            let a = f64::from(px[3]) / 255.0;
            let over = |c: u8, base: f64| {
                ((f64::from(c) / 255.0 * a + base * (1.0 - a)) * 255.0).round() as u8
            };
            [over(px[0], br), over(px[1], bg), over(px[2], bb), 255u8]
        })
        .collect()
}
