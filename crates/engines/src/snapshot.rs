//! PNG output of a rendered [`Raster`].
//!
//! Feature-gated behind `png` (default on) so WASM builds can depend on
//! this crate without pulling in `image`. The byte conversion lives in
//! [`crate::pixel`].

use std::path::Path;

use canvas_fx_core::{FxError, Raster, Srgb};

use crate::pixel::raster_to_rgba;

/// Writes a raster as a PNG, optionally flattened over an opaque `backdrop`.
///
/// Returns `FxError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `FxError::Io` on write failure.
pub fn write_png(raster: &Raster, backdrop: Option<Srgb>, path: &Path) -> Result<(), FxError> {
    let rgba = raster_to_rgba(raster, backdrop);
    let dims = || FxError::InvalidDimensions {
        width: raster.width() as f64,
        height: raster.height() as f64,
    };
    let w = u32::try_from(raster.width()).map_err(|_| dims())?;
    let h = u32::try_from(raster.height()).map_err(|_| dims())?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| FxError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FxError::Io(e.to_string()))
}
