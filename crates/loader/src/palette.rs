use canvas_fx_core::params::param_color;
use canvas_fx_core::Srgb;
use serde_json::Value;

/// Colors of the loading screen, resolved once when it mounts.
///
/// `primary` strokes the traces and the ring and fills the particles;
/// the host also uses it for the percentage text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoaderPalette {
    pub background: Srgb,
    pub primary: Srgb,
}

impl LoaderPalette {
    pub fn fallback(dark: bool) -> Self {
        if dark {
            Self {
                background: Srgb::from_rgb8(0x05, 0x05, 0x05),
                primary: Srgb::from_rgb8(0xc0, 0xff, 0x40),
            }
        } else {
            Self {
                background: Srgb::from_rgb8(0xf9, 0xfa, 0xfb),
                primary: Srgb::from_rgb8(0xa3, 0xd9, 0x44),
            }
        }
    }

    /// Fallback colors for the mode, overridden by the `background` and
    /// `primary` keys of `overrides` when they hold parseable CSS colors.
    pub fn resolve(dark: bool, overrides: &Value) -> Self {
        let fallback = Self::fallback(dark);
        Self {
            background: param_color(overrides, "background").unwrap_or(fallback.background),
            primary: param_color(overrides, "primary").unwrap_or(fallback.primary),
        }
    }
}
