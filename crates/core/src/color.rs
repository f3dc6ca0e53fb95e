//! Color types for the animators.
//!
//! [`Srgb`] stores channels in [0, 1] as `f64`. Theme colors are blended
//! channel-wise in sRGB, matching how a 2d canvas composes `rgba()` strings.
//! [`Rgba`] pairs a color with a straight (non-premultiplied) alpha.

use crate::error::FxError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// An sRGB color with straight alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub color: Srgb,
    pub a: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Srgb {
        Srgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, FxError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(FxError::InvalidColor(format!(
                "expected 6 hex digits, got {:?}",
                hex
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| FxError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb::from_rgb8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Channels quantized to 8 bits with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Channel-wise linear blend: `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            color: self,
            a: a.clamp(0.0, 1.0),
        }
    }
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        color: Srgb::BLACK,
        a: 0.0,
    };

    /// Formats as a canvas `rgba(r, g, b, a)` string.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.color.to_rgb8();
        format!("rgba({r}, {g}, {b}, {})", self.a)
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_css_color(&s).map_err(serde::de::Error::custom)
    }
}

/// Converts HSL to sRGB. `h` in degrees (any value, wrapped), `s` and `l`
/// in percent.
pub fn hsl_to_srgb(h: f64, s: f64, l: f64) -> Srgb {
    let h = h.rem_euclid(360.0) / 360.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);
    if s == 0.0 {
        return Srgb { r: l, g: l, b: l };
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Srgb {
        r: hue_channel(p, q, h + 1.0 / 3.0),
        g: hue_channel(p, q, h),
        b: hue_channel(p, q, h - 1.0 / 3.0),
    }
}

fn hue_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Parses a CSS color value as found in a custom property: either a hex
/// color or anything containing an `r, g, b` integer triple (e.g.
/// `"rgb(163, 217, 68)"` or `"163, 217, 68"`).
pub fn parse_css_color(value: &str) -> Result<Srgb, FxError> {
    let value = value.trim();
    if value.starts_with('#') {
        return Srgb::from_hex(value);
    }
    let inner = match (value.find('('), value.rfind(')')) {
        (Some(open), Some(close)) if open < close => &value[open + 1..close],
        _ => value,
    };
    let channels: Vec<u8> = inner
        .split(',')
        .take(3)
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|e| FxError::InvalidColor(format!("{value:?}: {e}")))?;
    match channels[..] {
        [r, g, b] => Ok(Srgb::from_rgb8(r, g, b)),
        _ => Err(FxError::InvalidColor(format!(
            "{value:?}: expected an r, g, b triple"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Srgb, b: Srgb) -> bool {
        (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3
    }

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#c0ff40").unwrap();
        let b = Srgb::from_hex("C0FF40").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_rgb8(), [192, 255, 64]);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("#gg0000").is_err());
        assert!(Srgb::from_hex("").is_err());
    }

    #[test]
    fn hex_round_trip() {
        for hex in ["#050505", "#f9fafb", "#a3d944", "#000000", "#ffffff"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Srgb::from_rgb8(0, 0, 0);
        let b = Srgb::from_rgb8(255, 255, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert!(close(a.lerp(b, 1.0), b));
        assert!((a.lerp(b, 0.5).g - 0.5).abs() < EPS);
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Srgb::BLACK.with_alpha(1.7).a, 1.0);
        assert_eq!(Srgb::BLACK.with_alpha(-0.2).a, 0.0);
    }

    #[test]
    fn rgba_css_string() {
        let c = Srgb::from_rgb8(50, 100, 50).with_alpha(0.25);
        assert_eq!(c.to_css(), "rgba(50, 100, 50, 0.25)");
    }

    #[test]
    fn hsl_primaries() {
        assert!(close(hsl_to_srgb(0.0, 100.0, 50.0), Srgb::from_rgb8(255, 0, 0)));
        assert!(close(hsl_to_srgb(120.0, 100.0, 50.0), Srgb::from_rgb8(0, 255, 0)));
        assert!(close(hsl_to_srgb(240.0, 100.0, 50.0), Srgb::from_rgb8(0, 0, 255)));
        assert!(close(hsl_to_srgb(360.0, 100.0, 50.0), Srgb::from_rgb8(255, 0, 0)));
    }

    #[test]
    fn hsl_zero_saturation_is_gray() {
        let c = hsl_to_srgb(120.0, 0.0, 25.0);
        assert!((c.r - 0.25).abs() < EPS && c.r == c.g && c.g == c.b);
    }

    #[test]
    fn hsl_green_band_is_green_dominant() {
        for hue in [105.0, 120.0, 134.9] {
            let c = hsl_to_srgb(hue, 90.0, 75.0);
            assert!(c.g > c.r && c.g > c.b, "hue {hue} -> {c:?}");
        }
    }

    #[test]
    fn parse_css_hex_and_triples() {
        let expected = Srgb::from_rgb8(163, 217, 68);
        assert_eq!(parse_css_color(" #a3d944 ").unwrap(), expected);
        assert_eq!(parse_css_color("rgb(163, 217, 68)").unwrap(), expected);
        assert_eq!(parse_css_color("163,217,68").unwrap(), expected);
    }

    #[test]
    fn parse_css_rejects_garbage() {
        assert!(parse_css_color("").is_err());
        assert!(parse_css_color("green").is_err());
        assert!(parse_css_color("rgb(300, 0, 0)").is_err());
        assert!(parse_css_color("1, 2").is_err());
    }

    #[test]
    fn serde_as_hex_string() {
        let c = Srgb::from_rgb8(34, 120, 60);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#22783c\"");
        let back: Srgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hsl_always_in_unit_cube(h in -720.0_f64..720.0, s in 0.0_f64..=100.0, l in 0.0_f64..=100.0) {
                let c = hsl_to_srgb(h, s, l);
                for v in [c.r, c.g, c.b] {
                    prop_assert!((-EPS..=1.0 + EPS).contains(&v), "{v} from hsl({h}, {s}, {l})");
                }
            }
        }
    }
}
