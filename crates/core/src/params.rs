//! Typed lookups into an animator's JSON params object.
//!
//! A missing key or a value of the wrong type yields the default; these
//! helpers never fail.

use serde_json::Value;

use crate::color::{parse_css_color, Srgb};

/// `params[name]` as `f64` (integers accepted), else `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer, else `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` parsed as a CSS color (hex or `r, g, b`), else `None`.
pub fn param_color(params: &Value, name: &str) -> Option<Srgb> {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| parse_css_color(s).ok())
}
