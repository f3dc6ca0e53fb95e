//! Reproducible description of a headless run.
//!
//! A [`Seed`] captures everything needed to replay an animation: animator
//! name, surface size, parameter overrides, PRNG seed, frame count, the
//! theme mode and the schedule of host events a headless driver feeds in
//! (page load and theme toggle). Two identical seeds produce identical
//! frames.

use serde::{Deserialize, Serialize};

use crate::error::FxError;
use crate::geometry::Size;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub animator: String,
    pub width: f64,
    pub height: f64,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
    #[serde(default = "default_dark")]
    pub dark: bool,
    /// When the page reports the document as complete; `None` never loads.
    #[serde(default = "default_load_at_ms")]
    pub load_at_ms: Option<f64>,
    /// Frame index at which the theme flips.
    #[serde(default)]
    pub toggle_theme_at: Option<usize>,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_dark() -> bool {
    true
}

fn default_load_at_ms() -> Option<f64> {
    Some(0.0)
}

impl Seed {
    /// Creates a seed with empty params, zero frames, dark mode, the page
    /// loaded at 0 ms and no theme toggle.
    pub fn new(animator: &str, width: f64, height: f64, seed: u64) -> Self {
        Self {
            animator: animator.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
            dark: default_dark(),
            load_at_ms: default_load_at_ms(),
            toggle_theme_at: None,
        }
    }

    /// Validates the extents and returns them as a [`Size`].
    pub fn size(&self) -> Result<Size, FxError> {
        Size::new(self.width, self.height)
    }

    pub fn from_json(json: &str) -> Result<Self, FxError> {
        let seed: Seed =
            serde_json::from_str(json).map_err(|e| FxError::InvalidParams(format!("invalid seed: {e}")))?;
        seed.size()?;
        Ok(seed)
    }
}
