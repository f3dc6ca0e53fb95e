//! Extents of a drawing surface.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::FxError;

/// Width and height of a surface or container, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Returns `FxError::InvalidDimensions` unless both extents are finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, FxError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(FxError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(self) -> f64 {
        self.width.min(self.height)
    }

    pub fn max_side(self) -> f64 {
        self.width.max(self.height)
    }

    /// Inclusive containment: points on the edge are inside.
    pub fn contains(self, p: DVec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}
