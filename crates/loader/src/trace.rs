//! Radiating traces drawn behind the progress ring.
//!
//! Each trace is an orthogonal polyline that starts on a small ring around
//! the viewport center and zig-zags outward past the viewport edge. The
//! path is fixed at construction; only the drawn fraction changes.

use std::f64::consts::TAU;

use canvas_fx_core::prng::Xorshift64;
use canvas_fx_core::Size;
use glam::DVec2;

/// Radius of the ring traces start on.
pub const CENTER_RADIUS: f64 = 110.0;
/// Multiplier on every trace's draw speed.
pub const SPEED_BASE: f64 = 1.5;
/// Target distance as a multiple of the larger viewport side.
const REACH_FACTOR: f64 = 1.5;
const MAX_DELAY_FRAMES: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderTrace {
    path: Vec<DVec2>,
    total_len: f64,
    progress: f64,
    speed: f64,
    width: f64,
    alpha: f64,
    delay: f64,
}

impl LoaderTrace {
    /// Builds a random outward trace for a viewport of `size`.
    pub fn build(size: Size, rng: &mut Xorshift64) -> Self {
        let center = size.center();
        let angle = rng.next_range(0.0, TAU);
        let heading = DVec2::from_angle(angle);
        let start = center + heading * CENTER_RADIUS;
        let target = center + heading * size.max_side() * REACH_FACTOR;

        let mut path = vec![start];
        let mut cursor = start;

        // Short first leg along the dominant axis to clear the ring.
        let clear = heading * rng.next_range(20.0, 60.0);
        if heading.x.abs() > heading.y.abs() {
            cursor.x += clear.x;
        } else {
            cursor.y += clear.y;
        }
        path.push(cursor);

        let segments = 4 + rng.next_usize(5);
        for _ in 0..segments {
            let remaining = target - cursor;
            let weight = remaining.x.abs() / (remaining.x.abs() + remaining.y.abs());
            let move_x = rng.chance(weight);
            let len = rng.next_range(50.0, 250.0);
            if move_x {
                cursor.x += remaining.x.signum() * len;
            } else {
                cursor.y += remaining.y.signum() * len;
            }
            path.push(cursor);
        }

        let total_len = path.windows(2).map(|w| w[0].distance(w[1])).sum();

        Self {
            path,
            total_len,
            progress: 0.0,
            speed: rng.next_range(0.005, 0.015) * SPEED_BASE,
            width: rng.next_range(1.0, 2.0),
            alpha: rng.next_range(0.2, 0.6),
            delay: rng.next_range(0.0, MAX_DELAY_FRAMES),
        }
    }

    /// Counts down the start delay, then grows the drawn fraction.
    pub fn advance(&mut self) {
        if self.delay > 0.0 {
            self.delay -= 1.0;
            return;
        }
        self.progress = (self.progress + self.speed).min(1.0);
    }

    pub fn path(&self) -> &[DVec2] {
        &self.path
    }

    pub fn total_len(&self) -> f64 {
        self.total_len
    }

    /// Drawn fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_delayed(&self) -> bool {
        self.delay > 0.0
    }

    /// Length of the path drawn so far.
    pub fn drawn_len(&self) -> f64 {
        self.total_len * self.progress
    }

    /// Point at arc length `len` along the path, clamped to its ends.
    pub fn point_at(&self, len: f64) -> DVec2 {
        let mut walked = 0.0;
        for w in self.path.windows(2) {
            let seg = w[0].distance(w[1]);
            if walked + seg >= len {
                if seg == 0.0 {
                    return w[0];
                }
                return w[0].lerp(w[1], ((len - walked) / seg).max(0.0));
            }
            walked += seg;
        }
        self.path.last().copied().unwrap_or(DVec2::ZERO)
    }

    /// Vertices of the drawn part: every fully drawn vertex plus the
    /// interpolated tip.
    pub fn drawn_points(&self) -> Vec<DVec2> {
        let target = self.drawn_len();
        let mut points = Vec::with_capacity(self.path.len());
        let Some(&first) = self.path.first() else {
            return points;
        };
        points.push(first);
        let mut walked = 0.0;
        for w in self.path.windows(2) {
            let seg = w[0].distance(w[1]);
            if walked + seg <= target {
                points.push(w[1]);
                walked += seg;
            } else {
                points.push(w[0].lerp(w[1], (target - walked) / seg));
                break;
            }
        }
        points
    }
}
