use canvas_fx_core::prng::Xorshift64;
use glam::DVec2;

use crate::trace::LoaderTrace;

/// Trace progress a particle waits for before it starts moving.
pub const VISIBILITY_THRESHOLD: f64 = 0.2;
/// Probability of hopping to another trace on wrap.
pub const REBIND_CHANCE: f64 = 0.1;

/// A square marker traveling along the drawn part of one trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressParticle {
    /// Fraction of the trace length per frame.
    pub speed: f64,
    /// Side length of the square.
    pub size: f64,
    pub alpha: f64,
    /// Index of the trace it travels on.
    pub trace: usize,
    /// Position along the trace as a fraction of its total length.
    pub progress: f64,
}

impl ProgressParticle {
    /// A particle bound to a random one of `trace_count` traces.
    pub fn random(trace_count: usize, rng: &mut Xorshift64) -> Self {
        Self {
            speed: rng.next_range(0.005, 0.015),
            size: rng.next_range(1.5, 3.0),
            alpha: rng.next_range(0.5, 1.0),
            trace: rng.next_usize(trace_count.max(1)),
            progress: rng.next_f64(),
        }
    }
}

/// Advances a particle along its trace.
///
/// Nothing happens until the trace is drawn past
/// [`VISIBILITY_THRESHOLD`]. A move that would pass the drawn end of the
/// trace is skipped, so the particle holds in place that frame. At the end
/// of a fully drawn trace the particle restarts at 0 and sometimes moves to
/// another trace.
pub fn step(particle: &mut ProgressParticle, traces: &[LoaderTrace], rng: &mut Xorshift64) {
    let Some(trace) = traces.get(particle.trace) else {
        return;
    };
    if trace.progress() < VISIBILITY_THRESHOLD {
        return;
    }
    let next = particle.progress + particle.speed;
    if next >= 1.0 {
        if trace.progress() < 1.0 {
            return;
        }
        particle.progress = 0.0;
        if rng.chance(REBIND_CHANCE) {
            particle.trace = rng.next_usize(traces.len());
        }
    } else if trace.total_len() * next <= trace.drawn_len() {
        particle.progress = next;
    }
}

/// Where the particle is drawn, or `None` while its trace is below the
/// visibility threshold or the particle is ahead of the drawn length.
pub fn position(particle: &ProgressParticle, traces: &[LoaderTrace]) -> Option<DVec2> {
    let trace = traces.get(particle.trace)?;
    if trace.progress() < VISIBILITY_THRESHOLD {
        return None;
    }
    let len = trace.total_len() * particle.progress;
    if len > trace.drawn_len() {
        return None;
    }
    Some(trace.point_at(len))
}
