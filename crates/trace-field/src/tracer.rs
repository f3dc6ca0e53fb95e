//! A single grid-walking tracer and its per-frame update.

use canvas_fx_core::prng::Xorshift64;
use canvas_fx_core::Size;
use glam::DVec2;

use crate::TraceFieldParams;

/// Opacity at or below this counts as fully faded.
const FADED: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracerState {
    Growing,
    Fading,
}

/// What one call to [`step`] did to a tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved within the current grid segment.
    Advanced,
    /// Reached the next grid point and recorded it.
    Snapped,
    /// Left the viewport or ran out of steps this frame.
    StartedFading,
    /// Lost opacity while fading.
    Faded,
    /// Fully faded and respawned at an edge.
    Respawned,
}

/// A path-following line that grows along the grid, then fades and respawns.
///
/// `history` holds the grid points visited so far. It only grows while the
/// tracer is [`TracerState::Growing`] and is cleared on respawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracer {
    position: DVec2,
    direction: DVec2,
    history: Vec<DVec2>,
    state: TracerState,
    opacity: f64,
    grid_steps: usize,
    segment_progress: f64,
}

impl Tracer {
    /// Spawns at a random grid-aligned point on one of the four edges,
    /// heading inward.
    pub fn spawn(bounds: Size, grid_size: f64, rng: &mut Xorshift64) -> Self {
        let along = |extent: f64, rng: &mut Xorshift64| {
            (rng.next_f64() * (extent / grid_size)).floor() * grid_size
        };
        let (position, direction) = match rng.next_usize(4) {
            0 => (DVec2::new(along(bounds.width, &mut *rng), 0.0), DVec2::Y),
            1 => (
                DVec2::new(bounds.width, along(bounds.height, &mut *rng)),
                DVec2::NEG_X,
            ),
            2 => (
                DVec2::new(along(bounds.width, &mut *rng), bounds.height),
                DVec2::NEG_Y,
            ),
            _ => (DVec2::new(0.0, along(bounds.height, &mut *rng)), DVec2::X),
        };
        Self {
            position,
            direction,
            history: vec![position],
            state: TracerState::Growing,
            opacity: 1.0,
            grid_steps: 0,
            segment_progress: 0.0,
        }
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn direction(&self) -> DVec2 {
        self.direction
    }

    pub fn history(&self) -> &[DVec2] {
        &self.history
    }

    pub fn state(&self) -> TracerState {
        self.state
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn grid_steps(&self) -> usize {
        self.grid_steps
    }

    /// Overrides the step count. Used to stagger a freshly built pool.
    pub fn set_grid_steps(&mut self, steps: usize) {
        self.grid_steps = steps;
    }

    pub fn segment_progress(&self) -> f64 {
        self.segment_progress
    }

    pub fn is_growing(&self) -> bool {
        self.state == TracerState::Growing
    }

    /// Grid points that get a node dot: both ends, plus every vertex where
    /// the path turns.
    pub fn nodes(&self) -> impl Iterator<Item = DVec2> + '_ {
        let last = self.history.len().saturating_sub(1);
        self.history.iter().enumerate().filter_map(move |(i, &p)| {
            if i == 0 || i == last {
                return Some(p);
            }
            let prev = self.history[i - 1];
            let next = self.history[i + 1];
            (prev.x != next.x && prev.y != next.y).then_some(p)
        })
    }

    /// Points of the drawn line: the history, plus the moving head while growing.
    pub fn line_points(&self) -> Vec<DVec2> {
        let mut points = self.history.clone();
        if self.is_growing() {
            points.push(self.position);
        }
        points
    }

    fn turn(&mut self, rng: &mut Xorshift64) {
        self.direction = if self.direction.x != 0.0 {
            DVec2::new(0.0, rng.sign())
        } else {
            DVec2::new(rng.sign(), 0.0)
        };
    }
}

/// Advances a tracer by one frame.
///
/// Growing tracers move `movement_speed` along their direction. On
/// reaching the next grid point they snap to it, record it, and turn 90
/// degrees with probability `turn_chance`. A tracer that leaves `bounds` or
/// exceeds `max_grid_steps` starts fading; a faded tracer respawns.
pub fn step(
    tracer: &mut Tracer,
    bounds: Size,
    params: &TraceFieldParams,
    rng: &mut Xorshift64,
) -> StepOutcome {
    if tracer.state == TracerState::Fading {
        tracer.opacity = (tracer.opacity - params.fade_step).max(0.0);
        if tracer.opacity <= FADED {
            *tracer = Tracer::spawn(bounds, params.grid_size, rng);
            return StepOutcome::Respawned;
        }
        return StepOutcome::Faded;
    }

    tracer.position += tracer.direction * params.movement_speed;
    tracer.segment_progress += params.movement_speed;

    if tracer.segment_progress < params.grid_size {
        if !bounds.contains(tracer.position) {
            tracer.state = TracerState::Fading;
            return StepOutcome::StartedFading;
        }
        return StepOutcome::Advanced;
    }

    tracer.segment_progress = 0.0;
    tracer.grid_steps += 1;
    let last = tracer.history.last().copied().unwrap_or(tracer.position);
    tracer.position = last + tracer.direction * params.grid_size;
    tracer.history.push(tracer.position);

    if !bounds.contains(tracer.position) || tracer.grid_steps > params.max_grid_steps {
        tracer.state = TracerState::Fading;
        return StepOutcome::StartedFading;
    }
    if rng.chance(params.turn_chance) {
        tracer.turn(rng);
    }
    StepOutcome::Snapped
}
