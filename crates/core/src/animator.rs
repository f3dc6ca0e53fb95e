//! The `Animator` trait every canvas animation implements.
//!
//! The trait is object-safe so hosts can drive `Box<dyn Animator>` values
//! picked at runtime.

use glam::DVec2;
use serde_json::Value;

use crate::clock::FrameTime;
use crate::error::FxError;
use crate::geometry::Size;
use crate::surface::Surface;

/// Notifications a host forwards to its animators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The viewport or container changed size.
    Resize(Size),
    /// The document was already fully loaded when the animator mounted.
    DocumentComplete,
    /// The window `load` event fired.
    WindowLoad,
    PointerMove(DVec2),
    PointerLeave,
    PointerDown,
    PointerUp,
    /// The pointer entered (`true`) or left (`false`) an interactive element.
    Hover(bool),
}

/// A per-frame canvas simulation.
///
/// Each frame the host calls [`step`](Animator::step) and then
/// [`draw`](Animator::draw), in that order, exactly once.
pub trait Animator {
    /// Advances every entity by one frame.
    fn step(&mut self, time: FrameTime) -> Result<(), FxError>;

    /// Draws the current state. Theme interpolation also advances here,
    /// once per call.
    fn draw(&mut self, surface: &mut dyn Surface);

    /// Reacts to a host notification. Ignores everything by default.
    fn handle(&mut self, event: HostEvent) {
        let _ = event;
    }

    /// The extent the animator currently simulates.
    fn size(&self) -> Size;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Parameter schema: type, default, range and description per key.
    fn param_schema(&self) -> Value;

    /// One full frame: update, then draw.
    fn frame(&mut self, time: FrameTime, surface: &mut dyn Surface) -> Result<(), FxError> {
        self.step(time)?;
        self.draw(surface);
        Ok(())
    }
}
