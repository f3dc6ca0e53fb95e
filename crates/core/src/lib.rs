#![deny(unsafe_code)]
//! Core types and traits for canvas-fx.
//!
//! Provides the [`Animator`] trait and its frame/event types, the
//! [`Surface`] drawing abstraction with [`Recorder`] and [`Raster`]
//! implementations, the injected [`ThemeSignal`] with [`Smoothed`] theme
//! interpolation, color helpers, the `Xorshift64` PRNG, `Seed` and param
//! helpers.

pub mod animator;
pub mod clock;
pub mod color;
pub mod error;
pub mod geometry;
pub mod params;
pub mod prng;
pub mod raster;
pub mod seed;
pub mod surface;
pub mod theme;

pub use animator::{Animator, HostEvent};
pub use clock::{FrameClock, FrameTime};
pub use color::{Rgba, Srgb};
pub use error::FxError;
pub use geometry::Size;
pub use prng::Xorshift64;
pub use raster::Raster;
pub use seed::Seed;
pub use surface::{DrawOp, NullSurface, Recorder, Shadow, Stroke, Surface};
pub use theme::{Smoothed, ThemeReader, ThemeSignal};
