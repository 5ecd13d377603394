//! Connected-particle background animation engine.
//!
//! A jittered grid of particles sized to the viewport, each linked to its
//! five nearest neighbors; particles drift around their origins while a
//! render loop lights up lines and dots near a target point (the pointer on
//! wide non-touch viewports, the viewport center otherwise).
//!
//! The engine is headless and deterministic: all drawing goes through the
//! [`render::DrawSurface`] trait and all randomness through a seeded RNG, so
//! every frame is reproducible without a real canvas.

pub mod config;
pub mod controller;
pub mod field;
pub mod geometry;
pub mod motion;
pub mod particle;
pub mod render;
pub mod spatial;
pub mod viewport;

pub use config::{parse_fade_duration, AnimationConfig, ConfigError, DeviceClass};
pub use controller::{AnimationController, Mount, SetupError};
pub use field::{Field, NEIGHBOR_COUNT};
pub use geometry::Point;
pub use motion::MotionDriver;
pub use particle::Particle;
pub use render::{
    CanvasSettings, DrawCommand, DrawSurface, FrameStats, RecordingSurface, Rgba,
};
pub use viewport::{ResizeDebouncer, TargetMode, Viewport};
