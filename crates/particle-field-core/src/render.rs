use crate::field::Field;
use crate::geometry::{distance_sq, Point};
use crate::particle::activity_levels;
use serde::{Deserialize, Serialize};

/// Stroke color for neighbor lines; alpha is the particle's activity.
pub const LINE_RGB: [u8; 3] = [179, 200, 195];
/// Fill color for particle dots; alpha is the particle's circle activity.
pub const CIRCLE_RGB: [u8; 3] = [255, 255, 255];
/// Base stroke width before pixel-ratio scaling.
pub const LINE_WIDTH: f64 = 0.5;
/// Base circle radius before the per-particle factor and pixel-ratio scaling.
pub const CIRCLE_BASE_RADIUS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub fn from_rgb(rgb: [u8; 3], a: f32) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a,
        }
    }
}

/// Backing-buffer dimensions and transform scale for a drawable surface.
///
/// Pure function of `(css size, pixel ratio)`, so reapplying it with
/// unchanged inputs reconfigures the surface to the identical state. Logical
/// particle coordinates are unaffected by any of this.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSettings {
    pub backing_width: u32,
    pub backing_height: u32,
    pub scale: f64,
}

impl CanvasSettings {
    pub fn compute(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        Self {
            backing_width: (css_width * pixel_ratio).floor().max(0.0) as u32,
            backing_height: (css_height * pixel_ratio).floor().max(0.0) as u32,
            scale: pixel_ratio,
        }
    }
}

/// The drawable-surface collaborator contract: everything the renderer needs
/// from the host's 2D context. Coordinates passed in are logical; the
/// configured scale maps them to the backing buffer.
pub trait DrawSurface {
    fn configure(&mut self, settings: CanvasSettings);
    /// Clear the region `(0, 0)..(width, height)` in backing-buffer units.
    fn clear(&mut self, width: f64, height: f64);
    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64);
    fn circle(&mut self, center: Point, radius: f64, color: Rgba);
}

/// Per-frame draw counters, in the same spirit as a simulation step's
/// metrics sample.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct FrameStats {
    pub particles: usize,
    /// Particles with nonzero activity this frame.
    pub active: usize,
    pub lines: usize,
    pub circles: usize,
    /// False when the frame was suppressed by the scroll guard.
    pub drawn: bool,
}

/// Draw one frame: recompute each particle's activity from its distance to
/// `target`, then paint neighbor lines and dots in field order.
///
/// When `enabled` is false the frame does no work at all (the caller keeps
/// scheduling frames; only drawing is suppressed). Inactive particles are
/// skipped entirely, which is an optimization the activity table makes
/// exact: zero activity always pairs with zero circle activity.
pub fn render_frame<S: DrawSurface>(
    field: &mut Field,
    target: Point,
    pixel_ratio: f64,
    enabled: bool,
    surface: &mut S,
) -> FrameStats {
    let mut stats = FrameStats {
        particles: field.len(),
        ..FrameStats::default()
    };
    if !enabled {
        return stats;
    }
    stats.drawn = true;
    surface.clear(field.width * pixel_ratio, field.height * pixel_ratio);

    for particle in &mut field.particles {
        let d2 = distance_sq(particle.position, target);
        let (activity, circle_activity) = activity_levels(d2);
        particle.activity = activity;
        particle.circle_activity = circle_activity;
    }

    for particle in &field.particles {
        if particle.activity <= 0.0 {
            continue;
        }
        stats.active += 1;
        for &neighbor in &particle.neighbors {
            let other = &field.particles[neighbor];
            surface.line(
                particle.position,
                other.position,
                Rgba::from_rgb(LINE_RGB, particle.activity),
                LINE_WIDTH * pixel_ratio,
            );
            stats.lines += 1;
        }
        surface.circle(
            particle.position,
            (CIRCLE_BASE_RADIUS + particle.radius_factor) * pixel_ratio,
            Rgba::from_rgb(CIRCLE_RGB, particle.circle_activity),
        );
        stats.circles += 1;
    }
    stats
}

/// One recorded draw command, for inspection in tests and headless runs.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
}

/// A [`DrawSurface`] that records every command instead of painting.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    pub configured: Vec<CanvasSettings>,
    pub commands: Vec<DrawCommand>,
}

impl DrawSurface for RecordingSurface {
    fn configure(&mut self, settings: CanvasSettings) {
        self.configured.push(settings);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }
}
