use crate::geometry::Point;
use std::time::Duration;

/// Whether the target follows the pointer or stays pinned to the viewport
/// center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetMode {
    Interactive,
    Static,
}

/// Host viewport and display state.
///
/// Height is captured once and never re-captured: mobile on-screen keyboards
/// resize the visual viewport vertically, and following that would make the
/// field jump. Width is live and drives rebuilds (debounced by the
/// controller).
#[derive(Clone, Debug)]
pub struct Viewport {
    width: f64,
    initial_height: f64,
    device_pixel_ratio: f64,
    zoom: f64,
    touch: bool,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, touch: bool) -> Self {
        Self {
            width,
            initial_height: height,
            device_pixel_ratio,
            zoom: 1.0,
            touch,
        }
    }

    /// Combined device density and user zoom, floored at 1. Applied only at
    /// the drawing boundary, never to logical coordinates.
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.max(1.0) * self.zoom
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn initial_height(&self) -> f64 {
        self.initial_height
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.initial_height / 2.0)
    }

    pub fn is_touch(&self) -> bool {
        self.touch
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn set_zoom(&mut self, scale: f64) {
        self.zoom = scale;
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = ratio;
    }

    /// Interactive targeting requires a viewport strictly wider than the
    /// breakpoint, no touch capability, and the fade-duration arming delay to
    /// have elapsed; anything else pins the target to center.
    pub fn target_mode(&self, breakpoint: f64, armed: bool) -> TargetMode {
        if self.width > breakpoint && !self.touch && armed {
            TargetMode::Interactive
        } else {
            TargetMode::Static
        }
    }

    /// The scroll guard: drawing stays enabled until the page is scrolled
    /// past one (initial) viewport height.
    pub fn animation_enabled_at(&self, scroll_y: f64) -> bool {
        scroll_y <= self.initial_height
    }
}

/// Width-only resize debounce against an explicit clock: the last observed
/// width is released once a quiet period elapses with no further events.
#[derive(Clone, Debug)]
pub struct ResizeDebouncer {
    quiet: Duration,
    pending: Option<(f64, Duration)>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn observe(&mut self, width: f64, at: Duration) {
        self.pending = Some((width, at));
    }

    pub fn poll(&mut self, at: Duration) -> Option<f64> {
        match self.pending {
            Some((width, observed)) if at.saturating_sub(observed) >= self.quiet => {
                self.pending = None;
                Some(width)
            }
            _ => None,
        }
    }
}
