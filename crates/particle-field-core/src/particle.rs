use crate::geometry::Point;

/// Squared-distance thresholds for the activity table. Boundaries are strict
/// (`<`, not `<=`).
pub const NEAR_THRESHOLD_SQ: f64 = 4000.0;
pub const MID_THRESHOLD_SQ: f64 = 20000.0;
pub const FAR_THRESHOLD_SQ: f64 = 40000.0;

/// Map a particle's squared distance to the target onto
/// `(activity, circle_activity)`:
///
/// | squared distance | activity | circle activity |
/// |------------------|----------|-----------------|
/// | `< 4000`         | 0.3      | 0.6             |
/// | `< 20000`        | 0.1      | 0.3             |
/// | `< 40000`        | 0.02     | 0.1             |
/// | otherwise        | 0.0      | 0.0             |
pub fn activity_levels(distance_sq: f64) -> (f32, f32) {
    if distance_sq < NEAR_THRESHOLD_SQ {
        (0.3, 0.6)
    } else if distance_sq < MID_THRESHOLD_SQ {
        (0.1, 0.3)
    } else if distance_sq < FAR_THRESHOLD_SQ {
        (0.02, 0.1)
    } else {
        (0.0, 0.0)
    }
}

/// One animated point of the background field.
///
/// `neighbors` holds indices into the owning field's particle vector: no
/// ownership, never mutated after the field is built, discarded wholesale
/// when the field is rebuilt.
#[derive(Clone, Debug)]
pub struct Particle {
    /// Current drawn location, mutated every motion tick.
    pub position: Point,
    /// Anchor set at creation; drift is always relative to this.
    pub origin: Point,
    /// Indices of the ≤5 nearest other particles, ascending by squared
    /// distance, fixed at field-build time.
    pub neighbors: Vec<usize>,
    /// Line opacity for this frame, in `[0, 0.3]`. Zero means "do not draw".
    pub activity: f32,
    /// Dot opacity for this frame, in `[0, 0.6]`; always double `activity`.
    pub circle_activity: f32,
    /// Fixed per-particle radius jitter in `[0, 0.5)`; drawn radius is
    /// `(0.5 + radius_factor) × pixel_ratio`.
    pub radius_factor: f64,
}

impl Particle {
    pub(crate) fn at(origin: Point, radius_factor: f64) -> Self {
        Self {
            position: origin,
            origin,
            neighbors: Vec::new(),
            activity: 0.0,
            circle_activity: 0.0,
            radius_factor,
        }
    }
}
