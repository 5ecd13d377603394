use serde::{Deserialize, Serialize};

/// A 2D point in logical (CSS-pixel) coordinates.
///
/// Particle coordinates are always logical; the pixel ratio is applied at the
/// drawing boundary, never stored here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Squared Euclidean distance. The engine never needs the square root:
/// activity thresholds and neighbor ranking are both defined on squared
/// distances.
pub fn distance_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
