use crate::config::{density_for_width, DeviceClass};
use crate::geometry::Point;
use crate::particle::Particle;
use crate::spatial;
use rand::Rng;
use rayon::prelude::*;

/// Every particle keeps this many nearest neighbors for line drawing (fewer
/// only when the field itself has fewer other particles).
pub const NEIGHBOR_COUNT: usize = 5;

/// The full particle collection for the current viewport, plus the density
/// that generated it. Rebuilt wholesale on structural (width) resize; never
/// mutated incrementally.
#[derive(Clone, Debug)]
pub struct Field {
    /// Insertion order = grid scan order (column-major: x outer, y inner).
    pub particles: Vec<Particle>,
    /// Particles per axis, `[10, 40]` by construction.
    pub density: u32,
    pub width: f64,
    pub height: f64,
    /// Incremented by the controller on every rebuild; motion drivers built
    /// for an older generation refuse to touch this field.
    pub generation: u64,
}

impl Field {
    /// Generate a jittered grid of particles sized to the viewport and
    /// precompute each particle's nearest neighbors.
    ///
    /// Pure function of its inputs given the RNG: a fixed seed reproduces the
    /// exact field. A zero or negative dimension degenerates to an empty
    /// field without error.
    pub fn build<R: Rng + ?Sized>(
        width: f64,
        height: f64,
        class: DeviceClass,
        generation: u64,
        rng: &mut R,
    ) -> Self {
        let density = density_for_width(width, class);
        let mut origins = Vec::new();
        if width > 0.0 && height > 0.0 {
            let step_x = width / density as f64;
            let step_y = height / density as f64;
            let mut x = 0.0;
            while x < width {
                let mut y = 0.0;
                while y < height {
                    origins.push(Point::new(
                        x + rng.random::<f64>() * step_x,
                        y + rng.random::<f64>() * step_y,
                    ));
                    y += step_y;
                }
                x += step_x;
            }
        }
        let radii = (0..origins.len())
            .map(|_| rng.random::<f64>() * 0.5)
            .collect();
        Self::from_parts(origins, radii, density, width, height, generation)
    }

    /// Build a field from explicit anchor points with no jitter and no radius
    /// variation. Used by deterministic tests and oracles; goes through the
    /// same neighbor pass as [`Field::build`].
    pub fn from_origins(
        origins: Vec<Point>,
        density: u32,
        width: f64,
        height: f64,
        generation: u64,
    ) -> Self {
        let radii = vec![0.0; origins.len()];
        Self::from_parts(origins, radii, density, width, height, generation)
    }

    fn from_parts(
        origins: Vec<Point>,
        radii: Vec<f64>,
        density: u32,
        width: f64,
        height: f64,
        generation: u64,
    ) -> Self {
        let tree = spatial::build_index(&origins);
        // Order-preserving parallel neighbor pass; the tree and origins are
        // read-only here.
        let neighbor_lists: Vec<Vec<usize>> = (0..origins.len())
            .into_par_iter()
            .map(|i| spatial::nearest_neighbors(&tree, &origins, i, NEIGHBOR_COUNT))
            .collect();

        let particles = origins
            .into_iter()
            .zip(radii)
            .zip(neighbor_lists)
            .map(|((origin, radius_factor), neighbors)| {
                let mut particle = Particle::at(origin, radius_factor);
                particle.neighbors = neighbors;
                particle
            })
            .collect();

        Self {
            particles,
            density,
            width,
            height,
            generation,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
