use crate::config::AnimationConfig;
use crate::field::Field;
use crate::geometry::Point;
use rand::Rng;

/// Circular ease-in-out over normalized time `[0, 1]`.
fn ease_in_out_circ(t: f64) -> f64 {
    if t < 0.5 {
        (1.0 - (1.0 - (2.0 * t).powi(2)).max(0.0).sqrt()) / 2.0
    } else {
        ((1.0 - (-2.0 * t + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
    }
}

fn lerp(from: Point, to: Point, k: f64) -> Point {
    Point::new(from.x + (to.x - from.x) * k, from.y + (to.y - from.y) * k)
}

/// One drift segment of a particle: an eased move from `from` to `to` over
/// `duration` seconds.
#[derive(Clone, Debug)]
struct Drift {
    from: Point,
    to: Point,
    duration: f64,
    elapsed: f64,
}

/// Time-stepped drift animation for every particle of one field generation.
///
/// Each particle carries an explicit drift segment that is re-rolled on
/// completion, an infinite ping-pong wander around its origin. A driver is
/// tied to the field generation it was built for: advancing it against a
/// rebuilt field is a no-op, so stale drivers can never mutate particles
/// they no longer own.
pub struct MotionDriver {
    drifts: Vec<Drift>,
    generation: u64,
    shift_radius: f64,
    duration_min: f64,
    duration_max: f64,
}

impl MotionDriver {
    pub fn new<R: Rng + ?Sized>(field: &Field, config: &AnimationConfig, rng: &mut R) -> Self {
        let shift_radius = config.shift_radius;
        let duration_min = config.shift_duration_min_secs;
        let duration_max = config.shift_duration_max_secs;
        let drifts = field
            .particles
            .iter()
            .map(|p| {
                Self::roll(
                    shift_radius,
                    duration_min,
                    duration_max,
                    p.position,
                    p.origin,
                    rng,
                )
            })
            .collect();
        Self {
            drifts,
            generation: field.generation,
            shift_radius,
            duration_min,
            duration_max,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Next drift segment: target uniform in `origin ± shift_radius` per
    /// axis, duration uniform in `[min, max)` seconds.
    fn roll<R: Rng + ?Sized>(
        shift_radius: f64,
        duration_min: f64,
        duration_max: f64,
        from: Point,
        origin: Point,
        rng: &mut R,
    ) -> Drift {
        let to = Point::new(
            origin.x - shift_radius + rng.random::<f64>() * 2.0 * shift_radius,
            origin.y - shift_radius + rng.random::<f64>() * 2.0 * shift_radius,
        );
        let duration = duration_min + rng.random::<f64>() * (duration_max - duration_min);
        Drift {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    /// Advance every particle's drift by `dt` seconds, re-rolling segments
    /// that complete. Returns `false` without touching the field when this
    /// driver is stale (built for a different generation).
    pub fn advance<R: Rng + ?Sized>(&mut self, field: &mut Field, dt: f64, rng: &mut R) -> bool {
        if self.generation != field.generation || self.drifts.len() != field.len() {
            log::debug!(
                "skipping stale motion driver (generation {} vs field {})",
                self.generation,
                field.generation
            );
            return false;
        }
        let (shift_radius, duration_min, duration_max) =
            (self.shift_radius, self.duration_min, self.duration_max);
        for (drift, particle) in self.drifts.iter_mut().zip(&mut field.particles) {
            drift.elapsed = (drift.elapsed + dt).min(drift.duration);
            let t = if drift.duration > 0.0 {
                drift.elapsed / drift.duration
            } else {
                1.0
            };
            particle.position = lerp(drift.from, drift.to, ease_in_out_circ(t));
            if drift.elapsed >= drift.duration {
                *drift = Self::roll(
                    shift_radius,
                    duration_min,
                    duration_max,
                    particle.position,
                    particle.origin,
                    rng,
                );
            }
        }
        true
    }
}
