//! Seeded random shape parameters for demos and smoke tests.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geom::ShapeParameters;

/// Line colors a random shape picks from.
pub const LINE_PALETTE: [&str; 7] = [
    "FF3737", "FF8888", "FFAAAA", "E58E73", "FF6666", "CD5C5C", "FA8072",
];

/// Normal distribution clamped into `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClampedNormal {
    mean: f64,
    sigma: f64,
    min: f64,
    max: f64,
}

impl ClampedNormal {
    const fn new(mean: f64, sigma: f64, min: f64, max: f64) -> Self {
        Self {
            mean,
            sigma,
            min,
            max,
        }
    }

    /// Integer-truncated draw.
    fn sample<R: Rng>(self, rng: &mut R) -> f64 {
        let value = self.mean + self.sigma * standard_normal(rng);
        value.clamp(self.min, self.max).trunc()
    }
}

const LENGTH: ClampedNormal = ClampedNormal::new(155.0, 40.0, 80.0, 280.0);
const CURVE: ClampedNormal = ClampedNormal::new(5.0, 20.0, -25.0, 50.0);
const BASE_ANGLE: ClampedNormal = ClampedNormal::new(10.0, 15.0, -15.0, 35.0);
const GLANS_ANGLE: ClampedNormal = ClampedNormal::new(0.0, 5.0, -15.0, 15.0);
const SHAFT_EXPANSION: ClampedNormal = ClampedNormal::new(105.0, 15.0, 85.0, 140.0);
const GLANS_EXPANSION: ClampedNormal = ClampedNormal::new(100.0, 15.0, 75.0, 135.0);

/// Girth tracks length: longer shapes draw from a thicker mean.
fn girth_for(length: f64) -> ClampedNormal {
    ClampedNormal::new(115.0 + (length - 140.0) * 0.25, 25.0, 70.0, 200.0)
}

/// Box-Muller transform over two uniform draws.
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    // `random` is in [0, 1); flip to (0, 1] so the log stays finite.
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// A random but plausible shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomShape {
    pub params: ShapeParameters,
    pub line_color: &'static str,
}

/// Draw a shape from `seed`. The same seed always gives the same shape.
#[must_use]
pub fn random_shape(seed: u64) -> RandomShape {
    let mut rng = StdRng::seed_from_u64(seed);
    random_shape_from(&mut rng)
}

pub fn random_shape_from<R: Rng>(rng: &mut R) -> RandomShape {
    let length = LENGTH.sample(rng);
    let girth = girth_for(length).sample(rng);
    let params = ShapeParameters {
        length,
        girth,
        curve: CURVE.sample(rng),
        base_angle: BASE_ANGLE.sample(rng),
        glans_angle: GLANS_ANGLE.sample(rng),
        shaft_expansion: SHAFT_EXPANSION.sample(rng),
        glans_expansion: GLANS_EXPANSION.sample(rng),
        ..ShapeParameters::default()
    };
    let line_color = LINE_PALETTE[rng.random_range(0..LINE_PALETTE.len())];
    log::debug!("random shape: {params:?} {line_color}");
    RandomShape { params, line_color }
}
