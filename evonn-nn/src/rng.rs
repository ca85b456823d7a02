use rand::Rng;

use std::f64::consts::PI;

/// The uniform draws used throughout network construction
/// and mutation, available on every [`Rng`].
///
/// Callers own the generator, so seeding one (e.g. a
/// `StdRng::seed_from_u64`) makes a whole run reproducible.
///
/// # Examples
/// ```
/// use evonn_nn::rng::RandomDraws;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let w = rng.draw_between(-1.0, 1.0);
/// assert!((-1.0..1.0).contains(&w));
/// ```
pub trait RandomDraws: Rng {
    /// Uniform value in `[0, 1)`.
    fn draw_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    /// Uniform value in `[0, max)`.
    fn draw_below(&mut self, max: f64) -> f64 {
        self.draw_unit() * max
    }

    /// Uniform value in `[min, max)`.
    fn draw_between(&mut self, min: f64, max: f64) -> f64 {
        min + self.draw_unit() * (max - min)
    }

    /// Either `-1` or `+1`, with equal chance.
    fn draw_sign(&mut self) -> i32 {
        if self.draw_unit() < 0.5 {
            -1
        } else {
            1
        }
    }

    /// Uniform angle in radians, in `[0, 2π)`.
    fn draw_radian_angle(&mut self) -> f64 {
        self.draw_between(0.0, 2.0 * PI)
    }
}

impl<R: Rng + ?Sized> RandomDraws for R {}
