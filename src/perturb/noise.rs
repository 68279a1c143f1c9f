use ndarray::Array2;
use ndarray_rand::rand_distr::Normal;
use ndarray_rand::RandomExt;
use rand::Rng;
use tracing::debug;

use super::Perturbation;
use crate::error::PrepError;
use crate::geometry::Geometry;

/// Adds zero-mean gaussian noise to every vertex coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNoise {
    /// Standard deviation of the noise, in the geometry units.
    pub std: f32,
}

impl GaussianNoise {
    pub fn new(std: f32) -> Self {
        Self { std }
    }
}

impl Perturbation for GaussianNoise {
    fn apply<R: Rng + ?Sized>(&self, geom: &Geometry, rng: &mut R) -> Result<Geometry, PrepError> {
        add_noise(geom, self.std, rng)
    }
}

/// Returns a copy of `geom` whose coordinates are shifted by independent
/// samples of `N(0, std)`. Faces are kept as the vertex count doesn't change.
///
/// # Arguments
///
/// * `geom` - Input geometry, left untouched.
/// * `std` - Standard deviation, must be finite and non-negative.
/// * `rng` - Random source.
pub fn add_noise<R: Rng + ?Sized>(
    geom: &Geometry,
    std: f32,
    rng: &mut R,
) -> Result<Geometry, PrepError> {
    if !std.is_finite() || std < 0.0 {
        return Err(PrepError::invalid_parameter(format!(
            "noise standard deviation must be finite and >= 0, got {std}"
        )));
    }

    let distribution = Normal::new(0.0f32, std).map_err(PrepError::invalid_parameter)?;
    let noise = Array2::random_using(geom.points().raw_dim(), distribution, rng);

    debug!(std, vertices = geom.len_vertices(), "adding gaussian noise");
    Ok(geom.derive_moved(&geom.points() + &noise))
}
