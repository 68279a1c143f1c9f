//! Random perturbations of a [`Geometry`].
//!
//! Operators never modify their input: they return a new geometry with the same
//! source path. Randomness is always supplied by the caller, so a seeded
//! generator gives reproducible datasets.
use rand::Rng;

use crate::error::PrepError;
use crate::geometry::Geometry;

mod noise;
pub use noise::{add_noise, GaussianNoise};
mod occlusion;
pub use occlusion::{occlude, Occlusion};

/// An operator producing a perturbed copy of a geometry.
pub trait Perturbation {
    fn apply<R: Rng + ?Sized>(&self, geom: &Geometry, rng: &mut R) -> Result<Geometry, PrepError>;
}
