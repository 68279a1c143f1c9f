use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::PrepError;
use crate::geometry::Geometry;
use crate::io::{read_off, write_pts};
use crate::params::PrepParams;
use crate::perturb::Perturbation;

/// Result of [`prepare`].
#[derive(Debug)]
pub struct PrepOutput {
    /// The input geometry, untouched.
    pub original: Geometry,
    /// The geometry after every configured perturbation.
    pub geometry: Geometry,
    /// Point file written when `write_points` is set.
    pub written: Option<PathBuf>,
}

/// Reads an OFF file, applies noise then occlusion as configured, and
/// optionally writes the resulting points.
///
/// # Arguments
///
/// * `filepath` - The `.off` file.
/// * `params` - Run settings. `params.seed` is ignored, see [`prepare_seeded`].
/// * `rng` - Random source for the perturbations.
pub fn prepare<P, R>(filepath: P, params: &PrepParams, rng: &mut R) -> Result<PrepOutput, PrepError>
where
    P: AsRef<Path>,
    R: Rng + ?Sized,
{
    params.validate()?;

    let original = read_off(filepath.as_ref())?;
    info!(
        path = %filepath.as_ref().display(),
        vertices = original.len_vertices(),
        faces = original.len_faces(),
        "loaded geometry"
    );

    let mut geometry = original.clone();
    if let Some(noise) = params.noise() {
        geometry = noise.apply(&geometry, rng)?;
        info!(std = noise.std, "applied noise");
    }
    if let Some(occlusion) = params.occlusion() {
        geometry = occlusion.apply(&geometry, rng)?;
        info!(
            ratio = occlusion.ratio,
            remaining = geometry.len_vertices(),
            "applied occlusion"
        );
    }

    let written = if params.write_points {
        let path = write_pts(&geometry)?;
        info!(path = %path.display(), "wrote points");
        Some(path)
    } else {
        None
    };

    Ok(PrepOutput {
        original,
        geometry,
        written,
    })
}

/// [`prepare`] with a random source seeded from `params.seed`, or from the
/// operating system when no seed is given.
pub fn prepare_seeded<P: AsRef<Path>>(
    filepath: P,
    params: &PrepParams,
) -> Result<PrepOutput, PrepError> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    prepare(filepath, params, &mut rng)
}
