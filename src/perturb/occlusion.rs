use itertools::Itertools;
use ndarray::prelude::*;
use ordered_float::OrderedFloat;
use rand::Rng;
use tracing::{debug, warn};

use super::Perturbation;
use crate::error::PrepError;
use crate::geometry::Geometry;

/// Removes the vertices closest to a random anchor vertex, leaving a hole that
/// mimics a sensor occlusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occlusion {
    /// Fraction of vertices to remove, in [0, 1].
    pub ratio: f64,
}

impl Occlusion {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }
}

impl Perturbation for Occlusion {
    fn apply<R: Rng + ?Sized>(&self, geom: &Geometry, rng: &mut R) -> Result<Geometry, PrepError> {
        occlude(geom, self.ratio, rng)
    }
}

/// Number of vertices removed by an occlusion of `ratio` over `len` vertices.
fn removal_count(ratio: f64, len: usize) -> usize {
    ((ratio * len as f64).floor() as usize).min(len)
}

/// Returns a point cloud without the `floor(ratio * N)` vertices nearest to a
/// uniformly drawn anchor vertex.
///
/// Survivors keep their original relative order. Faces are dropped since the
/// indices are no longer valid. Equal distances are resolved by vertex index.
///
/// # Arguments
///
/// * `geom` - Input geometry, left untouched.
/// * `ratio` - Fraction of vertices to remove, must lie in [0, 1].
/// * `rng` - Random source used to draw the anchor.
pub fn occlude<R: Rng + ?Sized>(
    geom: &Geometry,
    ratio: f64,
    rng: &mut R,
) -> Result<Geometry, PrepError> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(PrepError::invalid_parameter(format!(
            "occlusion ratio must be within [0, 1], got {ratio}"
        )));
    }

    let points = geom.points();
    let num_vertices = points.nrows();
    if num_vertices == 0 {
        warn!("occluding a geometry without vertices");
        return Ok(geom.derive_point_cloud(Array2::zeros((0, 3))));
    }

    let anchor = points.row(rng.gen_range(0..num_vertices));
    let distances = points
        .outer_iter()
        .map(|point| {
            let diff = &point - &anchor;
            diff.dot(&diff).sqrt()
        })
        .collect::<Vec<f32>>();

    let num_removed = removal_count(ratio, num_vertices);
    let mut keep = vec![true; num_vertices];
    (0..num_vertices)
        .sorted_by_key(|idx| OrderedFloat(distances[*idx]))
        .take(num_removed)
        .for_each(|idx| keep[idx] = false);

    let survivors = (0..num_vertices).filter(|idx| keep[*idx]).collect::<Vec<_>>();
    debug!(
        ratio,
        removed = num_removed,
        remaining = survivors.len(),
        "occluded geometry"
    );

    Ok(geom.derive_point_cloud(points.select(Axis(0), &survivors)))
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2, Axis};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::*;

    use super::{occlude, removal_count, Occlusion};
    use crate::error::PrepError;
    use crate::geometry::Geometry;
    use crate::perturb::Perturbation;
    use crate::unit_test::{sample_cube, sample_line_cloud};

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.1, 100)]
    #[case(0.25, 250)]
    #[case(0.333, 333)]
    #[case(0.5, 500)]
    #[case(0.7, 700)]
    #[case(0.99, 990)]
    #[case(1.0, 1000)]
    fn should_remove_floor_of_ratio(
        sample_line_cloud: Geometry,
        #[case] ratio: f64,
        #[case] removed: usize,
    ) {
        let num_vertices = sample_line_cloud.len_vertices();
        let occluded = occlude(&sample_line_cloud, ratio, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(occluded.len_vertices(), num_vertices - removed);
    }

    #[rstest]
    #[case(0.7, 3)]
    #[case(0.3, 7)]
    #[case(0.9, 1)]
    fn should_remove_floor_of_ratio_on_small_clouds(#[case] ratio: f64, #[case] kept: usize) {
        let points = Array2::<f32>::from_shape_fn((10, 3), |(i, c)| if c == 0 { i as f32 } else { 0.0 });
        let geom = Geometry::point_cloud(points).unwrap();
        let occluded = occlude(&geom, ratio, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(occluded.len_vertices(), kept);
    }

    #[rstest]
    fn should_drop_faces(sample_cube: Geometry) {
        assert!(!sample_cube.is_point_cloud());
        let occluded = occlude(&sample_cube, 0.25, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(occluded.is_point_cloud());
        assert_eq!(occluded.len_faces(), 0);
        assert_eq!(occluded.len_vertices(), 6);
        assert_eq!(occluded.source_path(), sample_cube.source_path());

        let untouched = occlude(&sample_cube, 0.0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(untouched.is_point_cloud());
        assert_eq!(untouched.points(), sample_cube.points());
    }

    #[rstest]
    fn should_not_mutate_input(sample_cube: Geometry) {
        let snapshot = sample_cube.clone();
        let _ = occlude(&sample_cube, 0.5, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(sample_cube, snapshot);
    }

    #[rstest]
    fn should_remove_a_contiguous_neighborhood(sample_line_cloud: Geometry) {
        // Points lie on a line with unit spacing: the removed set must be an
        // interval of indices containing the anchor.
        let occluded = Occlusion::new(0.2)
            .apply(&sample_line_cloud, &mut StdRng::seed_from_u64(9))
            .unwrap();

        let kept = occluded
            .points()
            .axis_iter(Axis(0))
            .map(|p| p[0] as usize)
            .collect::<Vec<_>>();
        assert!(kept.windows(2).all(|w| w[0] < w[1]), "order must be kept");

        let removed = (0..sample_line_cloud.len_vertices())
            .filter(|i| !kept.contains(i))
            .collect::<Vec<_>>();
        assert_eq!(removed.len(), 200);
        assert!(removed.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn should_handle_single_vertex() {
        let geom = Geometry::point_cloud(array![[1.0, 2.0, 3.0]]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(occlude(&geom, 1.0, &mut rng).unwrap().len_vertices(), 0);
        assert_eq!(occlude(&geom, 0.5, &mut rng).unwrap().len_vertices(), 1);
    }

    #[test]
    fn should_handle_empty_geometry() {
        let geom = Geometry::point_cloud(Array2::zeros((0, 3))).unwrap();
        let occluded = occlude(&geom, 0.5, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(occluded.is_empty());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.01)]
    #[case(f64::NAN)]
    fn should_reject_invalid_ratio(sample_cube: Geometry, #[case] ratio: f64) {
        let result = occlude(&sample_cube, ratio, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(PrepError::InvalidParameter(_))));
    }

    #[test]
    fn test_removal_count() {
        assert_eq!(removal_count(0.0, 10), 0);
        assert_eq!(removal_count(0.15, 10), 1);
        assert_eq!(removal_count(1.0, 10), 10);
        assert_eq!(removal_count(0.7, 10), 7);
        assert_eq!(removal_count(1.0, 0), 0);
    }
}
