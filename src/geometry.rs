use std::path::{Path, PathBuf};

use ndarray::prelude::*;

use crate::error::PrepError;

/// Vertices and (optionally) triangles of one mesh or point cloud, plus the
/// file they came from.
///
/// A geometry is immutable once built. Operations that change the vertices,
/// like the ones in [`crate::perturb`], return a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    source_path: Option<PathBuf>,
    /// The 3D points. Shape is (Nx3).
    points: Array2<f32>,
    /// Triangle indices into `points`. Shape is (Fx3).
    faces: Option<Array2<usize>>,
}

impl Geometry {
    /// Creates a geometry, checking that every face index refers to a vertex.
    ///
    /// # Arguments
    ///
    /// * `points` - Vertex array with shape (Nx3).
    /// * `faces` - Optional triangle array with shape (Fx3).
    pub fn new(points: Array2<f32>, faces: Option<Array2<usize>>) -> Result<Self, PrepError> {
        if points.ncols() != 3 {
            return Err(PrepError::invalid_parameter(format!(
                "points must have 3 columns, got {}",
                points.ncols()
            )));
        }

        if let Some(faces) = &faces {
            if faces.ncols() != 3 {
                return Err(PrepError::invalid_parameter(format!(
                    "faces must have 3 columns, got {}",
                    faces.ncols()
                )));
            }

            let num_vertices = points.nrows();
            if let Some(index) = faces.iter().find(|index| **index >= num_vertices) {
                return Err(PrepError::invalid_parameter(format!(
                    "face index {index} is out of bounds for {num_vertices} vertices"
                )));
            }
        }

        Ok(Self {
            source_path: None,
            points,
            faces,
        })
    }

    /// Creates a geometry without topology.
    pub fn point_cloud(points: Array2<f32>) -> Result<Self, PrepError> {
        Self::new(points, None)
    }

    /// Attaches the originating file path.
    pub fn with_source_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Same geometry provenance, different vertices and no faces. Used by operators
    /// that remove vertices.
    pub(crate) fn derive_point_cloud(&self, points: Array2<f32>) -> Self {
        Self {
            source_path: self.source_path.clone(),
            points,
            faces: None,
        }
    }

    /// Same geometry provenance and topology, vertices replaced one to one.
    pub(crate) fn derive_moved(&self, points: Array2<f32>) -> Self {
        debug_assert_eq!(points.dim(), self.points.dim());
        Self {
            source_path: self.source_path.clone(),
            points,
            faces: self.faces.clone(),
        }
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn points(&self) -> ArrayView2<f32> {
        self.points.view()
    }

    pub fn faces(&self) -> Option<ArrayView2<usize>> {
        self.faces.as_ref().map(|faces| faces.view())
    }

    pub fn len_vertices(&self) -> usize {
        self.points.nrows()
    }

    /// Number of triangles, zero for point clouds.
    pub fn len_faces(&self) -> usize {
        self.faces.as_ref().map_or(0, |faces| faces.nrows())
    }

    pub fn is_point_cloud(&self) -> bool {
        self.faces.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Splits into the vertex and face arrays.
    pub fn into_parts(self) -> (Array2<f32>, Option<Array2<usize>>) {
        (self.points, self.faces)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::Geometry;
    use crate::error::PrepError;

    #[test]
    fn should_reject_out_of_bounds_faces() {
        let points = array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let result = Geometry::new(points, Some(array![[0, 1, 3]]));
        assert!(matches!(result, Err(PrepError::InvalidParameter(_))));
    }

    #[test]
    fn should_reject_non_3d_points() {
        let result = Geometry::point_cloud(array![[0.0, 0.0], [1.0, 0.0]]);
        assert!(matches!(result, Err(PrepError::InvalidParameter(_))));
    }

    #[test]
    fn test_point_cloud_has_no_faces() {
        let geom = Geometry::point_cloud(array![[0.0, 0.0, 0.0]])
            .unwrap()
            .with_source_path("a/b.off");
        assert!(geom.is_point_cloud());
        assert_eq!(geom.len_faces(), 0);
        assert_eq!(geom.len_vertices(), 1);
        assert_eq!(geom.source_path().unwrap().to_str(), Some("a/b.off"));
    }
}
