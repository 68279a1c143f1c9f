//! Hand-off point to mesh and point cloud viewers.
//!
//! Rendering itself lives outside this crate. A viewer receives
//! [`SceneGeometry`] values: plain vertex and triangle lists that map directly
//! to the buffers of common viewers.
use std::io::Write;

use crate::error::PrepError;
use crate::geometry::Geometry;

/// Vertex and triangle lists of one geometry, ready for a viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGeometry {
    /// Display name, usually the source file name.
    pub name: String,
    pub vertices: Vec<[f32; 3]>,
    /// `None` renders as a point cloud.
    pub triangles: Option<Vec<[usize; 3]>>,
}

impl From<&Geometry> for SceneGeometry {
    fn from(geom: &Geometry) -> Self {
        let name = geom
            .source_path()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            vertices: geom
                .points()
                .outer_iter()
                .map(|p| [p[0], p[1], p[2]])
                .collect(),
            triangles: geom
                .faces()
                .map(|faces| faces.outer_iter().map(|f| [f[0], f[1], f[2]]).collect()),
        }
    }
}

impl SceneGeometry {
    /// Axis aligned bounds as `(min, max)`, `None` without vertices.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for c in 0..3 {
                lo[c] = lo[c].min(v[c]);
                hi[c] = hi[c].max(v[c]);
            }
            (lo, hi)
        }))
    }
}

/// Something able to display geometries.
pub trait Viewer {
    fn show(&mut self, geometries: &[SceneGeometry]) -> Result<(), PrepError>;
}

/// Viewer for terminals: writes one summary line per geometry.
pub struct TextSummaryViewer<W: Write> {
    out: W,
}

impl<W: Write> TextSummaryViewer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Viewer for TextSummaryViewer<W> {
    fn show(&mut self, geometries: &[SceneGeometry]) -> Result<(), PrepError> {
        for geom in geometries {
            let kind = match &geom.triangles {
                Some(triangles) => format!("mesh with {} triangles", triangles.len()),
                None => "point cloud".to_string(),
            };
            write!(self.out, "{}: {} vertices, {kind}", geom.name, geom.vertices.len())?;
            if let Some((lo, hi)) = geom.bounds() {
                write!(self.out, ", bounds {lo:?} - {hi:?}")?;
            }
            writeln!(self.out)?;
        }
        Ok(())
    }
}
