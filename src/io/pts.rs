use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::debug;

use super::check_extension;
use crate::error::PrepError;
use crate::geometry::Geometry;

/// Extension of the point-only text format.
pub const PTS_EXTENSION: &str = "pts";
const PTS_HEADER: &str = "num vertices";

/// Writes the vertices of `geom` next to its source file, replacing the
/// extension with `.pts`. Faces are never written.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// * [`PrepError::MissingSourcePath`] if the geometry was not loaded from a file.
/// * [`PrepError::Io`] if the target can't be created.
pub fn write_pts(geom: &Geometry) -> Result<PathBuf, PrepError> {
    let filepath = geom
        .source_path()
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(PrepError::MissingSourcePath)?
        .with_extension(PTS_EXTENSION);

    write_pts_to(&filepath, geom)?;
    Ok(filepath)
}

/// Writes the vertices of `geom` to `filepath`.
///
/// The first line is `num vertices N`, followed by one `x y z` line per vertex.
pub fn write_pts_to<P: AsRef<Path>>(filepath: P, geom: &Geometry) -> Result<(), PrepError> {
    let filepath = filepath.as_ref();
    let mut buf = BufWriter::new(File::create(filepath)?);

    writeln!(buf, "{PTS_HEADER} {}", geom.len_vertices())?;
    for point in geom.points().outer_iter() {
        writeln!(buf, "{} {} {}", point[0], point[1], point[2])?;
    }
    buf.flush()?;

    debug!(path = %filepath.display(), vertices = geom.len_vertices(), "wrote point file");
    Ok(())
}

/// Reads a file written by [`write_pts_to`] back as a point cloud.
pub fn read_pts<P: AsRef<Path>>(filepath: P) -> Result<Geometry, PrepError> {
    let filepath = filepath.as_ref();
    check_extension(filepath, PTS_EXTENSION)?;

    let content = std::fs::read_to_string(filepath)?;
    let gen_error = |line: usize, message: String| {
        PrepError::Parse(format!("{}:{}: {}", filepath.display(), line, message))
    };

    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (line_no, header) = lines
        .next()
        .ok_or_else(|| gen_error(1, "Empty file".to_string()))?;
    let num_vertices = header
        .strip_prefix(PTS_HEADER)
        .and_then(|count| count.trim().parse::<usize>().ok())
        .ok_or_else(|| gen_error(line_no, format!("Invalid header. Got `{header}`")))?;

    let mut points = Vec::<f32>::new();
    let mut num_read = 0;
    for (line_no, line) in lines {
        if num_read == num_vertices {
            return Err(gen_error(
                line_no,
                format!("Header declares {num_vertices} vertices, found extra `{line}`"),
            ));
        }

        if let [Ok(x), Ok(y), Ok(z)] = line
            .split_whitespace()
            .map(|x| x.parse::<f32>())
            .collect::<Vec<_>>()[..]
        {
            points.extend([x, y, z]);
            num_read += 1;
        } else {
            return Err(gen_error(line_no, format!("Invalid vertex. Got `{line}`")));
        }
    }

    if num_read != num_vertices {
        return Err(gen_error(
            content.lines().count(),
            format!("Header declares {num_vertices} vertices, found {num_read}"),
        ));
    }

    let points = Array2::from_shape_vec((num_vertices, 3), points)
        .map_err(|err| gen_error(content.lines().count(), err.to_string()))?;
    Ok(Geometry::point_cloud(points)?.with_source_path(filepath))
}
