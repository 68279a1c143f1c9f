use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::{FromStr, Lines};

use ndarray::prelude::*;
use tracing::debug;

use super::check_extension;
use crate::error::PrepError;
use crate::geometry::Geometry;

/// File extension accepted by [`read_off`].
pub const OFF_EXTENSION: &str = "off";
/// Marker token opening every OFF file.
pub const OFF_MARKER: &str = "OFF";

struct TextParserContext<'a> {
    lines: Lines<'a>,
    filepath: String,
    line_count: usize,
}

impl<'a> TextParserContext<'a> {
    fn new(content: &'a str, filepath: &Path) -> Self {
        Self {
            lines: content.lines(),
            filepath: filepath.display().to_string(),
            line_count: 0,
        }
    }

    /// Reads a line and increase the line counter. It already trim the string.
    fn read_line(&mut self) -> Option<&'a str> {
        let line = self.lines.next()?;
        self.line_count += 1;
        Some(line.trim())
    }

    /// Reads the next line holding any token, skipping whitespace-only ones.
    fn read_data_line(&mut self) -> Option<&'a str> {
        loop {
            let line = self.read_line()?;
            if !line.is_empty() {
                return Some(line);
            }
        }
    }

    /// Formats an error message by putting the file name, the current line and the supplied message.
    ///
    /// # Arguments
    ///
    /// * `message` - An error message.
    fn gen_error<T: AsRef<str>>(&self, message: T) -> PrepError {
        PrepError::Parse(format!(
            "{}:{}: {}",
            self.filepath,
            self.line_count,
            message.as_ref()
        ))
    }
}

/// Parses the `vertex_count face_count edge_count` triple.
fn parse_counts(dims: &str, parser_context: &TextParserContext) -> Result<(usize, usize), PrepError> {
    let values = dims
        .split_whitespace()
        .map(|x| x.parse::<usize>())
        .collect::<Vec<_>>();

    if let [Ok(num_verts), Ok(num_faces), Ok(_)] = values[..] {
        Ok((num_verts, num_faces))
    } else {
        Err(parser_context.gen_error(format!("Invalid size formats. Got `{dims}`")))
    }
}

/// Reads `num_elements` lines of three values. Rows are appended as lines are
/// read, so the declared count is never trusted for allocation.
fn read_off_elements<T: FromStr>(
    num_elements: usize,
    parser_context: &mut TextParserContext,
) -> Result<Array2<T>, PrepError> {
    let mut elements = Vec::<T>::new();
    for i in 0..num_elements {
        let line = parser_context.read_data_line().ok_or_else(|| {
            parser_context.gen_error(format!(
                "Expected {num_elements} vertices, file ended after {i}"
            ))
        })?;

        let values = line
            .split_whitespace()
            .map(|x| x.parse::<T>())
            .collect::<Result<Vec<_>, _>>()
            .ok()
            .filter(|values| values.len() == 3)
            .ok_or_else(|| parser_context.gen_error(format!("Invalid vertex. Got `{line}`")))?;
        elements.extend(values);
    }

    Array2::from_shape_vec((num_elements, 3), elements)
        .map_err(|err| parser_context.gen_error(err.to_string()))
}

/// Reads every remaining line as a triangle. The leading per-face vertex count is
/// dropped, so only lines with exactly three indices are accepted.
fn read_off_faces(
    num_elements: usize,
    num_vertices: usize,
    parser_context: &mut TextParserContext,
) -> Result<Array2<usize>, PrepError> {
    let mut faces = Vec::<usize>::new();

    while let Some(line) = parser_context.read_data_line() {
        if faces.len() / 3 == num_elements {
            return Err(parser_context.gen_error(format!(
                "Header declares {num_elements} faces, found extra face `{line}`"
            )));
        }

        let indices = line
            .split_whitespace()
            .map(|x| x.parse::<usize>())
            .collect::<Vec<_>>();

        match indices[..] {
            [Ok(_), Ok(f1), Ok(f2), Ok(f3)] => {
                if let Some(f) = [f1, f2, f3].into_iter().find(|f| *f >= num_vertices) {
                    return Err(parser_context.gen_error(format!(
                        "Face index {f} is out of bounds for {num_vertices} vertices"
                    )));
                }
                faces.extend([f1, f2, f3]);
            }
            _ => {
                return Err(parser_context.gen_error(format!("Invalid face. Got `{line}`")));
            }
        }
    }

    let num_read = faces.len() / 3;
    if num_read != num_elements {
        return Err(parser_context.gen_error(format!(
            "Header declares {num_elements} faces, found {num_read}"
        )));
    }

    Array2::from_shape_vec((num_read, 3), faces)
        .map_err(|err| parser_context.gen_error(err.to_string()))
}

/// Reads an OFF file into a [`Geometry`].
///
/// Both the standard header (`OFF` alone on the first line, counts on the second)
/// and the compact one, where the counts are glued to the marker (`OFF4 1 0`), are
/// accepted and produce the same geometry. Only triangle faces are supported.
///
/// # Arguments
///
/// * `filepath` - Path to a file ending with `.off`.
///
/// # Errors
///
/// * [`PrepError::Format`] if the extension is not `off`, checked before opening the file.
/// * [`PrepError::Parse`] on malformed content or when the number of face lines
///   differs from the header.
/// * [`PrepError::Io`] if the file can't be read.
pub fn read_off<P: AsRef<Path>>(filepath: P) -> Result<Geometry, PrepError> {
    let filepath = filepath.as_ref();
    check_extension(filepath, OFF_EXTENSION)?;

    let content = std::fs::read_to_string(filepath)?;
    let mut parser_context = TextParserContext::new(&content, filepath);

    let header = parser_context
        .read_line()
        .ok_or_else(|| parser_context.gen_error("Empty file"))?;

    let (num_verts, num_faces) = if header == OFF_MARKER {
        let dims = parser_context
            .read_data_line()
            .ok_or_else(|| parser_context.gen_error("Missing size line"))?;
        parse_counts(dims, &parser_context)?
    } else if let Some(dims) = header.strip_prefix(OFF_MARKER) {
        parse_counts(dims, &parser_context)?
    } else {
        return Err(parser_context.gen_error(format!(
            "file header does not start with '{OFF_MARKER}', got '{header}' instead"
        )));
    };

    let vertices = read_off_elements::<f32>(num_verts, &mut parser_context)?;
    let faces = read_off_faces(num_faces, num_verts, &mut parser_context)?;

    debug!(
        path = %filepath.display(),
        vertices = num_verts,
        faces = num_faces,
        "read OFF file"
    );

    Ok(Geometry::new(vertices, Some(faces))?.with_source_path(filepath))
}

/// Writes a geometry as an OFF file with the standard header. Point clouds are
/// written with a face count of zero.
pub fn write_off<P: AsRef<Path>>(filepath: P, geom: &Geometry) -> Result<(), PrepError> {
    let filepath = filepath.as_ref();
    let mut buf = BufWriter::new(File::create(filepath)?);

    writeln!(buf, "{OFF_MARKER}")?;
    writeln!(buf, "{} {} 0", geom.len_vertices(), geom.len_faces())?;
    for point in geom.points().outer_iter() {
        writeln!(buf, "{} {} {}", point[0], point[1], point[2])?;
    }
    if let Some(faces) = geom.faces() {
        for face in faces.outer_iter() {
            writeln!(buf, "3 {} {} {}", face[0], face[1], face[2])?;
        }
    }
    buf.flush()?;

    debug!(path = %filepath.display(), "wrote OFF file");
    Ok(())
}
