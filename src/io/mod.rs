use std::path::Path;

use crate::error::PrepError;

mod off;
pub use off::{read_off, write_off, OFF_EXTENSION, OFF_MARKER};
mod pts;
pub use pts::{read_pts, write_pts, write_pts_to, PTS_EXTENSION};

/// Fails with [`PrepError::Format`] unless `path` ends with `.{extension}`
/// (ASCII case-insensitive). Does not touch the filesystem.
fn check_extension(path: &Path, extension: &str) -> Result<(), PrepError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(extension) => Ok(()),
        _ => Err(PrepError::Format(format!(
            "{}: expected a .{extension} file",
            path.display()
        ))),
    }
}
