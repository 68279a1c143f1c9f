use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Error)]
pub enum PrepError {
    /// The input path does not carry a recognized geometry extension.
    #[error("Format error: {0}")]
    Format(String),
    /// Malformed file content. Messages are prefixed with `file:line`.
    #[error("Parser error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Used when the user pass a logical invalid parameter to a function.
    #[error("Parameter error: {0}")]
    InvalidParameter(String),
    /// An output filename was requested from a geometry without provenance.
    #[error("Geometry has no source path to derive the output file from")]
    MissingSourcePath,
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl PrepError {
    /// Create a error with the kind `InvalidParameter`.
    /// # Arguments
    /// * `msg` - The error message.
    pub fn invalid_parameter<T: ToString>(msg: T) -> Self {
        PrepError::InvalidParameter(msg.to_string())
    }
}
