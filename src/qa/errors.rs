//! Custom error types for QA decoding and mask processing

use std::fmt;
use std::io;

/// Coarse classification of a `QaError`
///
/// Lets callers branch on the failure category without matching
/// on variant payloads or error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QaErrorKind {
    InvalidArgument,
    UnsupportedProduct,
    Raster,
    Io,
    Parse,
}

/// QA processing error types
#[derive(Debug)]
pub enum QaError {
    /// A caller-supplied argument is malformed (bit range, night flag, ...)
    InvalidArgument {
        parameter: String,
        message: String,
    },
    /// Product identifier does not name a supported MODIS product
    UnsupportedProduct(String),
    /// Band not present in the raster
    BandNotFound(String),
    /// Band holds the wrong sample type for the operation
    BandType {
        band: String,
        expected: &'static str,
    },
    /// Two rasters do not share the same grid
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// I/O error
    IoError(io::Error),
    /// Malformed input data or configuration
    ParseError(String),
    /// Image encoding error
    ImageError(String),
}

impl QaError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid_argument(parameter: &str, message: impl Into<String>) -> Self {
        QaError::InvalidArgument {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> QaErrorKind {
        match self {
            QaError::InvalidArgument { .. } => QaErrorKind::InvalidArgument,
            QaError::UnsupportedProduct(_) => QaErrorKind::UnsupportedProduct,
            QaError::BandNotFound(_)
            | QaError::BandType { .. }
            | QaError::DimensionMismatch { .. } => QaErrorKind::Raster,
            QaError::IoError(_) | QaError::ImageError(_) => QaErrorKind::Io,
            QaError::ParseError(_) => QaErrorKind::Parse,
        }
    }

    /// Name of the offending parameter, for `InvalidArgument` errors
    pub fn parameter(&self) -> Option<&str> {
        match self {
            QaError::InvalidArgument { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

impl fmt::Display for QaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QaError::InvalidArgument { parameter, message } =>
                write!(f, "Invalid argument '{}': {}", parameter, message),
            QaError::UnsupportedProduct(id) => write!(f, "Unsupported product: {}", id),
            QaError::BandNotFound(band) => write!(f, "Band not found: {}", band),
            QaError::BandType { band, expected } =>
                write!(f, "Band '{}' must hold {} values", band, expected),
            QaError::DimensionMismatch { expected, found } =>
                write!(f, "Raster dimensions differ: expected {}x{}, found {}x{}",
                       expected.0, expected.1, found.0, found.1),
            QaError::IoError(e) => write!(f, "I/O error: {}", e),
            QaError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            QaError::ImageError(msg) => write!(f, "Image error: {}", msg),
        }
    }
}

impl std::error::Error for QaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QaError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for QaError {
    fn from(error: io::Error) -> Self {
        QaError::IoError(error)
    }
}

impl From<image::ImageError> for QaError {
    fn from(error: image::ImageError) -> Self {
        QaError::ImageError(error.to_string())
    }
}

/// Result type for QA operations
pub type QaResult<T> = Result<T, QaError>;
