//! Error types for the docx2mdx library.

use std::io;
use thiserror::Error;

/// Result type alias for docx2mdx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during DOCX to MDX conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not recognized as a DOCX package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// Error reading the document XML inside the package.
    #[error("Document XML error: {0}")]
    Xml(String),

    /// A structural expectation of the template was violated
    /// (missing metadata table, missing layer header, mismatched layer schema).
    #[error("Document structure error: {0}")]
    Structure(String),

    /// A legend color value matches neither `#RRGGBB` nor `rgb(r,g,b)`.
    #[error("Invalid color token: {0}")]
    ColorFormat(String),

    /// Text cannot be safely escaped into the front matter syntax.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error during rendering (front matter, prose, MDX assembly).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => Error::UnknownFormat,
            _ => Error::Xml(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(
            err.to_string(),
            "Unknown file format: not a valid DOCX package"
        );

        let err = Error::ColorFormat("notacolor".to_string());
        assert_eq!(err.to_string(), "Invalid color token: notacolor");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
