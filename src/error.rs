//! Error types for the tabmap library

use std::io;
use thiserror::Error;

/// Main error type for .MAP decoding operations
#[derive(Debug, Error)]
pub enum MapError {
    /// IO error occurred while sourcing pages from a file or stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A fixed-width read or seek went past the readable bytes of a block
    #[error("Buffer underrun at position {position}: requested {requested} byte(s), {available} available")]
    BufferUnderrun {
        /// Page-relative position of the failed read
        position: usize,
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes left before the end (or read limit) of the buffer
        available: usize,
    },

    /// The file is not a .MAP file (bad magic cookie)
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Unrecognized shape tag in an object block
    #[error("Unknown geometry type: {0:#04X}")]
    UnknownGeometryType(u8),
}

/// Result type alias for tabmap operations
pub type Result<T> = std::result::Result<T, MapError>;

impl MapError {
    /// Whether the error only invalidates the block being decoded.
    ///
    /// An invalid magic cookie or an I/O failure aborts the whole file.
    pub fn is_block_local(&self) -> bool {
        matches!(
            self,
            MapError::BufferUnderrun { .. } | MapError::UnknownGeometryType(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapError::UnknownGeometryType(0xFF);
        assert_eq!(err.to_string(), "Unknown geometry type: 0xFF");
    }

    #[test]
    fn test_underrun_display() {
        let err = MapError::BufferUnderrun {
            position: 510,
            requested: 4,
            available: 2,
        };
        let text = err.to_string();
        assert!(text.contains("510"));
        assert!(text.contains("requested 4"));
        assert!(text.contains("2 available"));
    }

    #[test]
    fn test_block_local() {
        assert!(MapError::UnknownGeometryType(3).is_block_local());
        assert!(!MapError::InvalidFormat("cookie".into()).is_block_local());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let map_err: MapError = io_err.into();
        assert!(matches!(map_err, MapError::Io(_)));
    }
}
