//! Error types for lbarc operations.
//!
//! A single error type covers codec failures, container parsing failures and
//! rejected container mutations. None of these conditions are transient: a
//! corrupt stream or a violated structural rule stays that way for the input
//! that produced it, so nothing in the workspace retries on error.

use std::io;
use thiserror::Error;

/// The main error type for lbarc operations.
#[derive(Debug, Error)]
pub enum LbarcError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Codec identifier outside of Store (0), LZSS (1) and LZMIT (2).
    #[error("Invalid codec id: {id}")]
    InvalidCodec {
        /// The raw codec identifier.
        id: u16,
    },

    /// A stored (codec 0) record whose decoded and encoded sizes disagree.
    #[error("Size mismatch in stored record at offset {offset:#x}: decoded {decoded}, encoded {encoded}")]
    SizeMismatch {
        /// Byte offset of the record header.
        offset: u64,
        /// Declared decoded size.
        decoded: u32,
        /// Declared encoded size.
        encoded: u32,
    },

    /// The offset table ended without an end-of-file marker.
    #[error("Offset table has no EOF entry (scanned {slots} slots)")]
    MissingEof {
        /// Number of table slots read before giving up.
        slots: usize,
    },

    /// Compressed stream is malformed.
    #[error("Corrupt stream at offset {offset}: {message}")]
    CorruptStream {
        /// Byte offset in the compressed input.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Attempt to remove or duplicate the terminal EOF entry.
    #[error("Entry {index} is protected")]
    ProtectedEntry {
        /// Index of the protected entry.
        index: usize,
    },

    /// Entry or child index outside of the valid range.
    #[error("Index out of range: {what} {index} (valid 0..={max})")]
    OutOfRange {
        /// What kind of index was rejected.
        what: &'static str,
        /// The rejected index.
        index: usize,
        /// Largest valid index.
        max: usize,
    },

    /// Only normal records can be stored as hidden children.
    #[error("A {kind} record cannot be stored as a child")]
    InvalidChildKind {
        /// Kind of the rejected record.
        kind: &'static str,
    },

    /// Invalid header or record layout.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Unexpected end of file.
    #[error("Unexpected end of file: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },
}

/// Result type alias for lbarc operations.
pub type Result<T> = std::result::Result<T, LbarcError>;

impl LbarcError {
    /// Create an invalid codec error.
    pub fn invalid_codec(id: u16) -> Self {
        Self::InvalidCodec { id }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(offset: u64, decoded: u32, encoded: u32) -> Self {
        Self::SizeMismatch {
            offset,
            decoded,
            encoded,
        }
    }

    /// Create a missing EOF error.
    pub fn missing_eof(slots: usize) -> Self {
        Self::MissingEof { slots }
    }

    /// Create a corrupt stream error.
    pub fn corrupt_stream(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptStream {
            offset,
            message: message.into(),
        }
    }

    /// Create a protected entry error.
    pub fn protected_entry(index: usize) -> Self {
        Self::ProtectedEntry { index }
    }

    /// Create an out of range error.
    pub fn out_of_range(what: &'static str, index: usize, max: usize) -> Self {
        Self::OutOfRange { what, index, max }
    }

    /// Create an invalid child kind error.
    pub fn invalid_child_kind(kind: &'static str) -> Self {
        Self::InvalidChildKind { kind }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LbarcError::invalid_codec(7);
        assert!(err.to_string().contains("Invalid codec id: 7"));

        let err = LbarcError::size_mismatch(0x10, 4, 2);
        assert!(err.to_string().contains("0x10"));

        let err = LbarcError::corrupt_stream(12, "distance 40 exceeds 3 produced bytes");
        assert!(err.to_string().contains("distance 40"));

        let err = LbarcError::out_of_range("entry", 9, 3);
        assert_eq!(err.to_string(), "Index out of range: entry 9 (valid 0..=3)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: LbarcError = io_err.into();
        assert!(matches!(err, LbarcError::Io(_)));
    }
}
