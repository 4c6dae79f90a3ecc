//! Error types for repmin operations.
//!
//! Persistence is the only fallible surface of the library: queries return
//! empty results rather than errors, and contract violations (k > 32,
//! windows longer than the sequence) panic at the call site. Everything
//! that can legitimately fail at runtime funnels into [`RepminError`].

use std::fmt;
use std::io;

/// Error type for index persistence.
#[derive(Debug)]
pub enum RepminError {
    /// An underlying read or write failed. `operation` names what was being
    /// done so a bare os-level message still points at the right field.
    Io {
        operation: String,
        source: io::Error,
    },

    /// The persisted stream is not a valid index: truncated, or a header
    /// field / code sequence that no writer could have produced.
    Corrupt { detail: String },
}

impl RepminError {
    /// Create an I/O error with operation context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        RepminError::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a corrupt-index error.
    pub fn corrupt(detail: impl Into<String>) -> Self {
        RepminError::Corrupt {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RepminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepminError::Io { operation, source } => {
                write!(f, "I/O error while {}: {}", operation, source)
            }
            RepminError::Corrupt { detail } => {
                write!(f, "corrupt repeat index: {}", detail)
            }
        }
    }
}

impl std::error::Error for RepminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepminError::Io { source, .. } => Some(source),
            RepminError::Corrupt { .. } => None,
        }
    }
}

/// Convenience alias used by the persistence functions.
pub type Result<T> = std::result::Result<T, RepminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = RepminError::io(
            "reading k-mer code 3 of 10",
            io::Error::new(io::ErrorKind::UnexpectedEof, "eof"),
        );
        let msg = err.to_string();
        assert!(msg.contains("reading k-mer code 3 of 10"));
        assert!(msg.contains("eof"));
    }

    #[test]
    fn test_corrupt_error_display() {
        let err = RepminError::corrupt("k-mer length 40 exceeds 32");
        assert_eq!(
            err.to_string(),
            "corrupt repeat index: k-mer length 40 exceeds 32"
        );
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = RepminError::io("writing header", io::Error::other("disk full"));
        assert!(err.source().is_some());
        let corrupt = RepminError::corrupt("bad");
        assert!(corrupt.source().is_none());
    }
}
