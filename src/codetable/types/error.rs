//! Custom error types for the codetable crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum CodeTableError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The stream ended in the middle of a record. Decoding cannot continue
    /// because the next length byte can no longer be trusted.
    #[error("Truncated record at offset {offset:#x}: needed {needed} bytes for {field}, only {available} left")]
    TruncatedRecord {
        offset: usize,
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// A length byte describes a field that cannot exist (odd or negative
    /// UTF-16LE byte count, empty code).
    #[error("Invalid {field} length {length} in record at offset {offset:#x}")]
    InvalidLength {
        offset: usize,
        field: &'static str,
        length: i32,
    },

    /// The bytes of a field are not valid in their declared encoding.
    #[error("Invalid {field} encoding in record at offset {offset:#x}")]
    InvalidEncoding { offset: usize, field: &'static str },

    /// A record does not fit the one-byte length fields of the format.
    #[error("Record too large: code '{code}' is {code_len} bytes (max {max_code}), word is {word_len} bytes (max {max_word})")]
    RecordTooLarge {
        code: String,
        code_len: usize,
        word_len: usize,
        max_code: usize,
        max_word: usize,
    },

    /// A code contains characters outside `a..=z`.
    #[error("Invalid code '{0}': only lowercase ASCII letters are allowed")]
    InvalidCode(String),

    /// The data region no longer fits the 32-bit offsets of the index table.
    #[error("Data region of {size} bytes exceeds the 32-bit index range")]
    IndexOverflow { size: u64 },

    /// A tabular source is not well-formed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A tabular source lacks a required column.
    #[error("Missing column '{0}' in table header")]
    MissingColumn(&'static str),

    /// The file is structurally invalid or does not conform to the format.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

impl CodeTableError {
    /// Returns `true` for failures that only invalidate a single record.
    ///
    /// The decoder skips such records and keeps scanning; everything else
    /// ends the scan.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CodeTableError::InvalidLength { .. } | CodeTableError::InvalidEncoding { .. }
        )
    }
}

/// A convenience `Result` type alias using the crate's `CodeTableError` type.
pub type Result<T> = std::result::Result<T, CodeTableError>;
