//! Error types for bcf-dictionary

use thiserror::Error;

/// Result type alias for bcf-dictionary operations
pub type Result<T> = std::result::Result<T, BcfError>;

/// Error types that can occur while building header lines and dictionaries.
///
/// Every variant is fatal to the enclosing header load. Dictionary codes are
/// referenced by position from every binary record, so nothing here is retried
/// or defaulted.
#[derive(Debug, Error)]
pub enum BcfError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally invalid header content (e.g. empty or duplicate contig ID)
    #[error("Invalid format: {msg}")]
    Format {
        /// Error message
        msg: String,
    },

    /// A header field holds a value that cannot be interpreted
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Sibling lines of one category mix annotated and unannotated declarations
    #[error("Inconsistent {category} annotation usage: either every line carries an explicit code or none does")]
    InconsistentAnnotation {
        /// Category whose lines disagree ("strings" or "contig")
        category: &'static str,
    },

    /// Two lines declared the same explicit code
    #[error("Duplicate dictionary code {code}: already assigned to '{existing}', requested by '{incoming}'")]
    DuplicateCode {
        /// The contested code
        code: usize,
        /// Identifier that registered the code first
        existing: String,
        /// Identifier that tried to register it again
        incoming: String,
    },

    /// A code was requested that the dictionary never registered
    #[error("No dictionary entry for code {code}")]
    Lookup {
        /// The unregistered code
        code: usize,
    },

    /// An annotation-capable construct was used against a pre-threshold version
    #[error("{shape} requires BCF version 2.2 or later, got {version}")]
    VersionMismatch {
        /// What was being constructed
        shape: &'static str,
        /// The offending version, rendered as major.minor
        version: String,
    },

    /// The binary preamble does not start with the BCF magic
    #[error("Invalid BCF magic: expected \"BCF\", got {found:?}")]
    InvalidMagic {
        /// Bytes found in place of the magic
        found: [u8; 3],
    },

    /// The preamble names a major version this crate cannot read
    #[error("Unsupported BCF version {major}.{minor}: only 2.x is supported")]
    UnsupportedVersion {
        /// Major version
        major: u8,
        /// Minor version
        minor: u8,
    },
}

impl BcfError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        BcfError::Format { msg: msg.into() }
    }
}
