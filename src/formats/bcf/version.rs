//! BCF version handling and the binary preamble.
//!
//! The preamble at the start of every (decompressed) BCF file carries the
//! version that decides how dictionary codes are assigned:
//!
//! ```text
//! BCF preamble:
//! - 3 bytes: Magic ("BCF")
//! - 1 byte:  Major version (2)
//! - 1 byte:  Minor version (1 or 2)
//! - 4 bytes: Header text length (l_text, uint32)
//! - l_text bytes: VCF header text, NUL-terminated
//! ```
//!
//! Minor versions below [`MINOR_VERSION_IDX`] use implicit, position-based
//! codes. From that minor version on, codes may be persisted in each header
//! line's `IDX` field.
//!
//! # Example
//!
//! ```
//! use bcf_dictionary::formats::bcf::{BcfVersion, DictionaryStrategy, HeaderLineShape};
//!
//! let selection = BcfVersion::new(2, 1).select();
//! assert_eq!(selection.strategy, DictionaryStrategy::Ordinal);
//! assert_eq!(selection.shape, HeaderLineShape::Legacy);
//!
//! let selection = BcfVersion::new(2, 2).select();
//! assert_eq!(selection.strategy, DictionaryStrategy::Indexed);
//! assert_eq!(selection.shape, HeaderLineShape::Annotated);
//! ```

use crate::error::{BcfError, Result};
use flate2::read::MultiGzDecoder;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// BCF magic bytes.
const BCF_MAGIC: &[u8; 3] = b"BCF";

/// gzip magic (BGZF blocks are gzip members).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The only major version this crate reads or writes.
pub const MAJOR_VERSION: u8 = 2;

/// First minor version whose header lines may persist an `IDX` code.
pub const MINOR_VERSION_IDX: u8 = 2;

/// On-disk BCF format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BcfVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

impl BcfVersion {
    /// BCF 2.1: ordinal dictionaries, no persisted codes.
    pub const V2_1: BcfVersion = BcfVersion { major: 2, minor: 1 };

    /// BCF 2.2: indexed dictionaries, optional `IDX` codes.
    pub const V2_2: BcfVersion = BcfVersion { major: 2, minor: 2 };

    /// Create a new version.
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether header lines of this version may carry a persisted code.
    #[inline]
    pub fn supports_annotation(&self) -> bool {
        self.minor >= MINOR_VERSION_IDX
    }

    /// Choose the dictionary strategy and header-line shape for this version.
    ///
    /// Pure function of the version; the choice is made once and carried by
    /// whatever gets built from it.
    pub fn select(&self) -> VersionSelection {
        if self.supports_annotation() {
            VersionSelection {
                strategy: DictionaryStrategy::Indexed,
                shape: HeaderLineShape::Annotated,
            }
        } else {
            VersionSelection {
                strategy: DictionaryStrategy::Ordinal,
                shape: HeaderLineShape::Legacy,
            }
        }
    }

    /// Fail with [`BcfError::VersionMismatch`] unless this version supports annotations.
    pub(crate) fn require_annotation(&self, shape: &'static str) -> Result<()> {
        if self.supports_annotation() {
            Ok(())
        } else {
            Err(BcfError::VersionMismatch {
                shape,
                version: self.to_string(),
            })
        }
    }
}

impl Default for BcfVersion {
    fn default() -> Self {
        Self::V2_2
    }
}

impl fmt::Display for BcfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// How dictionary codes are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryStrategy {
    /// Code is the 0-based position in declaration order.
    Ordinal,
    /// Code is taken from the line's annotation, or assigned sequentially.
    Indexed,
}

impl fmt::Display for DictionaryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictionaryStrategy::Ordinal => write!(f, "ordinal"),
            DictionaryStrategy::Indexed => write!(f, "indexed"),
        }
    }
}

/// Which shape filter/info/format header lines take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderLineShape {
    /// No persisted code; an annotation attribute is dropped.
    Legacy,
    /// Accepts the persisted code field.
    Annotated,
}

/// Result of [`BcfVersion::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSelection {
    /// Dictionary strategy
    pub strategy: DictionaryStrategy,
    /// Header-line shape
    pub shape: HeaderLineShape,
}

/// Read and validate the BCF magic and version.
///
/// # Errors
///
/// Returns error if:
/// - Cannot read 5 bytes
/// - Magic bytes don't match "BCF"
/// - Major version is not 2
pub fn read_magic<R: Read>(reader: &mut R) -> Result<BcfVersion> {
    let mut magic = [0u8; 5];
    reader.read_exact(&mut magic)?;

    if &magic[..3] != BCF_MAGIC {
        return Err(BcfError::InvalidMagic {
            found: [magic[0], magic[1], magic[2]],
        });
    }

    let (major, minor) = (magic[3], magic[4]);
    if major != MAJOR_VERSION {
        return Err(BcfError::UnsupportedVersion { major, minor });
    }

    Ok(BcfVersion::new(major, minor))
}

/// Write the BCF magic and version.
pub fn write_magic<W: Write>(writer: &mut W, version: BcfVersion) -> Result<()> {
    if version.major != MAJOR_VERSION {
        return Err(BcfError::UnsupportedVersion {
            major: version.major,
            minor: version.minor,
        });
    }
    writer.write_all(BCF_MAGIC)?;
    writer.write_all(&[version.major, version.minor])?;
    Ok(())
}

/// Read the VCF header text block.
///
/// The stored length includes the NUL terminator, which is stripped.
/// Trailing NUL padding is tolerated.
///
/// # Errors
///
/// Returns error if:
/// - Cannot read length or text
/// - Text is not valid UTF-8
pub fn read_header_text<R: Read>(reader: &mut R) -> Result<String> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let mut text_bytes = vec![0u8; len];
    reader.read_exact(&mut text_bytes)?;

    while text_bytes.last() == Some(&0) {
        text_bytes.pop();
    }

    String::from_utf8(text_bytes).map_err(|e| BcfError::InvalidField {
        field: "header text".to_string(),
        reason: format!("invalid UTF-8: {}", e),
    })
}

/// Write the VCF header text block, appending the NUL terminator.
pub fn write_header_text<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let len = u32::try_from(text.len() + 1).map_err(|_| {
        BcfError::format(format!("header text too long: {} bytes", text.len()))
    })?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(text.as_bytes())?;
    writer.write_all(&[0])?;
    Ok(())
}

/// Read magic, version and header text from an uncompressed stream.
pub fn read_preamble<R: Read>(reader: &mut R) -> Result<(BcfVersion, String)> {
    let version = read_magic(reader)?;
    let text = read_header_text(reader)?;
    Ok((version, text))
}

/// Read the preamble of a BCF file on disk.
///
/// gzip/BGZF-compressed files are detected by their magic and decompressed
/// transparently; anything else is read as-is.
///
/// # Example
///
/// ```no_run
/// use bcf_dictionary::formats::bcf::read_preamble_from_path;
///
/// # fn main() -> bcf_dictionary::Result<()> {
/// let (version, text) = read_preamble_from_path("calls.bcf")?;
/// println!("BCF {} with {} bytes of header", version, text.len());
/// # Ok(())
/// # }
/// ```
pub fn read_preamble_from_path(path: impl AsRef<Path>) -> Result<(BcfVersion, String)> {
    let mut reader = BufReader::new(File::open(path)?);
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if compressed {
        read_preamble(&mut MultiGzDecoder::new(reader))
    } else {
        read_preamble(&mut reader)
    }
}
