//! bcf-dictionary: BCF string and contig dictionaries
//!
//! # Overview
//!
//! BCF, the binary encoding of VCF, stores FILTER/INFO/FORMAT identifiers and
//! contig names as small integer codes. The codes resolve through two
//! dictionaries derived from the VCF header, and every binary record depends
//! on the writer and the reader deriving exactly the same ones.
//!
//! Two incompatible strategies exist, chosen by the on-disk version:
//!
//! - **BCF 2.1**: codes are implicit, the 0-based declaration position.
//! - **BCF 2.2**: codes may be persisted in each header line's `IDX` field.
//!
//! ## Quick Start
//!
//! ```
//! use bcf_dictionary::{BcfHeaderCodec, BcfVersion};
//!
//! # fn main() -> bcf_dictionary::Result<()> {
//! let text = "##fileformat=VCFv4.2\n\
//!             ###FILTER=<ID=q10,Description=\"Quality below 10\",IDX=5>\n\
//!             ###INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\",IDX=2>\n\
//!             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
//!
//! let codec = BcfHeaderCodec::new(BcfVersion::V2_2);
//! let header = codec.read_header(text)?;
//! let strings = codec.strings_dictionary(&header)?;
//!
//! assert_eq!(strings.get(0)?, "PASS");
//! assert_eq!(strings.get(5)?, "q10");
//! assert_eq!(strings.get(2)?, "DP");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`formats::vcf`]: header lines (version-gated shapes) and header model
//! - [`formats::bcf`]: version selection, preamble, dictionaries, codec
//! - [`error`]: error taxonomy

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod formats;

// Re-export commonly used types
pub use error::{BcfError, Result};
pub use formats::bcf::{
    BcfHeader, BcfHeaderCodec, BcfVersion, Dictionary, DictionaryOptions, DictionaryStrategy,
};
pub use formats::vcf::{Category, HeaderLine, VcfHeader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
