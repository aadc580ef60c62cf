//! Variant file formats.
//!
//! - [`vcf`]: VCF header lines and header model
//! - [`bcf`]: BCF version handling and header dictionaries

pub mod bcf;
pub mod vcf;

// Re-export commonly used types
pub use bcf::{BcfHeader, BcfHeaderCodec, BcfVersion, Dictionary, DictionaryOptions};
pub use vcf::{Category, HeaderLine, VcfHeader};
