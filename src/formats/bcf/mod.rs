//! BCF header dictionaries.
//!
//! BCF encodes FILTER/INFO/FORMAT identifiers and contig names as integer
//! codes resolved through dictionaries derived from the VCF header. How codes
//! are assigned depends on the on-disk version:
//!
//! | Version | Strategy  | FILTER/INFO/FORMAT lines | Codes                     |
//! |---------|-----------|--------------------------|---------------------------|
//! | 2.1     | Ordinal   | Legacy shape             | Declaration position      |
//! | 2.2     | Indexed   | Annotated shape          | `IDX` field or sequential |
//!
//! # Module Organization
//!
//! - [`version`]: version selection and the binary preamble
//! - [`dictionary`]: string and contig dictionaries
//! - [`codec`]: version-aware header-line construction, header loading

pub mod codec;
pub mod dictionary;
pub mod version;

pub use codec::{BcfHeader, BcfHeaderCodec, LineConstructor, PlainVcfLines};
pub use dictionary::{
    annotate_header, Dictionary, DictionaryEntry, DictionaryOptions, Entries, IndexedDictionary,
    OrdinalDictionary, IDX_FIELD, PASS,
};
pub use version::{
    read_header_text, read_magic, read_preamble, read_preamble_from_path, write_header_text,
    write_magic, BcfVersion, DictionaryStrategy, HeaderLineShape, VersionSelection,
    MAJOR_VERSION, MINOR_VERSION_IDX,
};
