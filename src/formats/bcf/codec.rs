//! Version-aware header-line construction and BCF header loading.
//!
//! [`BcfHeaderCodec`] captures a [`BcfVersion`] and hands the VCF header
//! reader the right constructor for each line category: FILTER, INFO and
//! FORMAT lines take the annotated shape from BCF 2.2 on and the legacy
//! shape before. Every other category is built the same way regardless of
//! version.
//!
//! [`BcfHeader`] ties the pieces together for one file: version, parsed
//! header, and the two dictionaries built from it.
//!
//! # Example
//!
//! ```
//! use bcf_dictionary::formats::bcf::{BcfHeader, BcfVersion};
//! use std::io::Cursor;
//!
//! # fn main() -> bcf_dictionary::Result<()> {
//! let text = "##fileformat=VCFv4.2\n\
//!             ###FILTER=<ID=q10,Description=\"Quality below 10\",IDX=1>\n\
//!             ###contig=<ID=chr1,length=1000,IDX=0>\n\
//!             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
//!
//! let mut data = Vec::new();
//! BcfHeader::from_text(BcfVersion::V2_2, text)?.write(&mut data)?;
//!
//! let header = BcfHeader::read(&mut Cursor::new(data))?;
//! assert_eq!(header.version(), BcfVersion::V2_2);
//! assert_eq!(header.strings().get(1)?, "q10");
//! assert_eq!(header.contigs().get(0)?, "chr1");
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::formats::bcf::dictionary::{annotate_header, Dictionary, DictionaryOptions};
use crate::formats::bcf::version::{
    read_preamble, read_preamble_from_path, write_header_text, write_magic, BcfVersion,
    HeaderLineShape,
};
use crate::formats::vcf::{Category, HeaderLine, HeaderLineFactory, VcfHeader};
use std::io::{Read, Write};
use std::path::Path;

/// Signature shared by the header-line constructors.
///
/// Arguments: version, header key, fields, annotation field name.
pub type LineConstructor = fn(BcfVersion, &str, Vec<(String, String)>, &str) -> Result<HeaderLine>;

fn legacy_line(
    _version: BcfVersion,
    key: &str,
    fields: Vec<(String, String)>,
    annotation_field: &str,
) -> Result<HeaderLine> {
    HeaderLine::legacy(key, fields, annotation_field)
}

fn annotated_line(
    version: BcfVersion,
    key: &str,
    fields: Vec<(String, String)>,
    annotation_field: &str,
) -> Result<HeaderLine> {
    HeaderLine::annotated(version, key, fields, annotation_field)
}

/// Header-line factory for BCF files of one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcfHeaderCodec {
    version: BcfVersion,
    options: DictionaryOptions,
}

impl BcfHeaderCodec {
    /// Create a codec using the default `IDX` annotation field.
    pub fn new(version: BcfVersion) -> Self {
        Self::with_options(version, DictionaryOptions::default())
    }

    /// Create a codec with explicit options.
    pub fn with_options(version: BcfVersion, options: DictionaryOptions) -> Self {
        Self { version, options }
    }

    /// Version this codec was created for.
    pub fn version(&self) -> BcfVersion {
        self.version
    }

    /// Options this codec was created with.
    pub fn options(&self) -> &DictionaryOptions {
        &self.options
    }

    /// Constructor to use for lines of `category`.
    pub fn constructor(&self, category: Category) -> LineConstructor {
        match (category.is_versioned(), self.version.select().shape) {
            (true, HeaderLineShape::Annotated) => annotated_line,
            _ => legacy_line,
        }
    }

    /// Parse VCF header text with this codec's line shapes.
    pub fn read_header(&self, text: &str) -> Result<VcfHeader> {
        VcfHeader::from_text(text, self)
    }

    /// Build the strings dictionary for `header`.
    pub fn strings_dictionary(&self, header: &VcfHeader) -> Result<Dictionary> {
        Dictionary::strings(header, self.version, &self.options)
    }

    /// Build the contig dictionary for `header`.
    pub fn contig_dictionary(&self, header: &VcfHeader) -> Result<Dictionary> {
        Dictionary::contigs(header, self.version, &self.options)
    }
}

impl HeaderLineFactory for BcfHeaderCodec {
    fn build_line(&self, key: &str, fields: Vec<(String, String)>) -> Result<HeaderLine> {
        let constructor = self.constructor(Category::from_key(key));
        constructor(self.version, key, fields, &self.options.annotation_field)
    }
}

/// Header-line factory for plain VCF text: every line takes the legacy shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlainVcfLines {
    options: DictionaryOptions,
}

impl PlainVcfLines {
    /// Create a factory with explicit options.
    pub fn with_options(options: DictionaryOptions) -> Self {
        Self { options }
    }
}

impl HeaderLineFactory for PlainVcfLines {
    fn build_line(&self, key: &str, fields: Vec<(String, String)>) -> Result<HeaderLine> {
        HeaderLine::legacy(key, fields, &self.options.annotation_field)
    }
}

/// A loaded BCF header: version, VCF header, and its dictionaries.
///
/// Dictionaries are built once, when the header is loaded or created, and
/// live as long as this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcfHeader {
    codec: BcfHeaderCodec,
    header: VcfHeader,
    strings: Dictionary,
    contigs: Dictionary,
}

impl BcfHeader {
    /// Build dictionaries for an already parsed header.
    ///
    /// FILTER/INFO/FORMAT lines whose shape differs from the one `codec`
    /// builds (for example a header read with [`PlainVcfLines`]) are rebuilt
    /// through `codec` first.
    pub fn new(codec: BcfHeaderCodec, mut header: VcfHeader) -> Result<Self> {
        let shape = codec.version().select().shape;
        for line in header.structured_lines_mut() {
            if line.category().is_versioned() && line.shape() != shape {
                let rebuilt = codec.build_line(line.key(), line.fields().to_vec())?;
                *line = rebuilt;
            }
        }

        let strings = codec.strings_dictionary(&header)?;
        let contigs = codec.contig_dictionary(&header)?;
        Ok(Self {
            codec,
            header,
            strings,
            contigs,
        })
    }

    /// Parse header text for `version` and build its dictionaries.
    pub fn from_text(version: BcfVersion, text: &str) -> Result<Self> {
        let codec = BcfHeaderCodec::new(version);
        let header = codec.read_header(text)?;
        Self::new(codec, header)
    }

    /// Read the preamble from an uncompressed stream and load the header.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let (version, text) = read_preamble(reader)?;
        Self::from_text(version, &text)
    }

    /// Read the preamble of a BCF file (plain or gzip/BGZF) and load the header.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let (version, text) = read_preamble_from_path(path)?;
        Self::from_text(version, &text)
    }

    /// Write magic, version and header text.
    ///
    /// From BCF 2.2 on, every dictionary code is persisted in the written
    /// header, so readers recover exactly these codes.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let text = if self.version().supports_annotation() {
            let mut header = self.header.clone();
            annotate_header(
                &mut header,
                self.version(),
                &self.strings,
                &self.contigs,
                self.codec.options(),
            )?;
            header.to_text()
        } else {
            self.header.to_text()
        };

        write_magic(writer, self.version())?;
        write_header_text(writer, &text)
    }

    /// BCF version.
    pub fn version(&self) -> BcfVersion {
        self.codec.version()
    }

    /// Parsed VCF header.
    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    /// Strings dictionary (PASS, FILTER, INFO, FORMAT).
    pub fn strings(&self) -> &Dictionary {
        &self.strings
    }

    /// Contig dictionary.
    pub fn contigs(&self) -> &Dictionary {
        &self.contigs
    }
}
