//! BCF string and contig dictionaries.
//!
//! BCF records never repeat FILTER/INFO/FORMAT identifiers or contig names:
//! they store small integer codes that resolve through two dictionaries
//! derived from the VCF header.
//!
//! - **Strings dictionary**: `PASS` plus every FILTER, INFO and FORMAT ID,
//!   deduplicated (first occurrence wins).
//! - **Contig dictionary**: every `##contig` ID. IDs must be non-empty and
//!   unique.
//!
//! Two strategies exist, selected by [`BcfVersion`]:
//!
//! - **Ordinal** (BCF 2.1): the code is the 0-based position in declaration
//!   order. Nothing is persisted, so the order must be re-derived exactly the
//!   same way on write and on read. Only FILTER, INFO and FORMAT lines count:
//!   `##PEDIGREE` lines are never entries, so files from writers that did add
//!   them number every later identifier one higher per pedigree line.
//! - **Indexed** (BCF 2.2): the code is taken from each line's `IDX` field,
//!   or assigned sequentially when no line carries one. Within one dictionary
//!   either every line is annotated or none is; a mix is rejected.
//!
//! # Example
//!
//! ```
//! use bcf_dictionary::formats::bcf::{BcfHeaderCodec, BcfVersion, Dictionary};
//!
//! let text = "##fileformat=VCFv4.2\n\
//!             ###FILTER=<ID=q10,Description=\"Quality below 10\">\n\
//!             ###FILTER=<ID=s50,Description=\"Less than 50% of samples\">\n\
//!             ###INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">\n\
//!             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
//!
//! let codec = BcfHeaderCodec::new(BcfVersion::V2_1);
//! let header = codec.read_header(text)?;
//! let strings = codec.strings_dictionary(&header)?;
//!
//! assert_eq!(strings.len(), 4);
//! assert_eq!(strings.get(0)?, "PASS");
//! assert_eq!(strings.get(3)?, "DP");
//! # Ok::<(), bcf_dictionary::BcfError>(())
//! ```

use crate::error::{BcfError, Result};
use crate::formats::bcf::version::{BcfVersion, DictionaryStrategy};
use crate::formats::vcf::{Category, HeaderLine, VcfHeader};
use log::{debug, trace};
use std::collections::{btree_map, BTreeMap, HashMap};
use std::iter::Enumerate;
use std::slice;

/// Header field that persists a dictionary code.
pub const IDX_FIELD: &str = "IDX";

/// Reserved "passed all filters" identifier, always present in the strings dictionary.
pub const PASS: &str = "PASS";

/// Options shared by dictionary builders and the header-line codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryOptions {
    /// Name of the header field holding a persisted code
    pub annotation_field: String,
}

impl Default for DictionaryOptions {
    fn default() -> Self {
        Self {
            annotation_field: IDX_FIELD.to_string(),
        }
    }
}

/// One dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntry<'a> {
    /// Integer code stored in binary records
    pub code: usize,
    /// Identifier the code stands for
    pub id: &'a str,
}

/// Position-coded dictionary (BCF 2.1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdinalDictionary {
    entries: Vec<String>,
    codes: HashMap<String, usize>,
}

impl OrdinalDictionary {
    fn contains(&self, id: &str) -> bool {
        self.codes.contains_key(id)
    }

    fn push(&mut self, id: &str) -> usize {
        let code = self.entries.len();
        self.entries.push(id.to_string());
        self.codes.insert(id.to_string(), code);
        trace!("ordinal {} -> {}", code, id);
        code
    }

    fn strings(header: &VcfHeader) -> Result<Self> {
        let mut dictionary = Self::default();
        dictionary.push(PASS);

        for line in header.structured_lines().filter(|l| l.in_string_dictionary()) {
            let id = dictionary_id(line)?;
            if !dictionary.contains(id) {
                dictionary.push(id);
            }
        }

        Ok(dictionary)
    }

    fn contigs(header: &VcfHeader) -> Result<Self> {
        let mut dictionary = Self::default();

        for line in header.contig_lines() {
            let id = dictionary_id(line)?;
            if dictionary.contains(id) {
                return Err(duplicate_contig(id));
            }
            dictionary.push(id);
        }

        Ok(dictionary)
    }
}

/// Explicitly coded dictionary (BCF 2.2).
///
/// Codes need not be contiguous when they come from `IDX` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedDictionary {
    entries: BTreeMap<usize, String>,
    codes: HashMap<String, usize>,
}

impl IndexedDictionary {
    fn contains(&self, id: &str) -> bool {
        self.codes.contains_key(id)
    }

    fn insert(&mut self, code: usize, id: &str) -> Result<()> {
        if let Some(existing) = self.entries.get(&code) {
            return Err(BcfError::DuplicateCode {
                code,
                existing: existing.clone(),
                incoming: id.to_string(),
            });
        }
        self.entries.insert(code, id.to_string());
        self.codes.insert(id.to_string(), code);
        trace!("indexed {} -> {}", code, id);
        Ok(())
    }

    fn strings(header: &VcfHeader, annotation_field: &str) -> Result<Self> {
        let mut dictionary = Self::default();
        dictionary.insert(0, PASS)?;

        let mut codes = CodeAssigner::new("strings", dictionary.entries.len());
        for line in header.structured_lines().filter(|l| l.in_string_dictionary()) {
            let id = dictionary_id(line)?;
            if dictionary.contains(id) {
                continue;
            }
            let code = codes.next(line.generic_field(annotation_field), annotation_field)?;
            dictionary.insert(code, id)?;
        }

        Ok(dictionary)
    }

    fn contigs(header: &VcfHeader, annotation_field: &str) -> Result<Self> {
        let mut dictionary = Self::default();

        let mut codes = CodeAssigner::new("contig", 0);
        for line in header.contig_lines() {
            let id = dictionary_id(line)?;
            if dictionary.contains(id) {
                return Err(duplicate_contig(id));
            }
            let code = codes.next(line.generic_field(annotation_field), annotation_field)?;
            dictionary.insert(code, id)?;
        }

        Ok(dictionary)
    }
}

/// Hands out codes for one indexed dictionary, enforcing that either every
/// line is annotated or none is. The first line decides.
struct CodeAssigner {
    category: &'static str,
    next: usize,
    annotated: Option<bool>,
}

impl CodeAssigner {
    fn new(category: &'static str, first: usize) -> Self {
        Self {
            category,
            next: first,
            annotated: None,
        }
    }

    fn next(&mut self, annotation: Option<&str>, annotation_field: &str) -> Result<usize> {
        let present = annotation.is_some();
        match self.annotated {
            None => self.annotated = Some(present),
            Some(expected) if expected != present => {
                return Err(BcfError::InconsistentAnnotation {
                    category: self.category,
                });
            }
            Some(_) => {}
        }

        let code = match annotation {
            Some(text) => parse_code(annotation_field, text)?,
            None => self.next,
        };
        self.next += 1;
        Ok(code)
    }
}

fn parse_code(annotation_field: &str, text: &str) -> Result<usize> {
    text.parse().map_err(|_| BcfError::InvalidField {
        field: annotation_field.to_string(),
        reason: format!("expected a non-negative integer code, got '{}'", text),
    })
}

fn dictionary_id(line: &HeaderLine) -> Result<&str> {
    match line.id() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(BcfError::format(format!(
            "found a {} line with an invalid ID: {}",
            line.category(),
            line
        ))),
    }
}

fn duplicate_contig(id: &str) -> BcfError {
    BcfError::format(format!("contig '{}' is declared more than once", id))
}

/// A BCF dictionary, ordinal or indexed.
///
/// Built once from a fully parsed header and read-only afterwards, so a
/// shared reference can serve lookups from any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dictionary {
    /// Position-coded (BCF 2.1)
    Ordinal(OrdinalDictionary),
    /// Explicitly coded (BCF 2.2)
    Indexed(IndexedDictionary),
}

impl Dictionary {
    /// Build the strings dictionary (PASS, FILTER, INFO, FORMAT IDs).
    ///
    /// # Errors
    ///
    /// - [`BcfError::InconsistentAnnotation`] if indexed and lines mix annotated/unannotated
    /// - [`BcfError::InvalidField`] if an annotation is not a non-negative integer
    /// - [`BcfError::DuplicateCode`] if two identifiers declare the same code
    pub fn strings(
        header: &VcfHeader,
        version: BcfVersion,
        options: &DictionaryOptions,
    ) -> Result<Self> {
        let strategy = version.select().strategy;
        let dictionary = match strategy {
            DictionaryStrategy::Ordinal => Dictionary::Ordinal(OrdinalDictionary::strings(header)?),
            DictionaryStrategy::Indexed => Dictionary::Indexed(IndexedDictionary::strings(
                header,
                &options.annotation_field,
            )?),
        };
        debug!(
            "Built {} strings dictionary for BCF {}: {} entries",
            strategy,
            version,
            dictionary.len()
        );
        Ok(dictionary)
    }

    /// Build the contig dictionary.
    ///
    /// # Errors
    ///
    /// - [`BcfError::Format`] if a contig ID is missing, empty or duplicated
    /// - otherwise as [`Dictionary::strings`]
    pub fn contigs(
        header: &VcfHeader,
        version: BcfVersion,
        options: &DictionaryOptions,
    ) -> Result<Self> {
        let strategy = version.select().strategy;
        let dictionary = match strategy {
            DictionaryStrategy::Ordinal => Dictionary::Ordinal(OrdinalDictionary::contigs(header)?),
            DictionaryStrategy::Indexed => Dictionary::Indexed(IndexedDictionary::contigs(
                header,
                &options.annotation_field,
            )?),
        };
        debug!(
            "Built {} contig dictionary for BCF {}: {} entries",
            strategy,
            version,
            dictionary.len()
        );
        Ok(dictionary)
    }

    /// Strategy this dictionary was built with.
    pub fn strategy(&self) -> DictionaryStrategy {
        match self {
            Dictionary::Ordinal(_) => DictionaryStrategy::Ordinal,
            Dictionary::Indexed(_) => DictionaryStrategy::Indexed,
        }
    }

    /// Resolve a code to its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BcfError::Lookup`] if the code was never registered.
    pub fn get(&self, code: usize) -> Result<&str> {
        let id = match self {
            Dictionary::Ordinal(d) => d.entries.get(code),
            Dictionary::Indexed(d) => d.entries.get(&code),
        };
        id.map(String::as_str).ok_or(BcfError::Lookup { code })
    }

    /// Code registered for an identifier, if any.
    pub fn code_of(&self, id: &str) -> Option<usize> {
        match self {
            Dictionary::Ordinal(d) => d.codes.get(id).copied(),
            Dictionary::Indexed(d) => d.codes.get(id).copied(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Dictionary::Ordinal(d) => d.entries.len(),
            Dictionary::Indexed(d) => d.entries.len(),
        }
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in ascending code order.
    pub fn entries(&self) -> Entries<'_> {
        let inner = match self {
            Dictionary::Ordinal(d) => EntriesInner::Ordinal(d.entries.iter().enumerate()),
            Dictionary::Indexed(d) => EntriesInner::Indexed(d.entries.iter()),
        };
        Entries { inner }
    }
}

/// Iterator over [`DictionaryEntry`] values, ascending by code.
pub struct Entries<'a> {
    inner: EntriesInner<'a>,
}

enum EntriesInner<'a> {
    Ordinal(Enumerate<slice::Iter<'a, String>>),
    Indexed(btree_map::Iter<'a, usize, String>),
}

impl<'a> Iterator for Entries<'a> {
    type Item = DictionaryEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            EntriesInner::Ordinal(it) => it.next().map(|(code, id)| DictionaryEntry { code, id }),
            EntriesInner::Indexed(it) => it.next().map(|(&code, id)| DictionaryEntry { code, id }),
        }
    }
}

/// Persist every dictionary code into the header's annotation fields.
///
/// Used before writing a BCF 2.2 header so that readers recover exactly the
/// codes the writer used, whatever order they re-derive. Legacy
/// FILTER/INFO/FORMAT lines take the annotated shape.
///
/// # Errors
///
/// Returns [`BcfError::VersionMismatch`] if `version` predates 2.2, and
/// [`BcfError::Format`] if either dictionary is ordinal.
pub fn annotate_header(
    header: &mut VcfHeader,
    version: BcfVersion,
    strings: &Dictionary,
    contigs: &Dictionary,
    options: &DictionaryOptions,
) -> Result<()> {
    version.require_annotation("Persisting dictionary codes")?;
    if strings.strategy() == DictionaryStrategy::Ordinal
        || contigs.strategy() == DictionaryStrategy::Ordinal
    {
        return Err(BcfError::format(
            "ordinal dictionary codes are positional and cannot be persisted",
        ));
    }

    for line in header.structured_lines_mut() {
        let dictionary = if line.in_string_dictionary() {
            strings
        } else if line.category() == Category::Contig {
            contigs
        } else {
            continue;
        };

        if let Some(code) = line.id().and_then(|id| dictionary.code_of(id)) {
            line.set_annotation(version, &options.annotation_field, code)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::bcf::{BcfHeaderCodec, HeaderLineShape, PlainVcfLines};

    const SCENARIO: &str = "##fileformat=VCFv4.2\n\
        ##FILTER=<ID=q10,Description=\"Quality below 10\">\n\
        ##FILTER=<ID=s50,Description=\"Less than 50% of samples have data\">\n\
        ##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

    fn header(version: BcfVersion, text: &str) -> VcfHeader {
        BcfHeaderCodec::new(version).read_header(text).unwrap()
    }

    fn strings(version: BcfVersion, text: &str) -> Result<Dictionary> {
        Dictionary::strings(&header(version, text), version, &DictionaryOptions::default())
    }

    fn contigs(version: BcfVersion, text: &str) -> Result<Dictionary> {
        Dictionary::contigs(&header(version, text), version, &DictionaryOptions::default())
    }

    fn ids(dictionary: &Dictionary) -> Vec<(usize, String)> {
        dictionary
            .entries()
            .map(|e| (e.code, e.id.to_string()))
            .collect()
    }

    #[test]
    fn test_ordinal_scenario() {
        let dict = strings(BcfVersion::V2_1, SCENARIO).unwrap();
        assert_eq!(dict.strategy(), DictionaryStrategy::Ordinal);
        assert_eq!(
            ids(&dict),
            vec![
                (0, "PASS".to_string()),
                (1, "q10".to_string()),
                (2, "s50".to_string()),
                (3, "DP".to_string()),
            ]
        );
        assert_eq!(dict.get(3).unwrap(), "DP");
        assert_eq!(dict.code_of("s50"), Some(2));
    }

    #[test]
    fn test_indexed_scenario_unannotated() {
        let dict = strings(BcfVersion::V2_2, SCENARIO).unwrap();
        assert_eq!(dict.strategy(), DictionaryStrategy::Indexed);
        assert_eq!(dict.get(0).unwrap(), "PASS");
        assert_eq!(dict.get(1).unwrap(), "q10");
        assert_eq!(dict.get(2).unwrap(), "s50");
        assert_eq!(dict.get(3).unwrap(), "DP");
    }

    #[test]
    fn test_indexed_scenario_annotated() {
        let text = "##FILTER=<ID=q10,Description=\"Quality below 10\",IDX=5>\n\
            ##FILTER=<ID=s50,Description=\"Less than half\",IDX=7>\n\
            ##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\",IDX=2>\n";
        let dict = strings(BcfVersion::V2_2, text).unwrap();
        assert_eq!(dict.get(5).unwrap(), "q10");
        assert_eq!(dict.get(7).unwrap(), "s50");
        assert_eq!(dict.get(2).unwrap(), "DP");
        assert_eq!(dict.get(0).unwrap(), "PASS");
        assert!(matches!(dict.get(1), Err(BcfError::Lookup { code: 1 })));
        assert_eq!(dict.len(), 4);

        let codes: Vec<usize> = dict.entries().map(|e| e.code).collect();
        assert_eq!(codes, vec![0, 2, 5, 7]);
    }

    #[test]
    fn test_indexed_mixed_annotation_fails() {
        let text = "##FILTER=<ID=q10,Description=\"x\",IDX=1>\n\
            ##INFO=<ID=DP,Number=1,Type=Integer,Description=\"y\">\n";
        assert!(matches!(
            strings(BcfVersion::V2_2, text),
            Err(BcfError::InconsistentAnnotation { category: "strings" })
        ));

        // First line unannotated, later one annotated
        let text = "##FILTER=<ID=q10,Description=\"x\">\n\
            ##INFO=<ID=DP,Number=1,Type=Integer,Description=\"y\",IDX=2>\n";
        assert!(matches!(
            strings(BcfVersion::V2_2, text),
            Err(BcfError::InconsistentAnnotation { .. })
        ));
    }

    #[test]
    fn test_ordinal_ignores_annotations() {
        // Legacy lines drop IDX, so a mix is harmless in 2.1
        let text = "##FILTER=<ID=q10,Description=\"x\",IDX=9>\n\
            ##INFO=<ID=DP,Number=1,Type=Integer,Description=\"y\">\n";
        let dict = strings(BcfVersion::V2_1, text).unwrap();
        assert_eq!(dict.get(1).unwrap(), "q10");
        assert_eq!(dict.get(2).unwrap(), "DP");
    }

    #[test]
    fn test_duplicate_strings_deduplicated() {
        let text = "##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Depth\">\n\
            ##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Sample depth\">\n\
            ##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n";
        for version in [BcfVersion::V2_1, BcfVersion::V2_2] {
            let dict = strings(version, text).unwrap();
            assert_eq!(dict.len(), 3);
            assert_eq!(dict.get(1).unwrap(), "DP");
            assert_eq!(dict.get(2).unwrap(), "GT");
        }
    }

    #[test]
    fn test_explicit_pass_line_is_deduplicated() {
        let text = "##FILTER=<ID=PASS,Description=\"All filters passed\",IDX=0>\n\
            ##FILTER=<ID=q10,Description=\"x\",IDX=1>\n";
        let dict = strings(BcfVersion::V2_2, text).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(0).unwrap(), "PASS");
        assert_eq!(dict.get(1).unwrap(), "q10");

        // Unannotated PASS does not decide the mode either
        let text = "##FILTER=<ID=PASS,Description=\"All filters passed\">\n\
            ##FILTER=<ID=q10,Description=\"x\",IDX=3>\n";
        let dict = strings(BcfVersion::V2_2, text).unwrap();
        assert_eq!(dict.get(3).unwrap(), "q10");
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let text = "##FILTER=<ID=q10,Description=\"x\",IDX=1>\n\
            ##FILTER=<ID=s50,Description=\"y\",IDX=1>\n";
        assert!(matches!(
            strings(BcfVersion::V2_2, text),
            Err(BcfError::DuplicateCode { code: 1, .. })
        ));

        // Colliding with the PASS sentinel
        let text = "##FILTER=<ID=q10,Description=\"x\",IDX=0>\n";
        assert!(matches!(
            strings(BcfVersion::V2_2, text),
            Err(BcfError::DuplicateCode { code: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_contig_code_rejected() {
        let text = "##contig=<ID=chr1,IDX=0>\n##contig=<ID=chr2,IDX=0>\n";
        match contigs(BcfVersion::V2_2, text) {
            Err(BcfError::DuplicateCode {
                code,
                existing,
                incoming,
            }) => {
                assert_eq!(code, 0);
                assert_eq!(existing, "chr1");
                assert_eq!(incoming, "chr2");
            }
            other => panic!("expected DuplicateCode, got {:?}", other),
        }

        // Ordinal contigs ignore the annotation
        let dict = contigs(BcfVersion::V2_1, text).unwrap();
        assert_eq!(dict.get(1).unwrap(), "chr2");
    }

    #[test]
    fn test_non_integer_annotation_rejected() {
        for idx in ["x", "-1", "1.5", ""] {
            let text = format!("##FILTER=<ID=q10,Description=\"x\",IDX=\"{}\">\n", idx);
            assert!(matches!(
                strings(BcfVersion::V2_2, &text),
                Err(BcfError::InvalidField { .. })
            ));
        }
    }

    #[test]
    fn test_contigs_ordinal() {
        let text = "##contig=<ID=chr1,length=1000>\n##contig=<ID=chr2,length=2000>\n";
        let dict = contigs(BcfVersion::V2_1, text).unwrap();
        assert_eq!(ids(&dict), vec![(0, "chr1".to_string()), (1, "chr2".to_string())]);
    }

    #[test]
    fn test_contigs_indexed() {
        let dict = contigs(BcfVersion::V2_2, "##contig=<ID=chr1>\n##contig=<ID=chr2>\n").unwrap();
        assert_eq!(dict.get(0).unwrap(), "chr1");
        assert_eq!(dict.get(1).unwrap(), "chr2");

        let dict = contigs(BcfVersion::V2_2, "##contig=<ID=chr1,IDX=3>\n##contig=<ID=chr2,IDX=1>\n").unwrap();
        assert_eq!(dict.get(3).unwrap(), "chr1");
        assert_eq!(dict.get(1).unwrap(), "chr2");

        assert!(matches!(
            contigs(BcfVersion::V2_2, "##contig=<ID=chr1,IDX=0>\n##contig=<ID=chr2>\n"),
            Err(BcfError::InconsistentAnnotation { category: "contig" })
        ));
    }

    #[test]
    fn test_contig_invalid_ids() {
        for version in [BcfVersion::V2_1, BcfVersion::V2_2] {
            assert!(matches!(
                contigs(version, "##contig=<ID=\"\",length=10>\n"),
                Err(BcfError::Format { .. })
            ));
            assert!(matches!(
                contigs(version, "##contig=<length=10>\n"),
                Err(BcfError::Format { .. })
            ));
            assert!(matches!(
                contigs(version, "##contig=<ID=chr1>\n##contig=<ID=chr1>\n"),
                Err(BcfError::Format { .. })
            ));
        }
    }

    #[test]
    fn test_empty_contig_dictionary() {
        let dict = contigs(BcfVersion::V2_2, SCENARIO).unwrap();
        assert!(dict.is_empty());
        assert!(matches!(dict.get(0), Err(BcfError::Lookup { code: 0 })));
    }

    #[test]
    fn test_custom_annotation_field() {
        let options = DictionaryOptions {
            annotation_field: "CODE".to_string(),
        };
        let codec = BcfHeaderCodec::with_options(BcfVersion::V2_2, options.clone());
        let header = codec
            .read_header("##contig=<ID=chr1,CODE=4>\n##contig=<ID=chr2,CODE=2>\n")
            .unwrap();
        let dict = Dictionary::contigs(&header, BcfVersion::V2_2, &options).unwrap();
        assert_eq!(dict.get(4).unwrap(), "chr1");
        assert_eq!(dict.get(2).unwrap(), "chr2");
    }

    #[test]
    fn test_annotate_header() {
        let version = BcfVersion::V2_2;
        let options = DictionaryOptions::default();
        let mut header = header(version, &SCENARIO.replace("#CHROM", "##contig=<ID=chr1>\n#CHROM"));
        let strings = Dictionary::strings(&header, version, &options).unwrap();
        let contigs = Dictionary::contigs(&header, version, &options).unwrap();

        annotate_header(&mut header, version, &strings, &contigs, &options).unwrap();

        let annotated: Vec<_> = header
            .structured_lines()
            .map(|l| (l.id().unwrap().to_string(), l.generic_field(IDX_FIELD).map(str::to_string)))
            .collect();
        assert_eq!(
            annotated,
            vec![
                ("q10".to_string(), Some("1".to_string())),
                ("s50".to_string(), Some("2".to_string())),
                ("DP".to_string(), Some("3".to_string())),
                ("chr1".to_string(), Some("0".to_string())),
            ]
        );

        // Rebuilding from the annotated header yields the same codes
        assert_eq!(Dictionary::strings(&header, version, &options).unwrap(), strings);
    }

    #[test]
    fn test_annotate_header_rejects_ordinal() {
        let version = BcfVersion::V2_1;
        let options = DictionaryOptions::default();
        let mut header = header(version, SCENARIO);
        let strings = Dictionary::strings(&header, version, &options).unwrap();
        let contigs = Dictionary::contigs(&header, version, &options).unwrap();
        match annotate_header(&mut header, version, &strings, &contigs, &options) {
            Err(BcfError::VersionMismatch { version, .. }) => assert_eq!(version, "2.1"),
            other => panic!("expected VersionMismatch, got {:?}", other),
        }

        // Ordinal dictionaries under a 2.2 version
        assert!(matches!(
            annotate_header(&mut header, BcfVersion::V2_2, &strings, &contigs, &options),
            Err(BcfError::Format { .. })
        ));
    }

    #[test]
    fn test_annotate_plain_vcf_header() {
        let version = BcfVersion::V2_2;
        let options = DictionaryOptions::default();
        let mut header = VcfHeader::from_text(SCENARIO, &PlainVcfLines::default()).unwrap();
        let strings = Dictionary::strings(&header, version, &options).unwrap();
        let contigs = Dictionary::contigs(&header, version, &options).unwrap();

        annotate_header(&mut header, version, &strings, &contigs, &options).unwrap();
        assert!(header
            .structured_lines()
            .all(|l| l.shape() == HeaderLineShape::Annotated));
        assert_eq!(Dictionary::strings(&header, version, &options).unwrap(), strings);
    }
}
