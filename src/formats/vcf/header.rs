//! VCF header model.
//!
//! Holds the meta-information lines of a VCF header in declaration order,
//! which is the order dictionaries are derived from. Only the subset needed
//! to build BCF dictionaries is read:
//!
//! ```text
//! ##fileformat=VCFv4.2                                  file format
//! ##FILTER=<ID=q10,Description="Quality below 10">      structured line
//! ##source=caller-1.0                                   unstructured line
//! #CHROM  POS  ID  REF  ALT  QUAL  FILTER  INFO  FORMAT  s1  column line
//! ```
//!
//! How each structured line is turned into a [`HeaderLine`] is delegated to
//! a [`HeaderLineFactory`], so the same reader serves plain VCF and every BCF
//! version.

use crate::error::{BcfError, Result};
use crate::formats::vcf::header_line::{Category, HeaderLine};

/// Column names preceding the sample columns.
const FIXED_COLUMNS: [&str; 8] = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];

/// Builds a [`HeaderLine`] from a parsed `##KEY=<...>` line.
///
/// Implementations decide which shape each category takes.
pub trait HeaderLineFactory {
    /// Build the line for `key` from its fields in declaration order.
    fn build_line(&self, key: &str, fields: Vec<(String, String)>) -> Result<HeaderLine>;
}

/// A meta-information line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaLine {
    /// `##KEY=<...>`
    Structured(HeaderLine),
    /// `##key=value`
    Unstructured {
        /// Key
        key: String,
        /// Value, verbatim
        value: String,
    },
}

/// A VCF header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcfHeader {
    /// `##fileformat` value (e.g. "VCFv4.2")
    pub fileformat: Option<String>,
    /// Sample names from the column line
    pub samples: Vec<String>,
    lines: Vec<MetaLine>,
}

impl VcfHeader {
    /// Create an empty header with the given file format.
    pub fn new(fileformat: impl Into<String>) -> Self {
        Self {
            fileformat: Some(fileformat.into()),
            ..Self::default()
        }
    }

    /// Append a structured line.
    pub fn push_line(&mut self, line: HeaderLine) {
        self.lines.push(MetaLine::Structured(line));
    }

    /// Append an unstructured `##key=value` line.
    pub fn push_unstructured(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.lines.push(MetaLine::Unstructured {
            key: key.into(),
            value: value.into(),
        });
    }

    /// All meta lines in declaration order (excluding `##fileformat`).
    pub fn meta_lines(&self) -> &[MetaLine] {
        &self.lines
    }

    /// Structured lines in declaration order.
    pub fn structured_lines(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines.iter().filter_map(|line| match line {
            MetaLine::Structured(line) => Some(line),
            MetaLine::Unstructured { .. } => None,
        })
    }

    /// Structured lines in declaration order, mutably.
    pub fn structured_lines_mut(&mut self) -> impl Iterator<Item = &mut HeaderLine> {
        self.lines.iter_mut().filter_map(|line| match line {
            MetaLine::Structured(line) => Some(line),
            MetaLine::Unstructured { .. } => None,
        })
    }

    /// Lines of one category in declaration order.
    pub fn lines_of(&self, category: Category) -> impl Iterator<Item = &HeaderLine> {
        self.structured_lines()
            .filter(move |line| line.category() == category)
    }

    /// `##contig` lines in declaration order.
    pub fn contig_lines(&self) -> impl Iterator<Item = &HeaderLine> {
        self.lines_of(Category::Contig)
    }

    /// Parse header text.
    ///
    /// Reading stops at the `#CHROM` column line; anything after it is
    /// ignored. A header without a column line is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is not a meta or column line, a structured
    /// line is malformed, or the factory rejects a line.
    pub fn from_text(text: &str, factory: &dyn HeaderLineFactory) -> Result<Self> {
        let mut header = Self::default();

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }

            if let Some(meta) = line.strip_prefix("##") {
                let (key, value) = meta.split_once('=').ok_or_else(|| {
                    BcfError::format(format!("line {}: meta line without '=': {}", line_no, line))
                })?;

                if key == "fileformat" {
                    header.fileformat = Some(value.to_string());
                } else if let Some(body) = value.strip_prefix('<') {
                    let body = body.strip_suffix('>').ok_or_else(|| {
                        BcfError::format(format!("line {}: unterminated '<' in {}", line_no, line))
                    })?;
                    let fields = parse_structured_fields(body)
                        .map_err(|e| BcfError::format(format!("line {}: {}", line_no, e)))?;
                    header.push_line(factory.build_line(key, fields)?);
                } else {
                    header.push_unstructured(key, value);
                }
            } else if line.starts_with("#CHROM") {
                header.samples = line
                    .split('\t')
                    .skip(FIXED_COLUMNS.len() + 1)
                    .map(str::to_string)
                    .collect();
                break;
            } else {
                return Err(BcfError::format(format!(
                    "line {}: expected a header line, got: {}",
                    line_no, line
                )));
            }
        }

        Ok(header)
    }

    /// Render the header, including the column line, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        if let Some(fileformat) = &self.fileformat {
            text.push_str(&format!("##fileformat={}\n", fileformat));
        }

        for line in &self.lines {
            match line {
                MetaLine::Structured(line) => text.push_str(&line.to_line()),
                MetaLine::Unstructured { key, value } => {
                    text.push_str(&format!("##{}={}", key, value))
                }
            }
            text.push('\n');
        }

        text.push_str(&FIXED_COLUMNS.join("\t"));
        if !self.samples.is_empty() {
            text.push_str("\tFORMAT");
            for sample in &self.samples {
                text.push('\t');
                text.push_str(sample);
            }
        }
        text.push('\n');
        text
    }
}

/// Split the body of a `<...>` block into `Key=Value` pairs.
///
/// Values may be double-quoted, in which case they can contain `,`, `=`,
/// `<`, `>` and backslash-escaped characters.
fn parse_structured_fields(body: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut fields = Vec::new();
    let mut chars = body.chars().peekable();

    while chars.peek().is_some() {
        let mut key = String::new();
        loop {
            match chars.next() {
                Some('=') => break,
                Some(c) => key.push(c),
                None => return Err(format!("field '{}' has no value", key)),
            }
        }
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err("empty field name".to_string());
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some(c) => value.push(c),
                        None => return Err(format!("dangling escape in field '{}'", key)),
                    },
                    Some('"') => break,
                    Some(c) => value.push(c),
                    None => return Err(format!("unterminated quote in field '{}'", key)),
                }
            }
            match chars.next() {
                None | Some(',') => {}
                Some(c) => {
                    return Err(format!("unexpected '{}' after quoted field '{}'", c, key))
                }
            }
        } else {
            for c in chars.by_ref() {
                if c == ',' {
                    break;
                }
                value.push(c);
            }
        }

        fields.push((key, value));
    }

    Ok(fields)
}
