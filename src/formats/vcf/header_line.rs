//! Structured VCF header lines (FILTER, INFO, FORMAT, contig, ...).
//!
//! Each structured meta-information line is a key plus an ordered list of
//! `Key=Value` fields:
//!
//! ```text
//! ##FILTER=<ID=q10,Description="Quality below 10",IDX=1>
//! ##INFO=<ID=DP,Number=1,Type=Integer,Description="Total Depth",IDX=3>
//! ##contig=<ID=chr1,length=248956422,IDX=0>
//! ```
//!
//! FILTER, INFO and FORMAT lines come in two shapes, selected by the BCF
//! version (see [`HeaderLineShape`]):
//!
//! - **Legacy**: no persisted code. An annotation attribute found in the
//!   input is dropped.
//! - **Annotated**: the persisted code (normally `IDX`) is kept. Building
//!   this shape for a version before 2.2 is a caller error.
//!
//! What each category does with the annotation is data, not behavior:
//! see [`Category::annotation_policy`].
//!
//! # Example
//!
//! ```
//! use bcf_dictionary::formats::bcf::{BcfVersion, IDX_FIELD};
//! use bcf_dictionary::formats::vcf::{Category, HeaderLine, ValueType};
//!
//! let fields = vec![
//!     ("ID".to_string(), "DP".to_string()),
//!     ("Number".to_string(), "1".to_string()),
//!     ("Type".to_string(), "Integer".to_string()),
//!     ("Description".to_string(), "Total Depth".to_string()),
//!     ("IDX".to_string(), "3".to_string()),
//! ];
//!
//! let line = HeaderLine::annotated(BcfVersion::V2_2, "INFO", fields.clone(), IDX_FIELD)?;
//! assert_eq!(line.category(), Category::Info);
//! assert_eq!(line.value_type(), Some(ValueType::Integer));
//! assert_eq!(line.generic_field(IDX_FIELD), Some("3"));
//!
//! // Same input, legacy shape: the code is not carried
//! let line = HeaderLine::legacy("INFO", fields, IDX_FIELD)?;
//! assert_eq!(line.generic_field(IDX_FIELD), None);
//! # Ok::<(), bcf_dictionary::BcfError>(())
//! ```

use crate::error::{BcfError, Result};
use crate::formats::bcf::version::{BcfVersion, HeaderLineShape};
use log::warn;
use std::fmt;
use std::str::FromStr;

/// Category of a structured header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `##FILTER`
    Filter,
    /// `##INFO`
    Info,
    /// `##FORMAT`
    Format,
    /// `##contig`
    Contig,
    /// Any other structured line (`##ALT`, `##SAMPLE`, ...)
    Other,
}

/// Whether a category may carry the persisted code, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationPolicy {
    /// Folded into the line's fixed field list; never a free-form attribute.
    Structural,
    /// Permitted as an optional attribute alongside the fixed fields.
    OptionalAttribute,
    /// Not meaningful for this category.
    NotPermitted,
}

impl Category {
    /// Map a header key to its category. FILTER/INFO/FORMAT match exactly,
    /// `contig` is matched case-insensitively.
    pub fn from_key(key: &str) -> Self {
        match key {
            "FILTER" => Category::Filter,
            "INFO" => Category::Info,
            "FORMAT" => Category::Format,
            k if k.eq_ignore_ascii_case("contig") => Category::Contig,
            _ => Category::Other,
        }
    }

    /// Capability table for the persisted code.
    pub fn annotation_policy(&self) -> AnnotationPolicy {
        match self {
            Category::Filter => AnnotationPolicy::Structural,
            Category::Info | Category::Format | Category::Contig => {
                AnnotationPolicy::OptionalAttribute
            }
            Category::Other => AnnotationPolicy::NotPermitted,
        }
    }

    /// FILTER, INFO and FORMAT lines change shape with the BCF version.
    pub fn is_versioned(&self) -> bool {
        matches!(self, Category::Filter | Category::Info | Category::Format)
    }

    /// Whether lines of this category belong in the strings dictionary.
    ///
    /// `##PEDIGREE` lines map to [`Category::Other`] and are excluded.
    pub fn in_string_dictionary(&self) -> bool {
        self.is_versioned()
    }

    /// Fields every line of this category must declare.
    fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Category::Filter => &["ID", "Description"],
            Category::Info | Category::Format => &["ID", "Number", "Type", "Description"],
            Category::Contig | Category::Other => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Filter => "FILTER",
            Category::Info => "INFO",
            Category::Format => "FORMAT",
            Category::Contig => "contig",
            Category::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// The `Number` field of INFO and FORMAT lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    /// Fixed number of values
    Count(u32),
    /// One value per alternate allele (`A`)
    AlternateAlleles,
    /// One value per allele, including the reference (`R`)
    Alleles,
    /// One value per genotype (`G`)
    Genotypes,
    /// Unknown or unbounded (`.`)
    Unbounded,
}

impl FromStr for Number {
    type Err = BcfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A" => Ok(Number::AlternateAlleles),
            "R" => Ok(Number::Alleles),
            "G" => Ok(Number::Genotypes),
            "." => Ok(Number::Unbounded),
            _ => s.parse().map(Number::Count).map_err(|_| BcfError::InvalidField {
                field: "Number".to_string(),
                reason: format!("expected an integer, A, R, G or '.', got '{}'", s),
            }),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Count(n) => write!(f, "{}", n),
            Number::AlternateAlleles => write!(f, "A"),
            Number::Alleles => write!(f, "R"),
            Number::Genotypes => write!(f, "G"),
            Number::Unbounded => write!(f, "."),
        }
    }
}

/// The `Type` field of INFO and FORMAT lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 32-bit integer
    Integer,
    /// 32-bit float
    Float,
    /// Presence-only flag (INFO only)
    Flag,
    /// Single character
    Character,
    /// String
    String,
}

impl FromStr for ValueType {
    type Err = BcfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Integer" => Ok(ValueType::Integer),
            "Float" => Ok(ValueType::Float),
            "Flag" => Ok(ValueType::Flag),
            "Character" => Ok(ValueType::Character),
            "String" => Ok(ValueType::String),
            _ => Err(BcfError::InvalidField {
                field: "Type".to_string(),
                reason: format!("unknown type '{}'", s),
            }),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::Flag => "Flag",
            ValueType::Character => "Character",
            ValueType::String => "String",
        };
        write!(f, "{}", name)
    }
}

/// A structured header line.
///
/// Fields are kept in declaration order so that rendering reproduces the
/// input. Typed views (`id`, `number`, `value_type`) are validated once at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    key: String,
    category: Category,
    shape: HeaderLineShape,
    fields: Vec<(String, String)>,
    number: Option<Number>,
    value_type: Option<ValueType>,
}

impl HeaderLine {
    /// Build a line in the legacy shape.
    ///
    /// For FILTER/INFO/FORMAT lines, an `annotation_field` attribute is
    /// dropped with a warning: pre-2.2 content has no persisted codes.
    /// Other categories keep all of their fields.
    ///
    /// # Errors
    ///
    /// Returns [`BcfError::InvalidField`] if a required field is missing,
    /// a field is declared twice, or `Number`/`Type` cannot be parsed.
    pub fn legacy(
        key: impl Into<String>,
        mut fields: Vec<(String, String)>,
        annotation_field: &str,
    ) -> Result<Self> {
        let key = key.into();
        let category = Category::from_key(&key);

        if category.is_versioned() {
            let before = fields.len();
            fields.retain(|(name, _)| name != annotation_field);
            if fields.len() != before {
                warn!(
                    "Dropping {} from legacy {} header line: persisted codes need BCF 2.2",
                    annotation_field, category
                );
            }
        }

        Self::build(key, category, HeaderLineShape::Legacy, fields)
    }

    /// Build a line in the annotation-capable shape.
    ///
    /// # Errors
    ///
    /// Returns [`BcfError::VersionMismatch`] if `version` predates 2.2,
    /// before looking at the fields. Otherwise fails like [`HeaderLine::legacy`].
    pub fn annotated(
        version: BcfVersion,
        key: impl Into<String>,
        fields: Vec<(String, String)>,
        annotation_field: &str,
    ) -> Result<Self> {
        version.require_annotation("Annotated header line")?;

        let key = key.into();
        let category = Category::from_key(&key);

        if category.annotation_policy() == AnnotationPolicy::NotPermitted
            && fields.iter().any(|(name, _)| name == annotation_field)
        {
            return Err(BcfError::InvalidField {
                field: annotation_field.to_string(),
                reason: format!("not permitted on ##{} lines", key),
            });
        }

        Self::build(key, category, HeaderLineShape::Annotated, fields)
    }

    fn build(
        key: String,
        category: Category,
        shape: HeaderLineShape,
        fields: Vec<(String, String)>,
    ) -> Result<Self> {
        for (i, (name, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(seen, _)| seen == name) {
                return Err(BcfError::InvalidField {
                    field: name.clone(),
                    reason: format!("declared twice in ##{} line", key),
                });
            }
        }

        let lookup = |name: &str| {
            fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };

        for &required in category.required_fields() {
            if lookup(required).is_none() {
                return Err(BcfError::InvalidField {
                    field: required.to_string(),
                    reason: format!("required in ##{} lines", key),
                });
            }
        }

        let (number, value_type) = match category {
            Category::Info | Category::Format => {
                let number = lookup("Number").map(str::parse::<Number>).transpose()?;
                let value_type = lookup("Type").map(str::parse::<ValueType>).transpose()?;
                (number, value_type)
            }
            _ => (None, None),
        };

        if category == Category::Format && value_type == Some(ValueType::Flag) {
            return Err(BcfError::InvalidField {
                field: "Type".to_string(),
                reason: "Flag is not allowed in FORMAT lines".to_string(),
            });
        }

        Ok(Self {
            key,
            category,
            shape,
            fields,
            number,
            value_type,
        })
    }

    /// Header key as written (`FILTER`, `INFO`, `contig`, ...).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Line category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Shape this line was built with.
    pub fn shape(&self) -> HeaderLineShape {
        self.shape
    }

    /// The `ID` field, if declared.
    pub fn id(&self) -> Option<&str> {
        self.generic_field("ID")
    }

    /// The `Description` field, if declared.
    pub fn description(&self) -> Option<&str> {
        self.generic_field("Description")
    }

    /// The `Number` field of INFO/FORMAT lines.
    pub fn number(&self) -> Option<Number> {
        self.number
    }

    /// The `Type` field of INFO/FORMAT lines.
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Whether this line contributes to the strings dictionary.
    pub fn in_string_dictionary(&self) -> bool {
        self.category.in_string_dictionary()
    }

    /// Look up any field by name, fixed or free-form.
    pub fn generic_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Free-form attributes: fields outside the category's fixed structure.
    ///
    /// A FILTER line's annotation is part of its fixed structure and is never
    /// listed here; an INFO/FORMAT line's annotation is.
    pub fn attributes<'a>(
        &'a self,
        annotation_field: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let structural = self.category.annotation_policy() == AnnotationPolicy::Structural;
        let required = self.category.required_fields();
        self.fields
            .iter()
            .filter(move |(name, _)| {
                !required.contains(&name.as_str()) && !(structural && name == annotation_field)
            })
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Persist a dictionary code in `annotation_field`, replacing any previous value.
    ///
    /// A legacy FILTER/INFO/FORMAT line takes the annotated shape once it
    /// carries a code.
    ///
    /// # Errors
    ///
    /// Returns [`BcfError::VersionMismatch`] if `version` predates 2.2, and
    /// [`BcfError::InvalidField`] on a category that cannot carry a code.
    pub fn set_annotation(
        &mut self,
        version: BcfVersion,
        annotation_field: &str,
        code: usize,
    ) -> Result<()> {
        version.require_annotation("Persisting a code on a header line")?;
        if self.category.annotation_policy() == AnnotationPolicy::NotPermitted {
            return Err(BcfError::InvalidField {
                field: annotation_field.to_string(),
                reason: format!("not permitted on ##{} lines", self.key),
            });
        }

        if self.category.is_versioned() {
            self.shape = HeaderLineShape::Annotated;
        }

        let value = code.to_string();
        match self.fields.iter_mut().find(|(n, _)| n == annotation_field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((annotation_field.to_string(), value)),
        }
        Ok(())
    }

    /// Render as a `##KEY=<...>` line (without trailing newline).
    pub fn to_line(&self) -> String {
        let body: Vec<String> = self
            .fields
            .iter()
            .map(|(name, value)| {
                if name == "Description" || needs_quotes(value) {
                    format!("{}={}", name, quote(value))
                } else {
                    format!("{}={}", name, value)
                }
            })
            .collect();
        format!("##{}=<{}>", self.key, body.join(","))
    }
}

impl fmt::Display for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line())
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| matches!(c, ',' | '"' | '<' | '>' | '=') || c.is_whitespace())
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
