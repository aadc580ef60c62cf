//! VCF header model consumed by the BCF dictionaries.
//!
//! - [`header`]: ordered meta lines, samples, and a minimal header reader
//! - [`header_line`]: structured lines and their version-gated shapes

pub mod header;
pub mod header_line;

pub use header::{HeaderLineFactory, MetaLine, VcfHeader};
pub use header_line::{AnnotationPolicy, Category, HeaderLine, Number, ValueType};
