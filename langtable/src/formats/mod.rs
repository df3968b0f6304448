//! All supported tabular interchange formats for langtable.
//!
//! This module re-exports the codec for each format and provides the
//! [`FormatType`] enum for choosing one at runtime.

pub mod csv;
pub mod json;
pub mod xlsx;
pub mod xml;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the codecs for easier access
pub use self::csv::CsvCodec;
pub use self::json::JsonCodec;
pub use self::xlsx::XlsxCodec;
pub use self::xml::XmlCodec;

use crate::{error::Error, matrix::LanguageMatrix, traits::TabularCodec};

/// Represents all supported interchange formats for generic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Comma-separated values with a `File,Key,<lang...>` header.
    Csv,
    /// Pretty-printed `{file: {key: {lang: value}}}`.
    Json,
    /// `<translations>` document with one element per file.
    Xml,
    /// Excel workbook, same grid as CSV.
    Xlsx,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// ```rust
/// use langtable::formats::FormatType;
/// assert_eq!(FormatType::Csv.to_string(), "csv");
/// assert_eq!(FormatType::Xlsx.to_string(), "xlsx");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Csv => write!(f, "csv"),
            FormatType::Json => write!(f, "json"),
            FormatType::Xml => write!(f, "xml"),
            FormatType::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts the following case-insensitive strings:
/// - `"csv"` → `FormatType::Csv`
/// - `"json"` → `FormatType::Json`
/// - `"xml"` → `FormatType::Xml`
/// - `"xlsx"`, `"excel"` → `FormatType::Xlsx`
///
/// Returns [`crate::error::Error::UnknownFormat`] for unknown strings.
///
/// ```rust
/// use langtable::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("CSV").unwrap(), FormatType::Csv);
/// assert_eq!(FormatType::from_str("excel").unwrap(), FormatType::Xlsx);
/// assert!(FormatType::from_str("yaml").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "csv" => Ok(FormatType::Csv),
            "json" => Ok(FormatType::Json),
            "xml" => Ok(FormatType::Xml),
            "xlsx" | "excel" => Ok(FormatType::Xlsx),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    pub const ALL: [FormatType; 4] = [
        FormatType::Csv,
        FormatType::Json,
        FormatType::Xml,
        FormatType::Xlsx,
    ];

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Csv => "csv",
            FormatType::Json => "json",
            FormatType::Xml => "xml",
            FormatType::Xlsx => "xlsx",
        }
    }

    /// Encodes `matrix` with this format's codec.
    pub fn encode(&self, matrix: &LanguageMatrix, languages: &[String]) -> Result<Vec<u8>, Error> {
        match self {
            FormatType::Csv => CsvCodec::encode(matrix, languages),
            FormatType::Json => JsonCodec::encode(matrix, languages),
            FormatType::Xml => XmlCodec::encode(matrix, languages),
            FormatType::Xlsx => XlsxCodec::encode(matrix, languages),
        }
    }

    /// Decodes `bytes` with this format's codec.
    pub fn decode(&self, bytes: &[u8]) -> Result<LanguageMatrix, Error> {
        match self {
            FormatType::Csv => CsvCodec::decode(bytes),
            FormatType::Json => JsonCodec::decode(bytes),
            FormatType::Xml => XmlCodec::decode(bytes),
            FormatType::Xlsx => XlsxCodec::decode(bytes),
        }
    }
}

/// Infers a [`FormatType`] from a path's extension.
///
/// ```rust
/// use langtable::formats::{FormatType, infer_format_from_extension};
/// assert_eq!(infer_format_from_extension("out/translations.xlsx"), Some(FormatType::Xlsx));
/// assert_eq!(infer_format_from_extension("translations"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    let extension = path.as_ref().extension()?.to_str()?;
    FormatType::from_str(extension).ok()
}
