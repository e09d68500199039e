//! Exchange formats shared by the import and export pipelines.
//!
//! # Responsibility
//! - Name the supported interchange formats and their default file names.
//! - Host the vCard content-line primitives used in both directions.

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

pub mod vcard_text;

/// Default export target for CSV.
pub const DEFAULT_CSV_FILE_NAME: &str = "adressbuch.csv";
/// Default export target for vCard.
pub const DEFAULT_VCARD_FILE_NAME: &str = "adressbuch.vcf";

/// External file format for import/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeFormat {
    Csv,
    Vcard,
}

impl ExchangeFormat {
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Csv => DEFAULT_CSV_FILE_NAME,
            Self::Vcard => DEFAULT_VCARD_FILE_NAME,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Vcard => "vcard",
        }
    }

    /// Infers the format from a file extension (`.csv`, `.vcf`, `.vcard`).
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl Display for ExchangeFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExchangeFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "vcard" | "vcf" => Ok(Self::Vcard),
            other => Err(format!(
                "unsupported format `{other}`; expected csv|vcard"
            )),
        }
    }
}
