//! Import Pipeline: parse -> map -> dedupe-merge.
//!
//! # Responsibility
//! - Read an external CSV/vCard file into candidate contacts.
//! - Merge candidates into the contact store in file order.
//!
//! # Invariants
//! - An unreadable source aborts the whole import before the store changes.
//! - Per-record problems are counted in `skipped`, never fatal.
//! - The merged batch is persisted atomically.

use crate::interchange::ExchangeFormat;
use crate::model::contact::ContactFields;
use crate::repo::contact_repo::ContactRepository;
use crate::store::contact_store::{ContactStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod csv_reader;
pub mod vcard_reader;

const BOM: char = '\u{feff}';

/// Import-level failure. Skipped records are not errors; see [`ImportReport`].
#[derive(Debug)]
pub enum ImportError {
    /// Source file is missing, unreadable or not UTF-8.
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// CSV source without a header row.
    MissingHeader { path: PathBuf },
    /// Merged batch could not be persisted.
    Store(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileUnreadable { path, source } => {
                write!(f, "could not read `{}`: {source}", path.display())
            }
            Self::MissingHeader { path } => {
                write!(f, "`{}` has no CSV header row", path.display())
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FileUnreadable { source, .. } => Some(source),
            Self::MissingHeader { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Candidates parsed from one source plus the count of dropped records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBatch {
    pub candidates: Vec<ContactFields>,
    pub skipped: usize,
}

/// Outcome of one import call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Candidates that became new contacts.
    pub added: usize,
    /// Candidates merged into an existing contact by email.
    pub updated: usize,
    /// Records dropped while parsing.
    pub skipped: usize,
}

impl ImportReport {
    /// Number of candidates applied to the store (`added + updated`).
    pub fn imported(&self) -> usize {
        self.added + self.updated
    }
}

/// Parses already-loaded text in the given format.
///
/// Returns `None` only for a CSV source without a header row.
pub fn parse_text(format: ExchangeFormat, text: &str) -> Option<ParsedBatch> {
    let text = text.trim_start_matches(BOM);
    match format {
        ExchangeFormat::Csv => csv_reader::parse_csv(text),
        ExchangeFormat::Vcard => Some(vcard_reader::parse_vcards(text)),
    }
}

/// Reads `path`, parses it as `format` and merges every candidate into `store`.
pub fn import_file<R: ContactRepository>(
    store: &mut ContactStore<R>,
    path: impl AsRef<Path>,
    format: ExchangeFormat,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    let started_at = Instant::now();

    let text = std::fs::read_to_string(path).map_err(|source| {
        warn!(
            "event=import_read module=import status=error format={} error_code=file_unreadable",
            format
        );
        ImportError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let batch = parse_text(format, &text).ok_or_else(|| ImportError::MissingHeader {
        path: path.to_path_buf(),
    })?;
    let skipped = batch.skipped;
    let outcome = store.merge_batch(batch.candidates)?;

    let report = ImportReport {
        added: outcome.added,
        updated: outcome.updated,
        skipped,
    };
    info!(
        "event=import module=import status=ok format={} added={} updated={} skipped={} duration_ms={}",
        format,
        report.added,
        report.updated,
        report.skipped,
        started_at.elapsed().as_millis()
    );
    Ok(report)
}
