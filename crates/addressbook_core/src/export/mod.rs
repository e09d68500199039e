//! Export Pipeline: serialize the current contacts to CSV or vCard.
//!
//! # Responsibility
//! - Render contacts into the requested interchange format.
//! - Write the rendered output to a target path.
//!
//! # Invariants
//! - Export is a pure read of the contact slice; the store is never mutated.
//! - A target that cannot be created or written yields `FileUnwritable`.

use crate::interchange::ExchangeFormat;
use crate::model::contact::Contact;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod csv_writer;
pub mod vcard_writer;

#[derive(Debug)]
pub enum ExportError {
    /// Export target could not be created or written.
    FileUnwritable { path: PathBuf, source: io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileUnwritable { path, source } => {
                write!(f, "could not write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FileUnwritable { source, .. } => Some(source),
        }
    }
}

/// Serializes `contacts` in `format` into any writer.
pub fn write_contacts<W: Write>(
    format: ExchangeFormat,
    contacts: &[Contact],
    writer: W,
) -> io::Result<()> {
    match format {
        ExchangeFormat::Csv => csv_writer::write_csv(contacts, writer),
        ExchangeFormat::Vcard => vcard_writer::write_vcards(contacts, writer),
    }
}

/// Renders `contacts` in `format` to a string.
pub fn render(format: ExchangeFormat, contacts: &[Contact]) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_contacts(format, contacts, &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Writes `contacts` to `path`, replacing any existing file.
///
/// Returns the number of exported contacts.
pub fn export_file(
    contacts: &[Contact],
    path: impl AsRef<Path>,
    format: ExchangeFormat,
) -> Result<usize, ExportError> {
    let path = path.as_ref();
    let result = File::create(path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_contacts(format, contacts, &mut writer)?;
        writer.flush()
    });

    match result {
        Ok(()) => {
            info!(
                "event=export module=export status=ok format={} contacts={}",
                format,
                contacts.len()
            );
            Ok(contacts.len())
        }
        Err(source) => {
            error!(
                "event=export module=export status=error format={} error_code=file_unwritable error={}",
                format, source
            );
            Err(ExportError::FileUnwritable {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
