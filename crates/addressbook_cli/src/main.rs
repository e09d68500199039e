//! Command-line front end for the address book.
//!
//! # Responsibility
//! - Map subcommands onto `AddressBookService` use cases.
//! - Resolve settings from flags, then environment, then platform defaults.
//!
//! # Usage
//!
//! ```bash
//! addressbook list
//! addressbook add --first-name Anna --last-name Muster --email anna@x.de
//! addressbook import ./kontakte.csv
//! addressbook export --format vcard
//! addressbook search muster --json
//! ```

use addressbook_core::config::{ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
use addressbook_core::db::open_db;
use addressbook_core::{
    init_logging, AddressBookConfig, AddressBookService, Contact, ContactFields, ContactId,
    ExchangeFormat, SearchQuery, SqliteContactRepository,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "addressbook", about = "Local address book with CSV/vCard exchange", version)]
struct Cli {
    /// Backing store file.
    #[arg(long, global = true, env = ENV_DB_PATH)]
    db: Option<PathBuf>,

    /// Directory for rolling log files; logging stays off when unset.
    #[arg(long, global = true, env = ENV_LOG_DIR)]
    log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true, env = ENV_LOG_LEVEL)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every contact in store order.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show all fields of one contact.
    Show { id: ContactId },
    /// Create a contact.
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a contact; fields not given keep their value.
    Edit {
        id: ContactId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a contact.
    Delete { id: ContactId },
    /// Find contacts whose name or email contains the query.
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Import a CSV or vCard file, merging by email.
    Import {
        path: PathBuf,
        /// `csv` or `vcard`; inferred from the extension when omitted.
        #[arg(long)]
        format: Option<ExchangeFormat>,
    },
    /// Export every contact.
    Export {
        /// Target file; defaults to `adressbuch.csv` / `adressbuch.vcf`.
        path: Option<PathBuf>,
        #[arg(long)]
        format: Option<ExchangeFormat>,
        /// Write to standard output instead of a file.
        #[arg(long, conflicts_with = "path")]
        stdout: bool,
    },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    mobile: Option<String>,
    /// Street line.
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    birthday: Option<String>,
    #[arg(long)]
    website: Option<String>,
}

impl FieldArgs {
    /// Overlays the given flags on `base`.
    fn apply_to(self, mut base: ContactFields) -> ContactFields {
        let overlay = [
            (self.full_name, &mut base.full_name),
            (self.first_name, &mut base.first_name),
            (self.last_name, &mut base.last_name),
            (self.email, &mut base.email),
            (self.phone, &mut base.phone),
            (self.mobile, &mut base.mobile),
            (self.address, &mut base.address),
            (self.postal_code, &mut base.postal_code),
            (self.city, &mut base.city),
            (self.birthday, &mut base.birthday),
            (self.website, &mut base.website),
        ];
        for (value, slot) in overlay {
            if let Some(value) = value {
                *slot = value;
            }
        }
        base
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let defaults = AddressBookConfig::from_env();
    let config = AddressBookConfig {
        db_path: cli.db.unwrap_or(defaults.db_path),
        log_dir: cli.log_dir.or(defaults.log_dir),
        log_level: cli.log_level.unwrap_or(defaults.log_level),
    };

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("could not open `{}`", config.db_path.display()))?;
    let repo = SqliteContactRepository::try_new(&conn).context("address book is not usable")?;
    let mut service = AddressBookService::open(repo)?;
    info!(
        "event=cli_start module=cli status=ok contacts={}",
        service.list().len()
    );

    run(cli.command, &mut service)
}

fn run(command: Command, service: &mut AddressBookService<SqliteContactRepository<'_>>) -> Result<()> {
    match command {
        Command::List { json } => print_contacts(service.list().iter(), json),
        Command::Show { id } => {
            let contact = service
                .get(id)
                .ok_or_else(|| anyhow!("no contact with id {id}"))?;
            println!("{}", serde_json::to_string_pretty(contact)?);
            Ok(())
        }
        Command::Add { fields } => {
            let id = service.create(fields.apply_to(ContactFields::default()))?;
            println!("{id}");
            Ok(())
        }
        Command::Edit { id, fields } => {
            let current = service
                .get(id)
                .map(|contact| contact.fields.clone())
                .ok_or_else(|| anyhow!("no contact with id {id}"))?;
            if !service.update(id, fields.apply_to(current))? {
                bail!("contact {id} disappeared before the update");
            }
            println!("updated {id}");
            Ok(())
        }
        Command::Delete { id } => {
            if service.delete(id)? {
                println!("deleted {id}");
            } else {
                println!("no contact with id {id}; nothing changed");
            }
            Ok(())
        }
        Command::Search { query, limit, json } => {
            let query = SearchQuery {
                text: query,
                limit,
            };
            print_contacts(service.search(&query).into_iter(), json)
        }
        Command::Import { path, format } => {
            let format = resolve_format(format, Some(&path))?;
            let report = service
                .import(&path, format)
                .with_context(|| format!("{format} import failed"))?;
            println!(
                "Import finished. New: {}, updated: {}, skipped: {}.",
                report.added, report.updated, report.skipped
            );
            Ok(())
        }
        Command::Export {
            path,
            format,
            stdout,
        } => {
            let format = resolve_format(format, path.as_deref())?;
            if stdout {
                print!("{}", service.export_to_string(format)?);
                return Ok(());
            }
            let path = path.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
            let count = service
                .export(&path, format)
                .with_context(|| format!("{format} export failed"))?;
            println!("Exported {count} contact(s) to {}.", path.display());
            Ok(())
        }
    }
}

fn resolve_format(explicit: Option<ExchangeFormat>, path: Option<&Path>) -> Result<ExchangeFormat> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    path.and_then(ExchangeFormat::from_path)
        .ok_or_else(|| anyhow!("cannot infer the format; pass --format csv or --format vcard"))
}

fn print_contacts<'a>(contacts: impl Iterator<Item = &'a Contact>, json: bool) -> Result<()> {
    let contacts = contacts.collect::<Vec<_>>();
    if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
        return Ok(());
    }
    if contacts.is_empty() {
        println!("No contacts.");
        return Ok(());
    }
    for contact in contacts {
        println!(
            "{}  {}  {}",
            contact.id,
            contact.display_name(),
            contact.fields.email
        );
    }
    Ok(())
}
