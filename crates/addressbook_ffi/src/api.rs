//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the address book contract to the GUI shell via FRB.
//! - Keep error semantics simple: every call returns an envelope with `ok`
//!   and one human-readable `message`.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens the backing file, performs one use case and releases it.

use addressbook_core::db::open_db;
use addressbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AddressBookConfig, AddressBookService, Contact, ContactFields, ContactId, ExchangeFormat,
    SearchQuery, SqliteContactRepository,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const SEARCH_DEFAULT_LIMIT: u32 = 50;
const SEARCH_LIMIT_MAX: u32 = 500;
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Contact fields as edited in the GUI form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub birthday: String,
    pub website: String,
}

impl From<ContactInput> for ContactFields {
    fn from(value: ContactInput) -> Self {
        ContactFields {
            full_name: value.full_name,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone,
            mobile: value.mobile,
            address: value.address,
            postal_code: value.postal_code,
            city: value.city,
            birthday: value.birthday,
            website: value.website,
        }
        .normalized()
    }
}

/// Contact row for list and detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    /// Stable contact ID in string form.
    pub contact_id: String,
    /// Name shown in the list (full name, composed name or email).
    pub display_name: String,
    pub fields: ContactInput,
}

/// List/search response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    pub message: String,
}

/// Single-contact lookup response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactGetResponse {
    pub ok: bool,
    pub item: Option<ContactItem>,
    pub message: String,
}

/// Create/update/delete response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    /// Affected contact ID, when one exists.
    pub contact_id: Option<String>,
    /// Whether the store changed (`false` for stale ids).
    pub changed: bool,
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: ContactId, changed: bool) -> Self {
        Self {
            ok: true,
            contact_id: Some(contact_id.to_string()),
            changed,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            changed: false,
            message: message.into(),
        }
    }
}

/// Import response: `imported`/`skipped` totals plus the added/updated split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub ok: bool,
    pub imported: u32,
    pub added: u32,
    pub updated: u32,
    pub skipped: u32,
    pub message: String,
}

/// Export response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    /// Path actually written.
    pub path: String,
    pub exported: u32,
    pub message: String,
}

/// Lists every contact in store order.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    match with_service(|service| Ok(service.list().iter().map(to_contact_item).collect())) {
        Ok(items) => list_success(items),
        Err(err) => list_failure(format!("contacts_list failed: {err}")),
    }
}

/// Filters contacts by name or email substring.
///
/// `limit` defaults to 50 and is capped at 500.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_search(text: String, limit: Option<u32>) -> ContactListResponse {
    let query = SearchQuery {
        text: text.trim().to_string(),
        limit: Some(normalize_search_limit(limit) as usize),
    };
    match with_service(|service| {
        Ok(service
            .search(&query)
            .into_iter()
            .map(to_contact_item)
            .collect())
    }) {
        Ok(items) => list_success(items),
        Err(err) => list_failure(format!("contacts_search failed: {err}")),
    }
}

/// Loads one contact for the detail view.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_get(contact_id: String) -> ContactGetResponse {
    let result = parse_contact_id(&contact_id)
        .and_then(|id| with_service(|service| Ok(service.get(id).map(to_contact_item))));
    match result {
        Ok(item) => {
            let message = if item.is_some() {
                "Contact found."
            } else {
                "Contact not found."
            };
            ContactGetResponse {
                ok: true,
                item,
                message: message.to_string(),
            }
        }
        Err(err) => ContactGetResponse {
            ok: false,
            item: None,
            message: format!("contact_get failed: {err}"),
        },
    }
}

/// Creates a contact from the edit form.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_create(input: ContactInput) -> ContactActionResponse {
    match with_service(|service| {
        service
            .create(ContactFields::from(input))
            .map_err(|err| err.to_string())
    }) {
        Ok(id) => ContactActionResponse::success("Contact saved.", id, true),
        Err(err) => ContactActionResponse::failure(format!("contact_create failed: {err}")),
    }
}

/// Replaces all fields of a contact; unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_update(contact_id: String, input: ContactInput) -> ContactActionResponse {
    let result = parse_contact_id(&contact_id).and_then(|id| {
        with_service(|service| {
            service
                .update(id, ContactFields::from(input))
                .map(|changed| (id, changed))
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok((id, true)) => ContactActionResponse::success("Contact updated.", id, true),
        Ok((id, false)) => {
            ContactActionResponse::success("Contact not found; nothing changed.", id, false)
        }
        Err(err) => ContactActionResponse::failure(format!("contact_update failed: {err}")),
    }
}

/// Deletes a contact; unknown ids are a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(contact_id: String) -> ContactActionResponse {
    let result = parse_contact_id(&contact_id).and_then(|id| {
        with_service(|service| {
            service
                .delete(id)
                .map(|changed| (id, changed))
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok((id, true)) => ContactActionResponse::success("Contact deleted.", id, true),
        Ok((id, false)) => {
            ContactActionResponse::success("Contact not found; nothing changed.", id, false)
        }
        Err(err) => ContactActionResponse::failure(format!("contact_delete failed: {err}")),
    }
}

/// Imports a CSV or vCard file.
///
/// `format` is `csv` or `vcard`; blank means "infer from the extension".
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_import(path: String, format: String) -> ImportResponse {
    let path = PathBuf::from(path.trim());
    let result = resolve_format(&format, &path).and_then(|format| {
        with_service(|service| service.import(&path, format).map_err(|err| err.to_string()))
    });
    match result {
        Ok(report) => ImportResponse {
            ok: true,
            imported: to_u32(report.imported()),
            added: to_u32(report.added),
            updated: to_u32(report.updated),
            skipped: to_u32(report.skipped),
            message: format!(
                "Import finished. New: {}, updated: {}, skipped: {}.",
                report.added, report.updated, report.skipped
            ),
        },
        Err(err) => ImportResponse {
            ok: false,
            imported: 0,
            added: 0,
            updated: 0,
            skipped: 0,
            message: format!("contacts_import failed: {err}"),
        },
    }
}

/// Exports every contact; a blank `path` writes the format's default file
/// name in the current directory.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_export(path: Option<String>, format: String) -> ExportResponse {
    let explicit = path
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    let result = match (explicit, format.trim().is_empty()) {
        (Some(path), _) => resolve_format(&format, &path).map(|format| (path, format)),
        (None, true) => Err("export needs a path or a format".to_string()),
        (None, false) => resolve_format(&format, &PathBuf::new())
            .map(|format| (PathBuf::from(format.default_file_name()), format)),
    }
    .and_then(|(path, format)| {
        with_service(|service| {
            service
                .export(&path, format)
                .map(|count| (path.clone(), count))
                .map_err(|err| err.to_string())
        })
    });

    match result {
        Ok((path, count)) => ExportResponse {
            ok: true,
            path: path.display().to_string(),
            exported: to_u32(count),
            message: format!("Export finished. {count} contact(s) written."),
        },
        Err(err) => ExportResponse {
            ok: false,
            path: String::new(),
            exported: 0,
            message: format!("contacts_export failed: {err}"),
        },
    }
}

fn normalize_search_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => SEARCH_DEFAULT_LIMIT,
        Some(value) if value > SEARCH_LIMIT_MAX => SEARCH_LIMIT_MAX,
        Some(value) => value,
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| AddressBookConfig::from_env().db_path)
        .clone()
}

fn resolve_format(raw: &str, path: &std::path::Path) -> Result<ExchangeFormat, String> {
    if raw.trim().is_empty() {
        return ExchangeFormat::from_path(path).ok_or_else(|| {
            format!(
                "cannot infer format from `{}`; pass csv or vcard",
                path.display()
            )
        });
    }
    raw.trim().parse()
}

fn parse_contact_id(raw: &str) -> Result<ContactId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid contact id `{}`", raw.trim()))
}

fn with_service<T>(
    f: impl FnOnce(&mut AddressBookService<SqliteContactRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_open module=ffi status=error error_code=db_open_failed");
        format!("address book open failed: {err}")
    })?;
    let repo = SqliteContactRepository::try_new(&conn).map_err(|err| {
        warn!("event=ffi_open module=ffi status=error error_code=schema_not_ready");
        format!("address book init failed: {err}")
    })?;
    let mut service = AddressBookService::open(repo).map_err(|err| err.to_string())?;
    f(&mut service)
}

fn to_contact_item(contact: &Contact) -> ContactItem {
    let fields = &contact.fields;
    ContactItem {
        contact_id: contact.id.to_string(),
        display_name: contact.display_name(),
        fields: ContactInput {
            full_name: fields.full_name.clone(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            mobile: fields.mobile.clone(),
            address: fields.address.clone(),
            postal_code: fields.postal_code.clone(),
            city: fields.city.clone(),
            birthday: fields.birthday.clone(),
            website: fields.website.clone(),
        },
    }
}

fn list_success(items: Vec<ContactItem>) -> ContactListResponse {
    let message = if items.is_empty() {
        "No contacts.".to_string()
    } else {
        format!("Found {} contact(s).", items.len())
    };
    ContactListResponse {
        ok: true,
        items,
        message,
    }
}

fn list_failure(message: String) -> ContactListResponse {
    ContactListResponse {
        ok: false,
        items: Vec::new(),
        message,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
