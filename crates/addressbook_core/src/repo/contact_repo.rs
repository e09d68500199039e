//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist contacts to the backing file and rehydrate them in order.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `load_contacts` returns rows in creation order (`seq ASC`).
//! - `apply_changes` is all-or-nothing: one transaction per batch.
//! - Read paths reject invalid persisted ids instead of masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::contact::{Contact, ContactFields, ContactId};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CONTACT_COLUMNS: [&str; 12] = [
    "uuid",
    "full_name",
    "first_name",
    "last_name",
    "email",
    "phone",
    "mobile",
    "address",
    "postal_code",
    "city",
    "birthday",
    "website",
];

const CONTACT_SELECT_SQL: &str = "SELECT
    uuid,
    full_name,
    first_name,
    last_name,
    email,
    phone,
    mobile,
    address,
    postal_code,
    city,
    birthday,
    website
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection was not migrated to the schema this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "contact repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "contact repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "contact repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One pending write in a batch applied by [`ContactRepository::apply_changes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactChange {
    Insert(Contact),
    Update(Contact),
}

/// Persistence interface behind the in-memory contact store.
pub trait ContactRepository {
    /// Loads every stored contact in creation order.
    fn load_contacts(&self) -> RepoResult<Vec<Contact>>;
    /// Appends one new contact.
    fn insert_contact(&self, contact: &Contact) -> RepoResult<()>;
    /// Replaces all fields of one contact. Returns `false` when absent.
    fn update_contact(&self, contact: &Contact) -> RepoResult<bool>;
    /// Hard-deletes one contact. Returns `false` when absent.
    fn delete_contact(&self, id: ContactId) -> RepoResult<bool>;
    /// Applies inserts and updates in order inside one transaction.
    fn apply_changes(&self, changes: &[ContactChange]) -> RepoResult<()>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` does not match.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_contact_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn load_contacts(&self) -> RepoResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn insert_contact(&self, contact: &Contact) -> RepoResult<()> {
        insert_row(self.conn, contact)
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<bool> {
        update_row(self.conn, contact)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE uuid = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn apply_changes(&self, changes: &[ContactChange]) -> RepoResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for change in changes {
            match change {
                ContactChange::Insert(contact) => insert_row(&tx, contact)?,
                ContactChange::Update(contact) => {
                    if !update_row(&tx, contact)? {
                        return Err(RepoError::InvalidData(format!(
                            "batch update targets missing contact {}",
                            contact.id
                        )));
                    }
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn insert_row(conn: &Connection, contact: &Contact) -> RepoResult<()> {
    let fields = &contact.fields;
    conn.execute(
        "INSERT INTO contacts (
            uuid,
            full_name,
            first_name,
            last_name,
            email,
            phone,
            mobile,
            address,
            postal_code,
            city,
            birthday,
            website
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
        params![
            contact.id.to_string(),
            fields.full_name,
            fields.first_name,
            fields.last_name,
            fields.email,
            fields.phone,
            fields.mobile,
            fields.address,
            fields.postal_code,
            fields.city,
            fields.birthday,
            fields.website,
        ],
    )?;
    Ok(())
}

fn update_row(conn: &Connection, contact: &Contact) -> RepoResult<bool> {
    let fields = &contact.fields;
    let changed = conn.execute(
        "UPDATE contacts
         SET
            full_name = ?2,
            first_name = ?3,
            last_name = ?4,
            email = ?5,
            phone = ?6,
            mobile = ?7,
            address = ?8,
            postal_code = ?9,
            city = ?10,
            birthday = ?11,
            website = ?12,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?1;",
        params![
            contact.id.to_string(),
            fields.full_name,
            fields.first_name,
            fields.last_name,
            fields.email,
            fields.phone,
            fields.mobile,
            fields.address,
            fields.postal_code,
            fields.city,
            fields.birthday,
            fields.website,
        ],
    )?;
    Ok(changed > 0)
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in contacts.uuid"))
    })?;

    let fields = ContactFields {
        full_name: row.get("full_name")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        mobile: row.get("mobile")?,
        address: row.get("address")?,
        postal_code: row.get("postal_code")?,
        city: row.get("city")?,
        birthday: row.get("birthday")?,
        website: row.get("website")?,
    };
    Ok(Contact::with_id(id, fields))
}

fn ensure_contact_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "contacts")? {
        return Err(RepoError::MissingRequiredTable("contacts"));
    }

    let present = table_columns(conn, "contacts")?;
    for column in CONTACT_COLUMNS.iter().copied().chain(["seq"]) {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "contacts",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
