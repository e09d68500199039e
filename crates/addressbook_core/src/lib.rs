//! Core domain logic for the address book.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod interchange;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use config::AddressBookConfig;
pub use export::ExportError;
pub use import::{ImportError, ImportReport};
pub use interchange::ExchangeFormat;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactField, ContactFields, ContactId};
pub use repo::contact_repo::{
    ContactChange, ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
pub use search::SearchQuery;
pub use service::address_book_service::AddressBookService;
pub use store::contact_store::{ContactStore, MergeOutcome, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
