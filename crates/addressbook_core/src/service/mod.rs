//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, import, export and search into use-case APIs.
//! - Keep FFI/CLI surfaces decoupled from storage details.

pub mod address_book_service;
