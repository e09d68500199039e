//! Domain model for the address book.
//!
//! # Responsibility
//! - Define the canonical contact record and field schema used everywhere.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - Deletion is a hard delete; identities are never reused.

pub mod contact;
