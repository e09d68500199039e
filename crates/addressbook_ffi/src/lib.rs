//! Flutter-facing bridge crate for the address book core.

pub mod api;
