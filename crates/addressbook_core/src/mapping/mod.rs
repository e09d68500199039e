//! Field Mapper: external field names onto the canonical schema.

pub mod field_mapper;
