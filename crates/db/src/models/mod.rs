//! Row structs and DTOs, one module per entity.

pub mod detection;
