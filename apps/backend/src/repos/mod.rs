//! Repository layer - domain models over the SeaORM adapters.

pub mod courses;
pub mod students;
