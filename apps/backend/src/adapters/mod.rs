//! SeaORM adapters: the only layer that builds queries against entities.

pub mod courses_sea;
pub mod students_sea;
