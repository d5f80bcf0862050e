//! Service layer - business rules on top of the repos.

pub mod courses;
