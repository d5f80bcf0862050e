//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: unified logging
//! initialization, Problem Details assertions and unique test data helpers.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
