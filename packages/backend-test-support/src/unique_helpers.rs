//! Test helpers for generating unique test data
//!
//! ULID suffixes keep generated names distinct across tests and runs.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("course");
/// let b = unique_str("course");
/// assert_ne!(a, b);
/// assert!(a.starts_with("course-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique human-ish name, e.g. `"Course 01HZ..."`.
///
/// Stays well under the 256 character course name limit.
pub fn unique_name(kind: &str) -> String {
    format!("{} {}", kind, Ulid::new())
}
