//! Test support utilities for the schema verifier
//!
//! This crate provides unified test logging, unique test data helpers, and
//! fixtures that provision a `university` database for live-server tests.

pub mod fixtures;
pub mod logging;

use ulid::Ulid;

/// Generate a unique email address with the given prefix
///
/// # Returns
/// A unique email address in the format `{prefix}-{ulid}@example.test`
///
/// # Examples
/// ```
/// use test_support::unique_email;
///
/// let email1 = unique_email("test");
/// let email2 = unique_email("test");
/// assert_ne!(email1, email2);
/// assert!(email1.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}
