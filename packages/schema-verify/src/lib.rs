//! Verification of the `university` database: schema shape, seed data and
//! business-rule constraints.
//!
//! Each [`Check`] runs in isolation and its outcome lands in a [`Report`];
//! only a failed initial connection aborts a run.

pub mod checks;
pub mod error;
pub mod expected;
pub mod introspect;
pub mod report;
pub mod runner;

pub use checks::Check;
pub use error::{CheckError, VerifyError};
pub use report::{CheckOutcome, Report};
pub use runner::{run, run_checks};
