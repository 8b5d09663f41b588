//! Domain logic shared across the wastewise workspace.
//!
//! Contains only pure types and functions -- no I/O. The database layer
//! (`wastewise-db`) and HTTP layer (`wastewise-api`) build on these.

pub mod error;
pub mod ledger;
pub mod types;
pub mod verification;
