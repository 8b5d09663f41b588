//! Entity models and DTOs, one module per table.

pub mod notification;
pub mod report;
pub mod reward;
pub mod session;
pub mod transaction;
pub mod user;
