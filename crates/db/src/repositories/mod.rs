//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-table writes go
//! through [`LedgerRepo`] so they commit or roll back as a unit.

pub mod ledger_repo;
pub mod notification_repo;
pub mod report_repo;
pub mod reward_repo;
pub mod session_repo;
pub mod transaction_repo;
pub mod user_repo;

pub use ledger_repo::{GrantOutcome, LedgerError, LedgerRepo};
pub use notification_repo::NotificationRepo;
pub use report_repo::{CollectOutcome, ReportRepo, SubmittedReport};
pub use reward_repo::RewardRepo;
pub use session_repo::SessionRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
