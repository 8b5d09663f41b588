//! Reward-ledger constants, transaction typing, and pure balance logic.
//!
//! The ledger records every point change as an immutable transaction row.
//! A user's balance is always derivable from the full transaction history;
//! the `rewards.points` column is a running total maintained alongside it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reward amounts
// ---------------------------------------------------------------------------

/// Points granted for submitting a verified waste report.
pub const REPORT_REWARD_POINTS: i32 = 10;

/// Points granted for collecting a reported waste item.
pub const COLLECT_REWARD_POINTS: i32 = 15;

// ---------------------------------------------------------------------------
// Transaction typing
// ---------------------------------------------------------------------------

/// Typed reason for a ledger transaction.
///
/// Stored as a string in the `transactions.type` column. Earning types add
/// to the balance, `Redeemed` subtracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    EarnedReport,
    EarnedCollect,
    Redeemed,
}

impl TransactionType {
    /// The string stored in the `transactions.type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EarnedReport => "earned_report",
            Self::EarnedCollect => "earned_collect",
            Self::Redeemed => "redeemed",
        }
    }

    /// Whether this transaction type adds to the balance.
    pub fn is_earning(self) -> bool {
        matches!(self, Self::EarnedReport | Self::EarnedCollect)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earned_report" => Ok(Self::EarnedReport),
            "earned_collect" => Ok(Self::EarnedCollect),
            "redeemed" => Ok(Self::Redeemed),
            other => Err(format!("Unknown transaction type: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Balance derivation
// ---------------------------------------------------------------------------

/// A (type, amount) pair from the ledger. Amounts are always positive;
/// the sign is carried by the type.
#[derive(Debug, Clone, Copy)]
pub struct LedgerEntry {
    pub kind: TransactionType,
    pub amount: i32,
}

/// Compute a balance from ledger entries: earning types add, redemptions
/// subtract, and the result is floored at zero.
///
/// The input must be the user's FULL transaction history. Summing only a
/// recent page of transactions produces a wrong balance for any user with
/// more transactions than the page size.
pub fn balance(entries: &[LedgerEntry]) -> i64 {
    let sum: i64 = entries
        .iter()
        .map(|e| {
            if e.kind.is_earning() {
                e.amount as i64
            } else {
                -(e.amount as i64)
            }
        })
        .sum();
    sum.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: TransactionType, amount: i32) -> LedgerEntry {
        LedgerEntry { kind, amount }
    }

    #[test]
    fn test_transaction_type_round_trip() {
        for kind in [
            TransactionType::EarnedReport,
            TransactionType::EarnedCollect,
            TransactionType::Redeemed,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionType>(), Ok(kind));
        }
        assert!("earned_mystery".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_balance_empty_history_is_zero() {
        assert_eq!(balance(&[]), 0);
    }

    #[test]
    fn test_balance_sums_earnings_minus_redemptions() {
        let entries = [
            entry(TransactionType::EarnedReport, 10),
            entry(TransactionType::EarnedCollect, 15),
            entry(TransactionType::Redeemed, 5),
        ];
        assert_eq!(balance(&entries), 20);
    }

    #[test]
    fn test_balance_is_floored_at_zero() {
        let entries = [
            entry(TransactionType::EarnedReport, 10),
            entry(TransactionType::Redeemed, 50),
        ];
        assert_eq!(balance(&entries), 0);
    }

    /// Summing only the 10 most recent transactions produces the wrong
    /// balance once an older transaction falls off the page: 10 reports of
    /// 10 points each plus one older redemption of 50 must net to 50, but
    /// the newest-10 page misses the redemption and reports 100.
    #[test]
    fn test_balance_requires_full_history_not_recent_page() {
        // Oldest first: the redemption, then ten report earnings.
        let mut history = vec![entry(TransactionType::Redeemed, 50)];
        history.extend((0..10).map(|_| entry(TransactionType::EarnedReport, 10)));

        assert_eq!(balance(&history), 50);

        // The ten newest entries exclude the redemption.
        let recent_page = &history[history.len() - 10..];
        assert_eq!(balance(recent_page), 100);
        assert_ne!(balance(&history), balance(recent_page));
    }
}
