//! Ledger data models
//!
//! Accounts hold mutable balances; entries, transfers, deposits and
//! withdraws are append-only and immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Bank account holding a balance in the smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub balance: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable ledger line: one account's signed balance delta
/// (negative = debit, positive = credit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Authoritative record of one atomic movement of funds between two accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Transfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Record of one atomic credit to a single account, attributed to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Deposit {
    pub id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Record of one atomic debit from a single account, attributed to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Withdraw {
    pub id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}
