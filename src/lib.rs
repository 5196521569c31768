//! bankcore - Atomic Ledger-Transfer Engine
//!
//! Moves funds between accounts atomically on PostgreSQL, records immutable
//! audit entries, and stays correct under unbounded concurrent requests,
//! including opposite-direction transfers between the same account pair.
//!
//! # Modules
//!
//! - [`config`] - YAML application config
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - connection pool and migrations
//! - [`ledger`] - accounts, entries, and the transactional workflows
//!
//! The surrounding request layer (HTTP routing, auth, serialization) is not
//! part of this crate; it calls [`ledger::Store`] and maps [`StoreError`]
//! kinds onto its own responses.

pub mod config;
pub mod db;
pub mod ledger;
pub mod logging;

// Convenient re-exports at crate root
pub use config::{AppConfig, DatabaseConfig};
pub use db::Database;
pub use ledger::{
    Account, Deposit, DepositTxParams, DepositTxResult, Entry, Store, StoreError, Transfer,
    TransferTxParams, TransferTxResult, Withdraw, WithdrawTxParams, WithdrawTxResult,
};
