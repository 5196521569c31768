//! Atomic ledger core
//!
//! Accounts, immutable entries, and the transfer/deposit/withdraw workflows,
//! all executed inside single database transactions with identifier-ordered
//! row locking.

pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod tx;
pub mod validation;

// Re-export commonly used types
pub use error::StoreError;
pub use models::{Account, Deposit, Entry, Transfer, Withdraw};
pub use store::Store;
pub use tx::{
    DepositTxParams, DepositTxResult, TransferTxParams, TransferTxResult, WithdrawTxParams,
    WithdrawTxResult,
};
