//! Ledger Error Types
//!
//! The store layer classifies driver errors once, here, so callers branch on
//! a closed set of kinds instead of inspecting SQLSTATE codes themselves.

use thiserror::Error;

/// Errors surfaced by the ledger store and its workflows
#[derive(Debug, Error)]
pub enum StoreError {
    // === Not-found ===
    #[error("account not found: {0}")]
    AccountNotFound(i64),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    // === Validation (rejected before any transaction is opened) ===
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("source and destination accounts are the same")]
    SameAccount,

    // === Business rule ===
    #[error("insufficient balance on account {account_id}: balance {balance}, delta {delta}")]
    InsufficientBalance {
        account_id: i64,
        balance: i64,
        delta: i64,
    },

    // === Storage failures ===
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("transient storage failure: {0}")]
    Transient(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Rollback itself failed after a workflow error. Both causes are kept:
    /// losing the rollback failure would hide a storage-layer problem.
    #[error("rollback failed after `{source}`: {rollback}")]
    RollbackFailed {
        source: Box<StoreError>,
        rollback: sqlx::Error,
    },
}

impl StoreError {
    /// Whether the caller may retry the whole workflow call.
    ///
    /// The core never retries internally; it reports the failure and lets
    /// the caller decide.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                // 40001 serialization_failure, 40P01 deadlock_detected,
                // 55P03 lock_not_available
                match code.as_ref() {
                    "40001" | "40P01" | "55P03" => {
                        return StoreError::Transient(db_err.to_string());
                    }
                    // Class 23: integrity constraint violation
                    c if c.starts_with("23") => {
                        return StoreError::ConstraintViolation(db_err.to_string());
                    }
                    _ => {}
                }
            }
        }
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(StoreError::Transient("deadlock detected".into()).is_retryable());
        assert!(!StoreError::AccountNotFound(7).is_retryable());
        assert!(!StoreError::SameAccount.is_retryable());
        assert!(!StoreError::ConstraintViolation("fk".into()).is_retryable());
    }

    #[test]
    fn test_rollback_failed_keeps_both_causes() {
        let err = StoreError::RollbackFailed {
            source: Box::new(StoreError::AccountNotFound(42)),
            rollback: sqlx::Error::PoolClosed,
        };
        let msg = err.to_string();
        assert!(msg.contains("account not found: 42"));
        assert!(msg.contains("rollback failed"));
    }

    #[test]
    fn test_display_messages() {
        let err = StoreError::InsufficientBalance {
            account_id: 1,
            balance: 10,
            delta: -100,
        };
        assert_eq!(
            err.to_string(),
            "insufficient balance on account 1: balance 10, delta -100"
        );

        let err = StoreError::NotFound {
            entity: "entry",
            id: 9,
        };
        assert_eq!(err.to_string(), "entry not found: 9");
    }
}
