//! Pre-transaction parameter validation
//!
//! Invalid parameters are rejected here, before any transaction is opened,
//! so no storage work is wasted on a request that can never commit.

use super::error::StoreError;
use super::tx::TransferTxParams;

/// Amounts are positive integers in the smallest currency unit.
pub fn validate_amount(amount: i64) -> Result<(), StoreError> {
    if amount <= 0 {
        return Err(StoreError::InvalidAmount(amount));
    }
    Ok(())
}

/// A self-transfer has no meaningful lock ordering and indicates a caller
/// error, so it is rejected before any row lock is attempted.
pub fn validate_transfer(params: &TransferTxParams) -> Result<(), StoreError> {
    validate_amount(params.amount)?;
    if params.from_account_id == params.to_account_id {
        return Err(StoreError::SameAccount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_must_be_positive() {
        assert!(validate_amount(1).is_ok());
        assert!(matches!(
            validate_amount(0),
            Err(StoreError::InvalidAmount(0))
        ));
        assert!(matches!(
            validate_amount(-5),
            Err(StoreError::InvalidAmount(-5))
        ));
    }

    #[test]
    fn test_self_transfer_rejected() {
        let params = TransferTxParams {
            from_account_id: 3,
            to_account_id: 3,
            amount: 10,
        };
        assert!(matches!(
            validate_transfer(&params),
            Err(StoreError::SameAccount)
        ));
    }

    #[test]
    fn test_valid_transfer_params() {
        let params = TransferTxParams {
            from_account_id: 1,
            to_account_id: 2,
            amount: 10,
        };
        assert!(validate_transfer(&params).is_ok());
    }

    #[test]
    fn test_amount_checked_before_account_pair() {
        // A zero-amount self-transfer reports the amount problem first.
        let params = TransferTxParams {
            from_account_id: 4,
            to_account_id: 4,
            amount: 0,
        };
        assert!(matches!(
            validate_transfer(&params),
            Err(StoreError::InvalidAmount(0))
        ));
    }
}
