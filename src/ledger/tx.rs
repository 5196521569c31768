//! Composed ledger workflows: transfer, deposit, withdraw
//!
//! Each workflow validates its parameters, then runs a fixed sequence of
//! row-level operations inside one transaction via [`Store::execute`]. The
//! caller receives either a fully committed result or a typed error with the
//! transaction rolled back.

use serde::Serialize;

use super::error::StoreError;
use super::models::{Account, Deposit, Entry, Transfer, Withdraw};
use super::repository;
use super::store::Store;
use super::validation;

/// Parameters for [`Store::transfer_tx`]
#[derive(Debug, Clone, Copy)]
pub struct TransferTxParams {
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Positive integer in the smallest currency unit
    pub amount: i64,
}

/// Result of a committed transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferTxResult {
    pub transfer: Transfer,
    pub from_entry: Entry,
    pub to_entry: Entry,
    /// Post-update source account
    pub from_account: Account,
    /// Post-update destination account
    pub to_account: Account,
}

/// Parameters for [`Store::deposit_tx`]
#[derive(Debug, Clone)]
pub struct DepositTxParams {
    pub account_id: i64,
    pub amount: i64,
    pub username: String,
}

/// Result of a committed deposit
#[derive(Debug, Clone, Serialize)]
pub struct DepositTxResult {
    pub deposit: Deposit,
    pub entry: Entry,
    pub account: Account,
}

/// Parameters for [`Store::withdraw_tx`]
#[derive(Debug, Clone)]
pub struct WithdrawTxParams {
    pub account_id: i64,
    pub amount: i64,
    pub username: String,
}

/// Result of a committed withdrawal
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawTxResult {
    pub withdraw: Withdraw,
    pub entry: Entry,
    pub account: Account,
}

/// Order the two signed balance deltas of a transfer by ascending account id.
///
/// Row locks must be taken in a globally consistent order, keyed on the
/// account identifier and never on the from/to role. Otherwise two
/// concurrent opposite-direction transfers between the same pair (A→B and
/// B→A) lock A-then-B and B-then-A and deadlock on each other.
fn ordered_deltas(from_account_id: i64, to_account_id: i64, amount: i64) -> [(i64, i64); 2] {
    if from_account_id < to_account_id {
        [(from_account_id, -amount), (to_account_id, amount)]
    } else {
        [(to_account_id, amount), (from_account_id, -amount)]
    }
}

impl Store {
    /// Move `amount` from one account to another atomically.
    ///
    /// Inside one transaction: insert the transfer record, the debit entry,
    /// the credit entry, then apply both balance increments in ascending
    /// account-id order (see [`ordered_deltas`]). Returns only after commit.
    pub async fn transfer_tx(
        &self,
        params: TransferTxParams,
    ) -> Result<TransferTxResult, StoreError> {
        validation::validate_transfer(&params)?;
        let TransferTxParams {
            from_account_id,
            to_account_id,
            amount,
        } = params;

        let result = self
            .execute(move |conn| {
                Box::pin(async move {
                    let transfer = repository::create_transfer(
                        &mut *conn,
                        from_account_id,
                        to_account_id,
                        amount,
                    )
                    .await?;

                    let from_entry =
                        repository::create_entry(&mut *conn, from_account_id, -amount).await?;
                    let to_entry =
                        repository::create_entry(&mut *conn, to_account_id, amount).await?;

                    let [(first_id, first_delta), (second_id, second_delta)] =
                        ordered_deltas(from_account_id, to_account_id, amount);

                    let first =
                        repository::add_account_balance(&mut *conn, first_id, first_delta).await?;
                    let second =
                        repository::add_account_balance(&mut *conn, second_id, second_delta)
                            .await?;

                    let (from_account, to_account) = if first_id == from_account_id {
                        (first, second)
                    } else {
                        (second, first)
                    };

                    Ok(TransferTxResult {
                        transfer,
                        from_entry,
                        to_entry,
                        from_account,
                        to_account,
                    })
                })
            })
            .await?;

        tracing::debug!(
            transfer_id = result.transfer.id,
            from_account_id,
            to_account_id,
            amount,
            "transfer committed"
        );
        Ok(result)
    }

    /// Increase one account's balance by `amount`, attributed to `username`.
    ///
    /// Inside one transaction: insert the deposit record, the credit entry,
    /// then increment the balance. Only one row is locked, so no ordering
    /// rule applies.
    pub async fn deposit_tx(&self, params: DepositTxParams) -> Result<DepositTxResult, StoreError> {
        validation::validate_amount(params.amount)?;
        let DepositTxParams {
            account_id,
            amount,
            username,
        } = params;

        let result = self
            .execute(move |conn| {
                Box::pin(async move {
                    let deposit =
                        repository::create_deposit(&mut *conn, account_id, amount, &username)
                            .await?;
                    let entry = repository::create_entry(&mut *conn, account_id, amount).await?;
                    let account =
                        repository::add_account_balance(&mut *conn, account_id, amount).await?;

                    Ok(DepositTxResult {
                        deposit,
                        entry,
                        account,
                    })
                })
            })
            .await?;

        tracing::debug!(
            deposit_id = result.deposit.id,
            account_id,
            amount,
            "deposit committed"
        );
        Ok(result)
    }

    /// Decrease one account's balance by `amount`, attributed to `username`.
    ///
    /// Mirror of [`Store::deposit_tx`] with a debit entry; subject to the
    /// non-negative balance rule enforced by the increment primitive.
    pub async fn withdraw_tx(
        &self,
        params: WithdrawTxParams,
    ) -> Result<WithdrawTxResult, StoreError> {
        validation::validate_amount(params.amount)?;
        let WithdrawTxParams {
            account_id,
            amount,
            username,
        } = params;

        let result = self
            .execute(move |conn| {
                Box::pin(async move {
                    let withdraw =
                        repository::create_withdraw(&mut *conn, account_id, amount, &username)
                            .await?;
                    let entry = repository::create_entry(&mut *conn, account_id, -amount).await?;
                    let account =
                        repository::add_account_balance(&mut *conn, account_id, -amount).await?;

                    Ok(WithdrawTxResult {
                        withdraw,
                        entry,
                        account,
                    })
                })
            })
            .await?;

        tracing::debug!(
            withdraw_id = result.withdraw.id,
            account_id,
            amount,
            "withdraw committed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_id_locked_first_when_sending_up() {
        let deltas = ordered_deltas(1, 2, 10);
        assert_eq!(deltas, [(1, -10), (2, 10)]);
    }

    #[test]
    fn test_lower_id_locked_first_when_sending_down() {
        // The credited account has the lower id; it must still come first.
        let deltas = ordered_deltas(2, 1, 10);
        assert_eq!(deltas, [(1, 10), (2, -10)]);
    }

    #[test]
    fn test_opposite_directions_share_one_lock_order() {
        // A→B and B→A must touch rows in the same sequence of ids,
        // otherwise they can deadlock on each other.
        let a_to_b = ordered_deltas(1, 2, 10);
        let b_to_a = ordered_deltas(2, 1, 10);
        let ids = |d: [(i64, i64); 2]| [d[0].0, d[1].0];
        assert_eq!(ids(a_to_b), ids(b_to_a));
    }

    #[test]
    fn test_deltas_conserve_funds() {
        for (from, to) in [(1, 2), (9, 4), (100, 7)] {
            let deltas = ordered_deltas(from, to, 25);
            assert_eq!(deltas[0].1 + deltas[1].1, 0);
        }
    }
}
