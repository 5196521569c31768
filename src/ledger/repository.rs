//! Row-level ledger queries
//!
//! Every function takes `&mut PgConnection` so it composes equally inside a
//! transaction (via the store executor) or against a pooled connection.

use sqlx::PgConnection;

use super::error::StoreError;
use super::models::{Account, Deposit, Entry, Transfer, Withdraw};

// === Accounts ===

pub async fn create_account(
    conn: &mut PgConnection,
    owner: &str,
    balance: i64,
    currency: &str,
) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"INSERT INTO accounts (owner, balance, currency)
           VALUES ($1, $2, $3)
           RETURNING id, owner, balance, currency, created_at"#,
    )
    .bind(owner)
    .bind(balance)
    .bind(currency)
    .fetch_one(&mut *conn)
    .await?;

    Ok(account)
}

pub async fn get_account(conn: &mut PgConnection, id: i64) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"SELECT id, owner, balance, currency, created_at
           FROM accounts WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    account.ok_or(StoreError::AccountNotFound(id))
}

/// Point read holding a row-level exclusive lock until the surrounding
/// transaction commits or rolls back. Only meaningful inside a transaction.
pub async fn get_account_for_update(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"SELECT id, owner, balance, currency, created_at
           FROM accounts WHERE id = $1
           FOR UPDATE"#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    account.ok_or(StoreError::AccountNotFound(id))
}

/// Apply a signed delta to an account balance as one atomic read-modify-write.
///
/// The update is conditional on the result staying non-negative, so a debit
/// that would overdraw the account matches zero rows and the transaction is
/// aborted with `InsufficientBalance`. Never implemented as read-then-write:
/// the single UPDATE takes the row lock and computes the new balance in the
/// database, which rules out lost updates under concurrency.
pub async fn add_account_balance(
    conn: &mut PgConnection,
    id: i64,
    delta: i64,
) -> Result<Account, StoreError> {
    let updated = sqlx::query_as::<_, Account>(
        r#"UPDATE accounts
           SET balance = balance + $1
           WHERE id = $2 AND balance + $1 >= 0
           RETURNING id, owner, balance, currency, created_at"#,
    )
    .bind(delta)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    match updated {
        Some(account) => Ok(account),
        // Zero rows: the account is missing, or the debit would overdraw it.
        // Either way the caller's transaction aborts; a plain read tells
        // the two conditions apart.
        None => match sqlx::query_scalar::<_, i64>(r#"SELECT balance FROM accounts WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        {
            Some(balance) => Err(StoreError::InsufficientBalance {
                account_id: id,
                balance,
                delta,
            }),
            None => Err(StoreError::AccountNotFound(id)),
        },
    }
}

// === Entries ===

pub async fn create_entry(
    conn: &mut PgConnection,
    account_id: i64,
    amount: i64,
) -> Result<Entry, StoreError> {
    let entry = sqlx::query_as::<_, Entry>(
        r#"INSERT INTO entries (account_id, amount)
           VALUES ($1, $2)
           RETURNING id, account_id, amount, created_at"#,
    )
    .bind(account_id)
    .bind(amount)
    .fetch_one(&mut *conn)
    .await?;

    Ok(entry)
}

pub async fn get_entry(conn: &mut PgConnection, id: i64) -> Result<Entry, StoreError> {
    let entry = sqlx::query_as::<_, Entry>(
        r#"SELECT id, account_id, amount, created_at
           FROM entries WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    entry.ok_or(StoreError::NotFound {
        entity: "entry",
        id,
    })
}

// === Transfers ===

pub async fn create_transfer(
    conn: &mut PgConnection,
    from_account_id: i64,
    to_account_id: i64,
    amount: i64,
) -> Result<Transfer, StoreError> {
    let transfer = sqlx::query_as::<_, Transfer>(
        r#"INSERT INTO transfers (from_account_id, to_account_id, amount)
           VALUES ($1, $2, $3)
           RETURNING id, from_account_id, to_account_id, amount, created_at"#,
    )
    .bind(from_account_id)
    .bind(to_account_id)
    .bind(amount)
    .fetch_one(&mut *conn)
    .await?;

    Ok(transfer)
}

pub async fn get_transfer(conn: &mut PgConnection, id: i64) -> Result<Transfer, StoreError> {
    let transfer = sqlx::query_as::<_, Transfer>(
        r#"SELECT id, from_account_id, to_account_id, amount, created_at
           FROM transfers WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    transfer.ok_or(StoreError::NotFound {
        entity: "transfer",
        id,
    })
}

// === Deposits ===

pub async fn create_deposit(
    conn: &mut PgConnection,
    account_id: i64,
    amount: i64,
    username: &str,
) -> Result<Deposit, StoreError> {
    let deposit = sqlx::query_as::<_, Deposit>(
        r#"INSERT INTO deposits (account_id, amount, username)
           VALUES ($1, $2, $3)
           RETURNING id, account_id, amount, username, created_at"#,
    )
    .bind(account_id)
    .bind(amount)
    .bind(username)
    .fetch_one(&mut *conn)
    .await?;

    Ok(deposit)
}

pub async fn get_deposit(conn: &mut PgConnection, id: i64) -> Result<Deposit, StoreError> {
    let deposit = sqlx::query_as::<_, Deposit>(
        r#"SELECT id, account_id, amount, username, created_at
           FROM deposits WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    deposit.ok_or(StoreError::NotFound {
        entity: "deposit",
        id,
    })
}

// === Withdraws ===

pub async fn create_withdraw(
    conn: &mut PgConnection,
    account_id: i64,
    amount: i64,
    username: &str,
) -> Result<Withdraw, StoreError> {
    let withdraw = sqlx::query_as::<_, Withdraw>(
        r#"INSERT INTO withdraws (account_id, amount, username)
           VALUES ($1, $2, $3)
           RETURNING id, account_id, amount, username, created_at"#,
    )
    .bind(account_id)
    .bind(amount)
    .bind(username)
    .fetch_one(&mut *conn)
    .await?;

    Ok(withdraw)
}

pub async fn get_withdraw(conn: &mut PgConnection, id: i64) -> Result<Withdraw, StoreError> {
    let withdraw = sqlx::query_as::<_, Withdraw>(
        r#"SELECT id, account_id, amount, username, created_at
           FROM withdraws WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    withdraw.ok_or(StoreError::NotFound {
        entity: "withdraw",
        id,
    })
}
