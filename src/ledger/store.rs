//! Ledger store: pool handle plus the transaction executor
//!
//! The pool is injected rather than ambient, so tests can run each against
//! an isolated store instance.

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use super::error::StoreError;
use super::models::{Account, Deposit, Entry, Transfer, Withdraw};
use super::repository;

/// Handle to the ledger store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `op` inside a single database transaction.
    ///
    /// Commits on `Ok`, rolls back on `Err` and propagates the original
    /// error. If the rollback itself fails, both errors are combined into
    /// [`StoreError::RollbackFailed`]. No partial effects are observable
    /// outside the transaction boundary.
    ///
    /// If the returned future is dropped before completion (caller timeout,
    /// client disconnect), the open transaction rolls back when its
    /// connection is returned to the pool, so cancellation leaves no
    /// partial writes either.
    pub async fn execute<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, StoreError>>,
    {
        let mut tx = self.pool.begin().await.map_err(StoreError::from)?;

        match op(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => match tx.rollback().await {
                Ok(()) => Err(err),
                Err(rollback) => Err(StoreError::RollbackFailed {
                    source: Box::new(err),
                    rollback,
                }),
            },
        }
    }

    // Pool-scoped wrappers over the row-level queries, for callers working
    // outside an explicit transaction. `get_account_for_update` has no
    // wrapper on purpose: a locking read is only meaningful inside one.

    pub async fn create_account(
        &self,
        owner: &str,
        balance: i64,
        currency: &str,
    ) -> Result<Account, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        repository::create_account(&mut conn, owner, balance, currency).await
    }

    pub async fn get_account(&self, id: i64) -> Result<Account, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        repository::get_account(&mut conn, id).await
    }

    /// Single-statement balance increment; atomic even in autocommit mode.
    pub async fn add_account_balance(&self, id: i64, delta: i64) -> Result<Account, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        repository::add_account_balance(&mut conn, id, delta).await
    }

    pub async fn get_entry(&self, id: i64) -> Result<Entry, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        repository::get_entry(&mut conn, id).await
    }

    pub async fn get_transfer(&self, id: i64) -> Result<Transfer, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        repository::get_transfer(&mut conn, id).await
    }

    pub async fn get_deposit(&self, id: i64) -> Result<Deposit, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        repository::get_deposit(&mut conn, id).await
    }

    pub async fn get_withdraw(&self, id: i64) -> Result<Withdraw, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::from)?;
        repository::get_withdraw(&mut conn, id).await
    }
}
