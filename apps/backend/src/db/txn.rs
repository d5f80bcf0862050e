use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use super::{require_db, txn_policy};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// A test-owned transaction that can be injected into request extensions.
///
/// When present, `with_txn` runs inside it and never commits or rolls back;
/// the owner does that once all requests are finished.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    /// Begin a transaction on `db` and wrap it for sharing.
    pub async fn open(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        Ok(Self(Arc::new(txn)))
    }

    /// Look up a shared transaction injected into the request, if any.
    pub fn from_req(req: &HttpRequest) -> Option<Self> {
        req.extensions().get::<SharedTxn>().cloned()
    }

    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    /// Roll back the transaction.
    ///
    /// Fails if another clone is still alive (e.g. a request that has not
    /// been fully consumed).
    pub async fn rollback(self) -> Result<(), DbErr> {
        let txn = Arc::try_unwrap(self.0).map_err(|_| {
            DbErr::Custom("Cannot rollback: transaction is still shared".to_string())
        })?;
        txn.rollback().await
    }
}

/// Execute `f` within a database transaction.
///
/// 1) If a SharedTxn is in request extensions, use it (no commit/rollback here)
/// 2) Otherwise begin a txn, run `f`, apply the policy on Ok and roll back on Err
pub async fn with_txn<R, F>(
    req: Option<&HttpRequest>,
    state: &AppState,
    f: F,
) -> Result<R, AppError>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> LocalBoxFuture<'a, Result<R, AppError>>,
{
    // Clone out of the extensions before awaiting so no RefCell borrow is held.
    if let Some(shared) = req.and_then(SharedTxn::from_req) {
        return f(shared.transaction()).await;
    }

    let db = require_db(state)?;
    let txn = db.begin().await?;

    match f(&txn).await {
        Ok(val) => {
            match txn_policy::current() {
                txn_policy::TxnPolicy::CommitOnOk => txn.commit().await?,
                txn_policy::TxnPolicy::RollbackOnOk => txn.rollback().await?,
            }
            Ok(val)
        }
        Err(err) => {
            // Best-effort rollback; preserve original error
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "with_txn rollback failed");
            }
            Err(err)
        }
    }
}
