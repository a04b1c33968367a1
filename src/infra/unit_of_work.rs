//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories so services depend on one
//! injectable handle. Multi-statement writes run inside a database
//! transaction owned by the store method that needs it (see [`transaction`]).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::{
    PartnerRepository, PartnerStore, ReportRepository, ReportStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get service report repository
    fn reports(&self) -> Arc<dyn ReportRepository>;

    /// Get partner location repository
    fn partners(&self) -> Arc<dyn PartnerRepository>;
}

/// Concrete implementation of UnitOfWork backed by SeaORM stores
pub struct Persistence {
    user_repo: Arc<UserStore>,
    report_repo: Arc<ReportStore>,
    partner_repo: Arc<PartnerStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            report_repo: Arc::new(ReportStore::new(db.clone())),
            partner_repo: Arc::new(PartnerStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.report_repo.clone()
    }

    fn partners(&self) -> Arc<dyn PartnerRepository> {
        self.partner_repo.clone()
    }
}

/// Boxed future borrowed from a transaction
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Execute a closure within a ReadCommitted transaction.
///
/// The transaction is committed on success and rolled back on error. If the
/// caller's future is dropped first, SeaORM rolls back when the transaction
/// handle is dropped.
pub async fn transaction<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxFuture<'a, T> + Send,
    T: Send,
{
    let txn = db
        .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
        .await
        .map_err(AppError::from)?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
