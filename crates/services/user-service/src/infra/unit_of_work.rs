//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction lifecycle, so a
//! user and the address it owns are always written or removed together.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::{
    address_queries, user_queries, AddressRepository, AddressStore, UserRepository, UserStore,
};
use common::{AppError, AppResult};
use domain::{Address, NewAddress, NewUser, UpdateResult, UpdateUser, User};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// Tests implement it by hand around mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get address repository
    fn addresses(&self) -> Arc<dyn AddressRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error, and
    /// the closure's error is returned either way.
    /// Uses ReadCommitted isolation level.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    /// Create a new transaction context
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository { txn: self.txn }
    }

    /// Get address repository for this transaction
    pub fn addresses(&self) -> TxAddressRepository<'_> {
        TxAddressRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    address_repo: Arc<AddressStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let address_repo = Arc::new(AddressStore::new(db.clone()));
        Self {
            db,
            user_repo,
            address_repo,
        }
    }

    /// Runs `f` on a fresh transaction, committing on success and rolling back on error
    async fn execute_transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
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
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn addresses(&self) -> Arc<dyn AddressRepository> {
        self.address_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        self.execute_transaction(f).await
    }
}

/// Transaction-aware user repository.
///
/// Borrows the transaction, so it cannot outlive the enclosing closure.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl<'a> UserRepository for TxUserRepository<'a> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        user_queries::find_by_id(self.txn, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        user_queries::find_by_email(self.txn, email).await
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        user_queries::find_all(self.txn).await
    }

    async fn save(&self, fields: NewUser) -> AppResult<User> {
        user_queries::save(self.txn, fields).await
    }

    async fn update(&self, id: Uuid, patch: UpdateUser) -> AppResult<UpdateResult> {
        user_queries::update(self.txn, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        user_queries::delete(self.txn, id).await
    }
}

/// Transaction-aware address repository.
pub struct TxAddressRepository<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl<'a> AddressRepository for TxAddressRepository<'a> {
    async fn save(&self, fields: NewAddress) -> AppResult<Address> {
        address_queries::save(self.txn, fields).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        address_queries::delete(self.txn, id).await
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
