use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbConn, TransactionTrait};

use blogly_core::error::RepoError;
use blogly_core::ports::{PostRepository, Store, TagRepository, UnitOfWork, UserRepository};

use super::repositories::{SeaOrmPostRepository, SeaOrmTagRepository, SeaOrmUserRepository};

/// Hands out one SeaORM transaction per request.
pub struct SeaOrmStore {
    db: DbConn,
}

impl SeaOrmStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DbConn {
        &self.db
    }
}

#[async_trait]
impl Store for SeaOrmStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Ok(Box::new(SeaOrmUnitOfWork::new(txn)))
    }
}

/// Repositories sharing a single open transaction.
///
/// The transaction rolls back when this is dropped without a commit.
pub struct SeaOrmUnitOfWork {
    txn: Arc<DatabaseTransaction>,
    users: SeaOrmUserRepository,
    posts: SeaOrmPostRepository,
    tags: SeaOrmTagRepository,
}

impl SeaOrmUnitOfWork {
    pub fn new(txn: DatabaseTransaction) -> Self {
        let txn = Arc::new(txn);
        Self {
            users: SeaOrmUserRepository::new(txn.clone()),
            posts: SeaOrmPostRepository::new(txn.clone()),
            tags: SeaOrmTagRepository::new(txn.clone()),
            txn,
        }
    }

    /// Release the repositories and take back sole ownership of the transaction.
    fn into_transaction(self) -> Result<DatabaseTransaction, RepoError> {
        let Self {
            txn,
            users,
            posts,
            tags,
        } = self;
        drop((users, posts, tags));

        Arc::try_unwrap(txn)
            .map_err(|_| RepoError::Connection("transaction is still shared".to_string()))
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn posts(&self) -> &dyn PostRepository {
        &self.posts
    }

    fn tags(&self) -> &dyn TagRepository {
        &self.tags
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.into_transaction()?
            .commit()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.into_transaction()?
            .rollback()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))
    }
}
