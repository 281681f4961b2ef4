use async_trait::async_trait;

use super::repository::{PostRepository, TagRepository, UserRepository};
use crate::error::RepoError;

/// A request-scoped transaction exposing the repositories.
///
/// Dropping a unit of work without calling [`UnitOfWork::commit`] rolls back
/// everything written through it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn posts(&self) -> &dyn PostRepository;

    fn tags(&self) -> &dyn TagRepository;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepoError>;
}

/// Source of units of work, one per request.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError>;
}
