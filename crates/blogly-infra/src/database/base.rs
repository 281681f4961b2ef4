use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbErr, EntityTrait, PrimaryKeyTrait, Select};

use blogly_core::error::RepoError;
use blogly_core::ports::BaseRepository;

/// Default ordering of an entity's listing page.
pub trait Listing: EntityTrait {
    fn listing(select: Select<Self>) -> Select<Self>;
}

/// Generic SeaORM repository bound to one request transaction.
pub struct SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub(crate) conn: Arc<DatabaseTransaction>,
    _entity: PhantomData<E>,
}

impl<E> SeaOrmRepository<E>
where
    E: EntityTrait,
{
    pub fn new(conn: Arc<DatabaseTransaction>) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub(crate) fn conn(&self) -> &DatabaseTransaction {
        &self.conn
    }
}

#[async_trait]
impl<E, T> BaseRepository<T, i32> for SeaOrmRepository<E>
where
    E: EntityTrait + Listing,
    E::Model: Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: i32) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(self.conn()).await.map_err(db_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        let result = E::listing(E::find())
            .all(self.conn())
            .await
            .map_err(db_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Map a SeaORM error onto the repository error taxonomy.
pub(crate) fn db_error(err: DbErr) -> RepoError {
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => {
            let err_str = other.to_string();
            let lowered = err_str.to_lowercase();
            if lowered.contains("duplicate")
                || lowered.contains("unique")
                || lowered.contains("foreign key")
            {
                RepoError::Constraint(err_str)
            } else {
                RepoError::Query(err_str)
            }
        }
    }
}
