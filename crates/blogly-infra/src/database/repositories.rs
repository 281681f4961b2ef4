//! SeaORM repository implementations.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set, Unchanged,
};

use blogly_core::domain::{NewPost, NewTag, NewUser, Post, PostChanges, Tag, User};
use blogly_core::error::RepoError;
use blogly_core::ports::{PostRepository, TagRepository, UserRepository};

use super::base::{Listing, SeaOrmRepository, db_error};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};

/// SeaORM user repository.
pub type SeaOrmUserRepository = SeaOrmRepository<UserEntity>;

/// SeaORM post repository.
pub type SeaOrmPostRepository = SeaOrmRepository<PostEntity>;

/// SeaORM tag repository.
pub type SeaOrmTagRepository = SeaOrmRepository<TagEntity>;

impl Listing for UserEntity {
    fn listing(select: Select<Self>) -> Select<Self> {
        select
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .order_by_asc(user::Column::Id)
    }
}

impl Listing for PostEntity {
    // Newest first; ids break ties between posts created in the same instant.
    fn listing(select: Select<Self>) -> Select<Self> {
        select
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
    }
}

impl Listing for TagEntity {
    fn listing(select: Select<Self>) -> Select<Self> {
        select
            .order_by_asc(tag::Column::Name)
            .order_by_asc(tag::Column::Id)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            id: NotSet,
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            image_url: Set(Some(user.image_url)),
        }
        .insert(self.conn())
        .await
        .map_err(db_error)?;

        tracing::debug!(user_id = model.id, "Inserted user");
        Ok(model.into())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let model = user::ActiveModel {
            id: Unchanged(user.id),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            image_url: Set(user.image_url),
        }
        .update(self.conn())
        .await
        .map_err(db_error)?;

        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let post_ids: Vec<i32> = PostEntity::find()
            .filter(post::Column::UserId.eq(id))
            .all(self.conn())
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|p| p.id)
            .collect();

        if !post_ids.is_empty() {
            PostTagEntity::delete_many()
                .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
                .exec(self.conn())
                .await
                .map_err(db_error)?;
            PostEntity::delete_many()
                .filter(post::Column::UserId.eq(id))
                .exec(self.conn())
                .await
                .map_err(db_error)?;
        }

        let result = UserEntity::delete_by_id(id)
            .exec(self.conn())
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(user_id = id, removed_posts = post_ids.len(), "Deleted user");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for SeaOrmPostRepository {
    async fn find_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::listing(PostEntity::find())
            .limit(limit)
            .all(self.conn())
            .await
            .map_err(db_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::listing(PostEntity::find())
            .filter(post::Column::UserId.eq(user_id))
            .all(self.conn())
            .await
            .map_err(db_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_tag_id(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::listing(PostEntity::find())
            .join(
                sea_orm::JoinType::InnerJoin,
                post::Relation::PostTag.def(),
            )
            .filter(post_tag::Column::TagId.eq(tag_id))
            .all(self.conn())
            .await
            .map_err(db_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            title: Set(post.title),
            content: Set(post.content),
            created_at: Set(post.created_at.into()),
            user_id: Set(post.user_id),
        }
        .insert(self.conn())
        .await
        .map_err(db_error)?;

        attach_tags(self.conn(), model.id, &post.tag_ids).await?;

        tracing::debug!(post_id = model.id, tags = post.tag_ids.len(), "Inserted post");
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut active = PostEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(db_error)?
            .ok_or(RepoError::NotFound)?
            .into_active_model();

        active.title = Set(changes.title);
        active.content = Set(changes.content);
        let model = active.update(self.conn()).await.map_err(db_error)?;

        detach_tags(self.conn(), id).await?;
        attach_tags(self.conn(), id, &changes.tag_ids).await?;

        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        detach_tags(self.conn(), id).await?;

        let result = PostEntity::delete_by_id(id)
            .exec(self.conn())
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = TagEntity::listing(TagEntity::find())
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .all(self.conn())
            .await
            .map_err(db_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::listing(TagEntity::find())
            .join(sea_orm::JoinType::InnerJoin, tag::Relation::PostTag.def())
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(self.conn())
            .await
            .map_err(db_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, tag: NewTag) -> Result<Tag, RepoError> {
        let model = tag::ActiveModel {
            id: NotSet,
            name: Set(tag.name),
        }
        .insert(self.conn())
        .await
        .map_err(db_error)?;

        Ok(model.into())
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        let model = tag::ActiveModel {
            id: Unchanged(tag.id),
            name: Set(tag.name),
        }
        .update(self.conn())
        .await
        .map_err(db_error)?;

        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let detached = PostTagEntity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(self.conn())
            .await
            .map_err(db_error)?;

        let result = TagEntity::delete_by_id(id)
            .exec(self.conn())
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(
            tag_id = id,
            detached_posts = detached.rows_affected,
            "Deleted tag"
        );
        Ok(())
    }
}

/// Write one association row per tag id.
async fn attach_tags<C>(conn: &C, post_id: i32, tag_ids: &BTreeSet<i32>) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows = tag_ids.iter().map(|&tag_id| post_tag::ActiveModel {
        post_id: Set(post_id),
        tag_id: Set(tag_id),
    });

    PostTagEntity::insert_many(rows)
        .exec_without_returning(conn)
        .await
        .map_err(db_error)?;

    Ok(())
}

/// Remove every association row of a post.
async fn detach_tags<C>(conn: &C, post_id: i32) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    PostTagEntity::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(conn)
        .await
        .map_err(db_error)?;

    Ok(())
}
