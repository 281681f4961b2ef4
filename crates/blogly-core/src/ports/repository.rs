use async_trait::async_trait;

use crate::domain::{NewPost, NewTag, NewUser, Post, PostChanges, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining the lookups every table supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// List every entity in the table's natural listing order.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;
}

/// User repository.
///
/// Deleting a user cascades to the user's posts and their tag associations.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Overwrite every editable column of an existing user.
    async fn update(&self, user: User) -> Result<User, RepoError>;

    /// Returns [`RepoError::NotFound`] when no row matched.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// The newest `limit` posts, newest first.
    async fn find_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError>;

    async fn find_by_tag_id(&self, tag_id: i32) -> Result<Vec<Post>, RepoError>;

    /// Insert the post and its tag associations.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Overwrite title and content, and replace the whole tag set.
    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError>;

    /// Returns [`RepoError::NotFound`] when no row matched.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    /// Tags whose id is in `ids`; unknown ids are simply absent from the result.
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, RepoError>;

    async fn find_by_post_id(&self, post_id: i32) -> Result<Vec<Tag>, RepoError>;

    async fn create(&self, tag: NewTag) -> Result<Tag, RepoError>;

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError>;

    /// Removes the tag from every post before deleting it.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}
