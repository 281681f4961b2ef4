//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{NewPost, Post, PostChanges, RECENT_POSTS_LIMIT};
pub use tag::{NewTag, Tag, missing_tag_ids};
pub use user::{DEFAULT_IMAGE_URL, NewUser, User};
