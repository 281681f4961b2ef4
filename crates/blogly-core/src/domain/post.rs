use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of posts shown on the landing page.
pub const RECENT_POSTS_LIMIT: u64 = 5;

/// Post entity - a blog post written by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post that has not been persisted yet, together with its tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub tag_ids: BTreeSet<i32>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(
        user_id: i32,
        title: String,
        content: String,
        tag_ids: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self {
            user_id,
            title,
            content,
            created_at: Utc::now(),
            tag_ids: tag_ids.into_iter().collect(),
        }
    }
}

/// Edited fields of an existing post. The tag set replaces the current one entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub tag_ids: BTreeSet<i32>,
}

impl PostChanges {
    pub fn new(title: String, content: String, tag_ids: impl IntoIterator<Item = i32>) -> Self {
        Self {
            title,
            content,
            tag_ids: tag_ids.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_collapses_duplicate_tags() {
        let post = NewPost::new(1, "Title".into(), "Body".into(), [3, 1, 3, 2]);
        assert_eq!(post.tag_ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn new_post_is_stamped_now() {
        let before = Utc::now();
        let post = NewPost::new(1, "Title".into(), "Body".into(), []);
        assert!(post.created_at >= before);
        assert!(post.created_at <= Utc::now());
    }
}
