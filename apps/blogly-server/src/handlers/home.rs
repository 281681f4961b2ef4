//! Landing page.

use actix_web::{HttpResponse, web};
use minijinja::context;
use serde::Serialize;

use blogly_core::domain::{Post, RECENT_POSTS_LIMIT, User};

use super::render;
use crate::middleware::error::AppResult;
use crate::middleware::flash::IncomingFlash;
use crate::state::AppState;

#[derive(Serialize)]
struct RecentPost {
    post: Post,
    author: User,
}

/// GET /
///
/// The most recent posts, newest first, each with its author.
pub async fn index(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let recent = uow.posts().find_recent(RECENT_POSTS_LIMIT).await?;

    let mut posts = Vec::with_capacity(recent.len());
    for post in recent {
        match uow.users().find_by_id(post.user_id).await? {
            Some(author) => posts.push(RecentPost { post, author }),
            None => tracing::warn!(post_id = post.id, "Post has no author"),
        }
    }
    uow.commit().await?;

    render(&state, &flash, "home.html", context! { posts => posts })
}
