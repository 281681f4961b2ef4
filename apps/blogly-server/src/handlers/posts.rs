//! Post pages. New posts hang off their author: /users/{user_id}/posts/new.

use actix_web::{HttpResponse, web};
use minijinja::context;

use blogly_core::domain::{NewPost, PostChanges};
use blogly_shared::{FormFields, PostForm};

use super::{load_post, load_user, redirect_with_flash, render, resolve_tags};
use crate::middleware::error::AppResult;
use crate::middleware::flash::IncomingFlash;
use crate::state::AppState;

/// GET /users/{user_id}/posts/new
pub async fn new_form(
    state: web::Data<AppState>,
    flash: IncomingFlash,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let user = load_user(uow.as_ref(), path.into_inner()).await?;
    let tags = uow.tags().find_all().await?;
    uow.commit().await?;

    render(
        &state,
        &flash,
        "posts/new.html",
        context! { user => user, tags => tags },
    )
}

/// POST /users/{user_id}/posts/new
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<FormFields>,
) -> AppResult<HttpResponse> {
    let input = PostForm::try_from(&form.into_inner())?;

    let uow = state.begin().await?;
    let user = load_user(uow.as_ref(), path.into_inner()).await?;
    let tags = resolve_tags(uow.as_ref(), &input.tag_ids).await?;
    let post = uow
        .posts()
        .create(NewPost::new(
            user.id,
            input.title,
            input.content,
            tags.iter().map(|t| t.id),
        ))
        .await?;
    uow.commit().await?;

    tracing::info!(post_id = post.id, user_id = user.id, tags = tags.len(), "Post created");
    Ok(redirect_with_flash(
        &format!("/users/{}", user.id),
        &format!("Added post {}", post.title),
    ))
}

/// GET /posts/{post_id}
pub async fn detail(
    state: web::Data<AppState>,
    flash: IncomingFlash,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let uow = state.begin().await?;
    let post = load_post(uow.as_ref(), post_id).await?;
    let author = load_user(uow.as_ref(), post.user_id).await?;
    let tags = uow.tags().find_by_post_id(post_id).await?;
    uow.commit().await?;

    render(
        &state,
        &flash,
        "posts/detail.html",
        context! { post => post, author => author, tags => tags },
    )
}

/// GET /posts/{post_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    flash: IncomingFlash,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let uow = state.begin().await?;
    let post = load_post(uow.as_ref(), post_id).await?;
    let tags = uow.tags().find_all().await?;
    let current_tag_ids: Vec<i32> = uow
        .tags()
        .find_by_post_id(post_id)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    uow.commit().await?;

    render(
        &state,
        &flash,
        "posts/edit.html",
        context! { post => post, tags => tags, current_tag_ids => current_tag_ids },
    )
}

/// POST /posts/{post_id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<FormFields>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let input = PostForm::try_from(&form.into_inner())?;

    let uow = state.begin().await?;
    load_post(uow.as_ref(), post_id).await?;
    let tags = resolve_tags(uow.as_ref(), &input.tag_ids).await?;
    let post = uow
        .posts()
        .update(
            post_id,
            PostChanges::new(input.title, input.content, tags.iter().map(|t| t.id)),
        )
        .await?;
    uow.commit().await?;

    tracing::info!(post_id, tags = tags.len(), "Post updated");
    Ok(redirect_with_flash(
        &format!("/posts/{}", post.id),
        &format!("Updated post {}", post.title),
    ))
}

/// POST /posts/{post_id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let uow = state.begin().await?;
    let post = load_post(uow.as_ref(), post_id).await?;
    let user_id = post.user_id;
    uow.posts().delete(post_id).await?;
    uow.commit().await?;

    tracing::info!(post_id, user_id, "Post deleted");
    Ok(redirect_with_flash(
        &format!("/users/{user_id}"),
        &format!("Deleted post {}", post.title),
    ))
}
