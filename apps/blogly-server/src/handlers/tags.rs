//! Tag pages.

use actix_web::{HttpResponse, web};
use minijinja::context;

use blogly_core::domain::NewTag;
use blogly_shared::{FormFields, TagForm};

use super::{load_tag, redirect_with_flash, render};
use crate::middleware::error::AppResult;
use crate::middleware::flash::IncomingFlash;
use crate::state::AppState;

/// GET /tags
pub async fn list(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let tags = uow.tags().find_all().await?;
    uow.commit().await?;

    render(&state, &flash, "tags/list.html", context! { tags => tags })
}

/// GET /tags/new
pub async fn new_form(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    render(&state, &flash, "tags/new.html", context! {})
}

/// POST /tags/new
pub async fn create(
    state: web::Data<AppState>,
    form: web::Form<FormFields>,
) -> AppResult<HttpResponse> {
    let input = TagForm::try_from(&form.into_inner())?;

    let uow = state.begin().await?;
    let tag = uow.tags().create(NewTag::new(input.name)).await?;
    uow.commit().await?;

    tracing::info!(tag_id = tag.id, "Tag created");
    Ok(redirect_with_flash("/tags", &format!("Added tag {}", tag.name)))
}

/// GET /tags/{tag_id}
pub async fn detail(
    state: web::Data<AppState>,
    flash: IncomingFlash,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let tag_id = path.into_inner();

    let uow = state.begin().await?;
    let tag = load_tag(uow.as_ref(), tag_id).await?;
    let posts = uow.posts().find_by_tag_id(tag_id).await?;
    uow.commit().await?;

    render(
        &state,
        &flash,
        "tags/detail.html",
        context! { tag => tag, posts => posts },
    )
}

/// GET /tags/{tag_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    flash: IncomingFlash,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let tag = load_tag(uow.as_ref(), path.into_inner()).await?;
    uow.commit().await?;

    render(&state, &flash, "tags/edit.html", context! { tag => tag })
}

/// POST /tags/{tag_id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<FormFields>,
) -> AppResult<HttpResponse> {
    let input = TagForm::try_from(&form.into_inner())?;

    let uow = state.begin().await?;
    let mut tag = load_tag(uow.as_ref(), path.into_inner()).await?;
    tag.name = input.name;
    let tag = uow.tags().update(tag).await?;
    uow.commit().await?;

    tracing::info!(tag_id = tag.id, "Tag updated");
    Ok(redirect_with_flash("/tags", &format!("Updated tag {}", tag.name)))
}

/// POST /tags/{tag_id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let tag_id = path.into_inner();

    let uow = state.begin().await?;
    let tag = load_tag(uow.as_ref(), tag_id).await?;
    uow.tags().delete(tag_id).await?;
    uow.commit().await?;

    tracing::info!(tag_id, "Tag deleted");
    Ok(redirect_with_flash("/tags", &format!("Deleted tag {}", tag.name)))
}
