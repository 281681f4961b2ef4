//! User pages.

use actix_web::{HttpResponse, web};
use minijinja::context;

use blogly_core::domain::{DEFAULT_IMAGE_URL, NewUser};
use blogly_shared::{FormFields, UserForm};

use super::{load_user, redirect_with_flash, render};
use crate::middleware::error::AppResult;
use crate::middleware::flash::IncomingFlash;
use crate::state::AppState;

/// GET /users
pub async fn list(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let users = uow.users().find_all().await?;
    uow.commit().await?;

    render(&state, &flash, "users/list.html", context! { users => users })
}

/// GET /users/new
pub async fn new_form(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    render(&state, &flash, "users/new.html", context! {})
}

/// POST /users/new
pub async fn create(
    state: web::Data<AppState>,
    form: web::Form<FormFields>,
) -> AppResult<HttpResponse> {
    let input = UserForm::try_from(&form.into_inner())?;

    let uow = state.begin().await?;
    let user = uow
        .users()
        .create(NewUser::new(input.first_name, input.last_name, input.image_url))
        .await?;
    uow.commit().await?;

    tracing::info!(user_id = user.id, "User created");
    Ok(redirect_with_flash(
        "/users",
        &format!("Added user {}", user.full_name()),
    ))
}

/// GET /users/{user_id}
pub async fn detail(
    state: web::Data<AppState>,
    flash: IncomingFlash,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();

    let uow = state.begin().await?;
    let user = load_user(uow.as_ref(), user_id).await?;
    let posts = uow.posts().find_by_user_id(user_id).await?;
    uow.commit().await?;

    render(
        &state,
        &flash,
        "users/detail.html",
        context! { user => user, posts => posts, default_image_url => DEFAULT_IMAGE_URL },
    )
}

/// GET /users/{user_id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    flash: IncomingFlash,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let uow = state.begin().await?;
    let user = load_user(uow.as_ref(), path.into_inner()).await?;
    uow.commit().await?;

    render(&state, &flash, "users/edit.html", context! { user => user })
}

/// POST /users/{user_id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    form: web::Form<FormFields>,
) -> AppResult<HttpResponse> {
    let input = UserForm::try_from(&form.into_inner())?;

    let uow = state.begin().await?;
    let mut user = load_user(uow.as_ref(), path.into_inner()).await?;
    user.apply(input.first_name, input.last_name, input.image_url);
    let user = uow.users().update(user).await?;
    uow.commit().await?;

    tracing::info!(user_id = user.id, "User updated");
    Ok(redirect_with_flash(
        "/users",
        &format!("Updated user {}", user.full_name()),
    ))
}

/// POST /users/{user_id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();

    let uow = state.begin().await?;
    let name = load_user(uow.as_ref(), user_id).await?.full_name();
    uow.users().delete(user_id).await?;
    uow.commit().await?;

    tracing::info!(user_id, "User deleted");
    Ok(redirect_with_flash(
        "/users",
        &format!("Successfully deleted user {name}"),
    ))
}
