//! HTTP handlers and route configuration.

mod health;
mod home;
mod posts;
mod tags;
mod users;

use actix_web::{HttpResponse, http::header, web};
use minijinja::{Value, context};

use blogly_core::domain::{Post, Tag, User, missing_tag_ids};
use blogly_core::error::DomainError;
use blogly_core::ports::UnitOfWork;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::flash::{self, IncomingFlash};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home::index))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list))
                .route("/new", web::get().to(users::new_form))
                .route("/new", web::post().to(users::create))
                .route("/{user_id}", web::get().to(users::detail))
                .route("/{user_id}/edit", web::get().to(users::edit_form))
                .route("/{user_id}/edit", web::post().to(users::update))
                .route("/{user_id}/delete", web::post().to(users::delete))
                .route("/{user_id}/posts/new", web::get().to(posts::new_form))
                .route("/{user_id}/posts/new", web::post().to(posts::create)),
        )
        .service(
            web::scope("/posts")
                .route("/{post_id}", web::get().to(posts::detail))
                .route("/{post_id}/edit", web::get().to(posts::edit_form))
                .route("/{post_id}/edit", web::post().to(posts::update))
                .route("/{post_id}/delete", web::post().to(posts::delete)),
        )
        .service(
            web::scope("/tags")
                .route("", web::get().to(tags::list))
                .route("/new", web::get().to(tags::new_form))
                .route("/new", web::post().to(tags::create))
                .route("/{tag_id}", web::get().to(tags::detail))
                .route("/{tag_id}/edit", web::get().to(tags::edit_form))
                .route("/{tag_id}/edit", web::post().to(tags::update))
                .route("/{tag_id}/delete", web::post().to(tags::delete)),
        );
}

/// Render a page, showing and clearing any pending flash message.
fn render(
    state: &AppState,
    flash: &IncomingFlash,
    template: &str,
    ctx: Value,
) -> AppResult<HttpResponse> {
    let html = state
        .templates
        .render(template, context! { flash => flash.message(), ..ctx })?;

    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");
    if flash.is_present() {
        response.cookie(flash::removal_cookie());
    }

    Ok(response.body(html))
}

fn redirect_with_flash(location: &str, message: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(flash::flash_cookie(message))
        .finish()
}

async fn load_user(uow: &dyn UnitOfWork, id: i32) -> AppResult<User> {
    uow.users()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::from(DomainError::not_found("User", id)))
}

async fn load_post(uow: &dyn UnitOfWork, id: i32) -> AppResult<Post> {
    uow.posts()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::from(DomainError::not_found("Post", id)))
}

async fn load_tag(uow: &dyn UnitOfWork, id: i32) -> AppResult<Tag> {
    uow.tags()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::from(DomainError::not_found("Tag", id)))
}

/// Resolve submitted tag ids, rejecting any that do not exist.
async fn resolve_tags(uow: &dyn UnitOfWork, ids: &[i32]) -> AppResult<Vec<Tag>> {
    let found = uow.tags().find_by_ids(ids).await?;
    let requested = ids.iter().copied().collect();

    let missing = missing_tag_ids(&requested, &found);
    if !missing.is_empty() {
        let listed: Vec<String> = missing.iter().map(i32::to_string).collect();
        return Err(DomainError::Validation(format!("Unknown tag ids: {}", listed.join(", "))).into());
    }

    Ok(found)
}

#[cfg(test)]
mod tests;
