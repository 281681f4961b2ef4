use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use migration::{Migrator, MigratorTrait};

use blogly_infra::{DatabaseConfig, SeaOrmStore};

use super::configure_routes;
use crate::middleware::flash::FLASH_COOKIE;
use crate::observability::{REQUEST_ID_HEADER, RequestIdMiddleware};
use crate::state::AppState;

async fn state() -> AppState {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let conn = blogly_infra::connect(&config).await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    AppState::new(Arc::new(SeaOrmStore::new(conn)))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// A GET for the redirect target, carrying any flash cookie the response set.
fn follow<B>(res: &ServiceResponse<B>) -> TestRequest {
    let mut req = TestRequest::get().uri(&location(res));

    let pairs: Vec<String> = res
        .headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter(|pair| !pair.ends_with('='))
        .map(str::to_string)
        .collect();
    if !pairs.is_empty() {
        req = req.insert_header((header::COOKIE, pairs.join("; ")));
    }

    req
}

async fn body_text<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

macro_rules! post_form {
    ($app:expr, $uri:expr, $fields:expr) => {
        test::call_service(
            &$app,
            TestRequest::post().uri($uri).set_form($fields).to_request(),
        )
        .await
    };
}

macro_rules! get {
    ($app:expr, $uri:expr) => {
        test::call_service(&$app, TestRequest::get().uri($uri).to_request()).await
    };
}

/// Id at the end of a redirect such as `/users/3`.
fn trailing_id(location: &str) -> i32 {
    location.rsplit('/').next().unwrap().parse().unwrap()
}

#[actix_web::test]
async fn health_reports_ok() {
    let state = state().await;
    let app = app!(state);

    let res = get!(app, "/health");
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn responses_carry_request_id() {
    let state = state().await;
    let app = app!(state);

    let res = get!(app, "/users");
    assert!(res.headers().contains_key(REQUEST_ID_HEADER));
}

#[actix_web::test]
async fn create_user_then_show_on_detail_page() {
    let state = state().await;
    let app = app!(state);

    let res = post_form!(
        app,
        "/users/new",
        vec![
            ("firstname", "TestUser"),
            ("lastname", "Jones"),
            ("profilepicture", ""),
        ]
    );
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/users");

    let list = body_text(get!(app, "/users")).await;
    assert!(list.contains("TestUser Jones"));

    let uow = state.begin().await.unwrap();
    let user = uow.users().find_all().await.unwrap().remove(0);
    uow.commit().await.unwrap();

    let res = get!(app, &format!("/users/{}", user.id));
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains(r#"<div class="h1">TestUser Jones</div>"#));
}

#[actix_web::test]
async fn flash_is_shown_once_then_cleared() {
    let state = state().await;
    let app = app!(state);

    let res = post_form!(
        app,
        "/users/new",
        vec![
            ("firstname", "New"),
            ("lastname", "Challenger"),
            ("profilepicture", "www.google.com"),
        ]
    );
    assert_eq!(res.status(), StatusCode::FOUND);

    let shown = test::call_service(&app, follow(&res).to_request()).await;
    assert_eq!(shown.status(), StatusCode::OK);
    let cleared = shown
        .response()
        .cookies()
        .find(|c| c.name() == FLASH_COOKIE)
        .unwrap();
    assert_eq!(cleared.value(), "");

    let html = body_text(shown).await;
    assert!(html.contains("Added user New Challenger"));

    let again = body_text(get!(app, "/users")).await;
    assert!(again.contains("New Challenger"));
    assert!(!again.contains("Added user"));
}

#[actix_web::test]
async fn missing_user_fields_are_rejected() {
    let state = state().await;
    let app = app!(state);

    let res = post_form!(app, "/users/new", vec![("firstname", "Solo"), ("lastname", "  ")]);
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("Last name is required"));

    let list = body_text(get!(app, "/users")).await;
    assert!(!list.contains("Solo"));
}

#[actix_web::test]
async fn edit_user_replaces_names() {
    let state = state().await;
    let app = app!(state);

    post_form!(app, "/users/new", vec![("firstname", "Ada"), ("lastname", "Byron")]);
    let uow = state.begin().await.unwrap();
    let id = uow.users().find_all().await.unwrap()[0].id;
    uow.commit().await.unwrap();

    let res = post_form!(
        app,
        &format!("/users/{id}/edit"),
        vec![("firstname", "Ada"), ("lastname", "Lovelace")]
    );
    assert_eq!(res.status(), StatusCode::FOUND);

    let html = body_text(get!(app, &format!("/users/{id}"))).await;
    assert!(html.contains("Ada Lovelace"));
    assert!(!html.contains("Byron"));
}

#[actix_web::test]
async fn deleting_user_removes_them_and_their_posts() {
    let state = state().await;
    let app = app!(state);

    post_form!(app, "/users/new", vec![("firstname", "Gone"), ("lastname", "Soon")]);
    let uow = state.begin().await.unwrap();
    let id = uow.users().find_all().await.unwrap()[0].id;
    uow.commit().await.unwrap();

    let res = post_form!(
        app,
        &format!("/users/{id}/posts/new"),
        vec![("title", "Farewell"), ("content", "Last words")]
    );
    assert_eq!(res.status(), StatusCode::FOUND);
    let post_uri = {
        let uow = state.begin().await.unwrap();
        let posts = uow.posts().find_by_user_id(id).await.unwrap();
        uow.commit().await.unwrap();
        format!("/posts/{}", posts[0].id)
    };

    let res = post_form!(app, &format!("/users/{id}/delete"), Vec::<(&str, &str)>::new());
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/users");

    let list = body_text(get!(app, "/users")).await;
    assert!(!list.contains("Gone Soon"));
    assert_eq!(get!(app, &post_uri).status(), StatusCode::NOT_FOUND);
    assert_eq!(
        get!(app, &format!("/users/{id}")).status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn missing_rows_are_404() {
    let state = state().await;
    let app = app!(state);

    for uri in [
        "/users/99",
        "/users/99/edit",
        "/users/99/posts/new",
        "/posts/99",
        "/posts/99/edit",
        "/tags/99",
        "/tags/99/edit",
    ] {
        let res = get!(app, uri);
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let user = vec![("firstname", "Nobody"), ("lastname", "Here")];
    let post = vec![("title", "Nowhere"), ("content", "Nothing")];
    let tag = vec![("name", "ghost")];
    let none: Vec<(&str, &str)> = Vec::new();

    for (uri, fields) in [
        ("/users/99/edit", &user),
        ("/users/99/delete", &none),
        ("/users/99/posts/new", &post),
        ("/posts/99/edit", &post),
        ("/posts/99/delete", &none),
        ("/tags/99/edit", &tag),
        ("/tags/99/delete", &none),
    ] {
        let res = post_form!(app, uri, fields);
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "POST {uri}");
    }

    let uow = state.begin().await.unwrap();
    assert!(uow.users().find_all().await.unwrap().is_empty());
    assert!(uow.tags().find_all().await.unwrap().is_empty());
    uow.commit().await.unwrap();
}

#[actix_web::test]
async fn non_numeric_ids_are_404() {
    let state = state().await;
    let app = app!(state);

    assert_eq!(get!(app, "/users/abc").status(), StatusCode::NOT_FOUND);
    assert_eq!(get!(app, "/posts/1.5").status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn post_keeps_exact_tag_set_and_edit_removes_tag() {
    let state = state().await;
    let app = app!(state);

    post_form!(app, "/users/new", vec![("firstname", "Tag"), ("lastname", "Writer")]);
    post_form!(app, "/tags/new", vec![("name", "rust")]);
    post_form!(app, "/tags/new", vec![("name", "python")]);

    let uow = state.begin().await.unwrap();
    let user_id = uow.users().find_all().await.unwrap()[0].id;
    let tags = uow.tags().find_all().await.unwrap();
    uow.commit().await.unwrap();
    let python = tags.iter().find(|t| t.name == "python").unwrap().id.to_string();
    let rust = tags.iter().find(|t| t.name == "rust").unwrap().id.to_string();

    let res = post_form!(
        app,
        &format!("/users/{user_id}/posts/new"),
        vec![
            ("title", "Snakes and crabs"),
            ("content", "Both"),
            ("tags", python.as_str()),
            ("tags", rust.as_str()),
        ]
    );
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/users/{user_id}"));

    let uow = state.begin().await.unwrap();
    let post_id = uow.posts().find_by_user_id(user_id).await.unwrap()[0].id;
    uow.commit().await.unwrap();

    let html = body_text(get!(app, &format!("/posts/{post_id}"))).await;
    assert!(html.contains("python"));
    assert!(html.contains("rust"));

    let res = post_form!(
        app,
        &format!("/posts/{post_id}/edit"),
        vec![
            ("title", "Crabs only"),
            ("content", "Just one"),
            ("tags", rust.as_str()),
        ]
    );
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{post_id}"));

    let html = body_text(test::call_service(&app, follow(&res).to_request()).await).await;
    assert!(html.contains("Updated post Crabs only"));
    assert!(html.contains("Crabs only"));
    assert!(html.contains("rust"));
    assert!(!html.contains("python"));
}

#[actix_web::test]
async fn unknown_tag_ids_reject_the_post() {
    let state = state().await;
    let app = app!(state);

    post_form!(app, "/users/new", vec![("firstname", "Un"), ("lastname", "Known")]);
    let uow = state.begin().await.unwrap();
    let user_id = uow.users().find_all().await.unwrap()[0].id;
    uow.commit().await.unwrap();

    let res = post_form!(
        app,
        &format!("/users/{user_id}/posts/new"),
        vec![("title", "Ghost tags"), ("content", "Body"), ("tags", "42")]
    );
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(res).await.contains("Unknown tag ids: 42"));

    let uow = state.begin().await.unwrap();
    assert!(uow.posts().find_by_user_id(user_id).await.unwrap().is_empty());
    uow.commit().await.unwrap();
}

#[actix_web::test]
async fn missing_post_fields_are_rejected() {
    let state = state().await;
    let app = app!(state);

    post_form!(app, "/users/new", vec![("firstname", "No"), ("lastname", "Title")]);
    let uow = state.begin().await.unwrap();
    let user_id = uow.users().find_all().await.unwrap()[0].id;
    uow.commit().await.unwrap();

    let res = post_form!(
        app,
        &format!("/users/{user_id}/posts/new"),
        vec![("title", ""), ("content", "")]
    );
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn landing_page_lists_five_newest_posts() {
    let state = state().await;
    let app = app!(state);

    post_form!(app, "/users/new", vec![("firstname", "Busy"), ("lastname", "Writer")]);
    let uow = state.begin().await.unwrap();
    let user_id = uow.users().find_all().await.unwrap()[0].id;
    uow.commit().await.unwrap();

    for n in 1..=7 {
        let title = format!("Entry {n}");
        let res = post_form!(
            app,
            &format!("/users/{user_id}/posts/new"),
            vec![("title", title.as_str()), ("content", "text")]
        );
        assert_eq!(res.status(), StatusCode::FOUND);
    }

    let html = body_text(get!(app, "/")).await;
    for n in 3..=7 {
        assert!(html.contains(&format!("Entry {n}")), "Entry {n}");
    }
    assert!(!html.contains("Entry 1"));
    assert!(!html.contains("Entry 2"));
    assert!(html.contains("Busy Writer"));

    let newest = html.find("Entry 7").unwrap();
    let oldest = html.find("Entry 3").unwrap();
    assert!(newest < oldest);
}

#[actix_web::test]
async fn tag_lifecycle() {
    let state = state().await;
    let app = app!(state);

    let res = post_form!(app, "/tags/new", vec![("name", "python")]);
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/tags");

    let uow = state.begin().await.unwrap();
    let id = uow.tags().find_all().await.unwrap()[0].id;
    uow.commit().await.unwrap();

    let res = post_form!(app, &format!("/tags/{id}/edit"), vec![("name", "snakes")]);
    assert_eq!(res.status(), StatusCode::FOUND);
    let html = body_text(get!(app, &format!("/tags/{id}"))).await;
    assert!(html.contains("snakes"));

    let res = post_form!(app, "/tags/new", vec![("name", " ")]);
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = post_form!(app, &format!("/tags/{id}/delete"), Vec::<(&str, &str)>::new());
    assert_eq!(res.status(), StatusCode::FOUND);
    let html = body_text(test::call_service(&app, follow(&res).to_request()).await).await;
    assert!(html.contains("Deleted tag snakes"));
    assert!(html.contains("No tags yet."));
}

#[actix_web::test]
async fn deleting_post_returns_to_author() {
    let state = state().await;
    let app = app!(state);

    post_form!(app, "/users/new", vec![("firstname", "Post"), ("lastname", "Author")]);
    let uow = state.begin().await.unwrap();
    let user_id = uow.users().find_all().await.unwrap()[0].id;
    uow.commit().await.unwrap();

    post_form!(
        app,
        &format!("/users/{user_id}/posts/new"),
        vec![("title", "Short lived"), ("content", "Soon gone")]
    );
    let uow = state.begin().await.unwrap();
    let post_id = uow.posts().find_by_user_id(user_id).await.unwrap()[0].id;
    uow.commit().await.unwrap();

    let res = post_form!(app, &format!("/posts/{post_id}/delete"), Vec::<(&str, &str)>::new());
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(trailing_id(&location(&res)), user_id);

    let html = body_text(test::call_service(&app, follow(&res).to_request()).await).await;
    assert!(html.contains("Deleted post Short lived"));
    assert!(html.contains("No posts yet."));
}
