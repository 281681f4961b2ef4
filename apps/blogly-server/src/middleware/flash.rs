//! Single-use flash messages carried in a cookie.
//!
//! A mutation sets the cookie on its redirect; the next rendered page shows
//! the message and clears the cookie.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use std::future::{Ready, ready};

pub const FLASH_COOKIE: &str = "_flash";

/// The flash message left by the previous request, if any.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(Option<String>);

impl IncomingFlash {
    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequest for IncomingFlash {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let message = req
            .cookie(FLASH_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|m| !m.is_empty());

        ready(Ok(IncomingFlash(message)))
    }
}

/// Cookie carrying `message` to the next page.
///
/// The value is percent-encoded; actix decodes request cookies on the way in.
pub fn flash_cookie(message: &str) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, urlencoding::encode(message).into_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Cookie that expires a consumed flash message.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::ZERO)
        .finish()
}
