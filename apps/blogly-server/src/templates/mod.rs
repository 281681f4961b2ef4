//! HTML templates, embedded into the binary.

use std::sync::LazyLock;

use minijinja::context;

mod engine;

pub use engine::{MiniJinjaEngine, TemplateEngine};

static ERROR_PAGES: LazyLock<MiniJinjaEngine> = LazyLock::new(MiniJinjaEngine::new);

/// Render the error page, falling back to plain markup if the template fails.
pub fn render_error_page(status: u16, title: &str, details: &[String]) -> String {
    let ctx = context! { status => status, title => title, details => details };

    match ERROR_PAGES.render("error.html", ctx) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!("Failed to render error template: {}", e);
            format!("<!DOCTYPE html><html><body><h1>{status} {title}</h1></body></html>")
        }
    }
}
