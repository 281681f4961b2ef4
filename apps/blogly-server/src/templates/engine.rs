use minijinja::{Environment, Value, default_auto_escape_callback};

/// Renders a named page with a context.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error>;
}

/// Page templates compiled into the binary, HTML auto-escaped.
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        env.set_loader(embedded_template);
        env.add_filter("datetime", format_datetime);
        Self { env }
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template_name: &str, context: Value) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template_name)?;
        tmpl.render(context)
    }
}

/// Render an RFC 3339 timestamp as e.g. "Jan 5, 2025, 3:04 PM".
fn format_datetime(value: String) -> String {
    chrono::DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.format("%b %-d, %Y, %-I:%M %p").to_string())
        .unwrap_or(value)
}

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("base.html")),
    ("home.html", include_str!("home.html")),
    ("error.html", include_str!("error.html")),
    ("users/list.html", include_str!("users/list.html")),
    ("users/new.html", include_str!("users/new.html")),
    ("users/detail.html", include_str!("users/detail.html")),
    ("users/edit.html", include_str!("users/edit.html")),
    ("posts/new.html", include_str!("posts/new.html")),
    ("posts/detail.html", include_str!("posts/detail.html")),
    ("posts/edit.html", include_str!("posts/edit.html")),
    ("tags/list.html", include_str!("tags/list.html")),
    ("tags/new.html", include_str!("tags/new.html")),
    ("tags/detail.html", include_str!("tags/detail.html")),
    ("tags/edit.html", include_str!("tags/edit.html")),
];

fn embedded_template(name: &str) -> Result<Option<String>, minijinja::Error> {
    Ok(TEMPLATES
        .iter()
        .find(|(path, _)| *path == name)
        .map(|(_, source)| source.to_string()))
}
