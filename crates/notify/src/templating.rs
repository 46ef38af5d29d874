//! Minijinja template rendering for status emails.
//!
//! The three reports share `layout.html` (styles, container, footer) and
//! differ only in their themed content block. Templates are compiled into
//! the binary and registered once; names ending in `.html` get HTML
//! auto-escaping, so error messages cannot inject markup.

use serde::Serialize;

use crate::traits::NotifyError;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("started.html", include_str!("../templates/started.html")),
    ("succeeded.html", include_str!("../templates/succeeded.html")),
    ("failed.html", include_str!("../templates/failed.html")),
];

/// Values shown in the job-started email.
#[derive(Debug, Clone, Serialize)]
pub struct StartedContext {
    pub date: String,
    /// `HH:MM:SS`
    pub start_time: String,
    pub category_count: usize,
}

/// Values shown in the job-succeeded email.
#[derive(Debug, Clone, Serialize)]
pub struct SucceededContext {
    pub date: String,
    /// `H:MM:SS`
    pub duration: String,
    pub uploaded: usize,
    pub storage_label: String,
    /// Per-category errors, rendered as a warnings block when non-empty.
    pub errors: Vec<String>,
    pub folder_url: Option<String>,
}

/// Values shown in the job-failed email.
#[derive(Debug, Clone, Serialize)]
pub struct FailedContext {
    pub date: String,
    pub error: String,
}

/// Renders the status report templates.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: minijinja::Environment<'static>,
}

impl TemplateRenderer {
    /// Register all report templates.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if a bundled template has a syntax error.
    pub fn new() -> Result<Self, NotifyError> {
        let mut env = minijinja::Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| NotifyError::Template(e.to_string()))?;
        }
        Ok(Self { env })
    }

    pub fn render_started(&self, ctx: &StartedContext) -> Result<String, NotifyError> {
        self.render("started.html", ctx)
    }

    pub fn render_succeeded(&self, ctx: &SucceededContext) -> Result<String, NotifyError> {
        self.render("succeeded.html", ctx)
    }

    pub fn render_failed(&self, ctx: &FailedContext) -> Result<String, NotifyError> {
        self.render("failed.html", ctx)
    }

    fn render(&self, name: &str, ctx: &impl Serialize) -> Result<String, NotifyError> {
        self.env
            .get_template(name)
            .and_then(|tpl| tpl.render(ctx))
            .map_err(|e| NotifyError::Template(e.to_string()))
    }
}

/// Escape text for an HTML body built outside the templates, with the same
/// rules the templates' auto-escaping applies.
pub fn escape_html(text: &str) -> String {
    minijinja::HtmlEscape(text).to_string()
}
