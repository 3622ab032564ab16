//! HTML page rendering.
//!
//! Every page gets `site`, `page_title`, `canonical_path`, `is_posts` and
//! `is_bio`; `posts`, `post` and `error` are set by the pages that use them.

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use serde::Serialize;
use tera::{Context, Tera};

use super::error::HttpError;
use super::response::Reply;
use crate::config::SiteInfo;
use crate::log;
use crate::post::PostView;
use crate::template;

/// Templates the server cannot start without.
pub const REQUIRED_TEMPLATES: &[&str] = &[
    "index.html",
    "posts.html",
    "post.html",
    "bio.html",
    "error.html",
    "layouts/default.html",
];

#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub code: u16,
    pub message: String,
}

/// Per-page template variables.
#[derive(Debug, Default, Serialize)]
pub struct PageContext<'a> {
    pub page_title: String,
    pub canonical_path: String,
    pub is_posts: bool,
    pub is_bio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostView<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorView>,
}

/// Compiled HTML templates.
pub struct Pages {
    tera: Tera,
    site: SiteInfo,
    debug: bool,
}

impl Pages {
    /// Load every `*.html` template under `dir`.
    pub fn load(dir: &Path, site: SiteInfo, debug: bool) -> Result<Self> {
        let glob = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&glob)
            .with_context(|| format!("failed to parse templates in {}", dir.display()))?;
        Self::with_tera(tera, site, debug)
    }

    /// Build from in-memory `(name, source)` pairs.
    pub fn from_raw(templates: &[(&str, &str)], site: SiteInfo, debug: bool) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())
            .context("failed to parse templates")?;
        Self::with_tera(tera, site, debug)
    }

    fn with_tera(mut tera: Tera, site: SiteInfo, debug: bool) -> Result<Self> {
        let missing: Vec<_> = REQUIRED_TEMPLATES
            .iter()
            .filter(|name| !tera.get_template_names().any(|t| t == **name))
            .collect();
        if !missing.is_empty() {
            bail!("missing templates: {:?}", missing);
        }

        template::register_helpers(&mut tera, template::system_clock);
        Ok(Self { tera, site, debug })
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Render `name` with the shared variables plus `page`.
    pub fn render(&self, name: &'static str, page: &PageContext<'_>) -> Result<String, HttpError> {
        let render = || -> tera::Result<String> {
            let mut ctx = Context::from_serialize(page)?;
            ctx.insert("site", &self.site);
            self.tera.render(name, &ctx)
        };
        render().map_err(|source| HttpError::Render { name, source })
    }

    /// Render an error page. Falls back to plain text if `error.html`
    /// itself fails.
    pub fn error_reply(&self, err: &HttpError) -> Reply {
        let status = err.status();
        let message = err.public_message(self.debug);

        let page = PageContext {
            page_title: status.to_string(),
            error: Some(ErrorView {
                code: status,
                message: message.clone(),
            }),
            ..PageContext::default()
        };

        let reply = match self.render("error.html", &page) {
            Ok(html) => Reply::html(status, html),
            Err(e) => {
                log!("error"; "{}", e.public_message(true));
                Reply::plain(status, format!("{status} {message}"))
            }
        };

        match err {
            HttpError::MethodNotAllowed { allow } => reply.with_header("Allow", *allow),
            _ => reply,
        }
    }
}
