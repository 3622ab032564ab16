//! Request routing.
//!
//! | Path            | Methods   | Handler                              |
//! |-----------------|-----------|--------------------------------------|
//! | `/`             | GET, HEAD | `index.html`                         |
//! | `/posts`        | GET, HEAD | `posts.html` with all posts          |
//! | `/posts/:id`    | GET, HEAD | `post.html`, 404 if unknown          |
//! | `/bio`          | GET, HEAD | `bio.html`                           |
//! | `/feed`         | GET, HEAD | cached Atom feed, conditional GET    |
//! | `/robots.txt`   | GET       | static file                          |
//! | `/assets/*`     | GET       | static files below the assets dir    |
//!
//! Unknown paths are 404; known paths with another method are 405.

use std::borrow::Cow;
use std::fs;

use anyhow::anyhow;
use percent_encoding::percent_decode_str;
use tiny_http::Method;

use super::App;
use super::error::HttpError;
use super::pages::PageContext;
use super::path::resolve_asset;
use super::response::Reply;
use crate::feed::FeedArtifact;
use crate::log;
use crate::utils::{date, mime};

const PAGE_METHODS: &str = "GET, HEAD";
const GET_ONLY: &str = "GET";
const CACHE_CONTROL: &str = "max-age=3600";

/// The parts of a request routing looks at.
#[derive(Debug, Clone)]
pub struct RequestInfo<'a> {
    pub method: &'a Method,
    pub url: &'a str,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
}

impl<'a> RequestInfo<'a> {
    pub fn new(method: &'a Method, url: &'a str) -> Self {
        Self {
            method,
            url,
            if_none_match: None,
            if_modified_since: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Home,
    Posts,
    Post(&'a str),
    Bio,
    Feed,
    Robots,
    Asset(&'a str),
}

impl<'a> Route<'a> {
    /// Match a decoded path (no query string).
    fn parse(path: &'a str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Self::Home,
            "/posts" => Self::Posts,
            "/bio" => Self::Bio,
            "/feed" => Self::Feed,
            "/robots.txt" => Self::Robots,
            _ => {
                if let Some(id) = trimmed.strip_prefix("/posts/") {
                    if id.is_empty() || id.contains('/') {
                        return None;
                    }
                    Self::Post(id)
                } else if let Some(rest) = path.strip_prefix("/assets/") {
                    Self::Asset(rest)
                } else {
                    return None;
                }
            }
        };
        Some(route)
    }

    fn allowed(self) -> &'static str {
        match self {
            Self::Robots | Self::Asset(_) => GET_ONLY,
            _ => PAGE_METHODS,
        }
    }

    fn accepts(self, method: &Method) -> bool {
        match method {
            Method::Get => true,
            Method::Head => self.allowed() == PAGE_METHODS,
            _ => false,
        }
    }
}

/// Strip the query string and percent-decode the path.
fn decode_path(url: &str) -> Option<Cow<'_, str>> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    percent_decode_str(path).decode_utf8().ok()
}

/// Route a request and produce a reply. Errors become error pages.
pub fn dispatch(app: &App, req: &RequestInfo<'_>) -> Reply {
    match handle(app, req) {
        Ok(reply) => reply,
        Err(err) => {
            if err.status() >= 500 {
                log!("error"; "{} {}: {}", req.method, req.url, err.public_message(true));
            }
            app.pages.error_reply(&err)
        }
    }
}

fn handle(app: &App, req: &RequestInfo<'_>) -> Result<Reply, HttpError> {
    let path = decode_path(req.url).ok_or(HttpError::NotFound)?;
    let route = Route::parse(&path).ok_or(HttpError::NotFound)?;

    if !route.accepts(req.method) {
        return Err(HttpError::MethodNotAllowed {
            allow: route.allowed(),
        });
    }

    match route {
        Route::Home => home(app),
        Route::Posts => posts(app),
        Route::Post(id) => post(app, id),
        Route::Bio => bio(app),
        Route::Feed => feed(app, req),
        Route::Robots => robots(app),
        Route::Asset(rel) => asset(app, rel),
    }
}

fn home(app: &App) -> Result<Reply, HttpError> {
    let page = PageContext {
        canonical_path: String::new(),
        ..PageContext::default()
    };
    Ok(Reply::html(200, app.pages.render("index.html", &page)?))
}

fn posts(app: &App) -> Result<Reply, HttpError> {
    let index = app.site.index();
    let page = PageContext {
        page_title: "Posts".to_string(),
        canonical_path: "/posts".to_string(),
        is_posts: true,
        posts: Some(index.ordered().iter().map(|p| p.view()).collect()),
        ..PageContext::default()
    };
    Ok(Reply::html(200, app.pages.render("posts.html", &page)?))
}

fn post(app: &App, id: &str) -> Result<Reply, HttpError> {
    let post = app.site.post(id).ok_or(HttpError::NotFound)?;
    let page = PageContext {
        page_title: post.title.clone(),
        canonical_path: format!("/posts/{}", post.id),
        is_posts: true,
        post: Some(post.view()),
        ..PageContext::default()
    };
    Ok(Reply::html(200, app.pages.render("post.html", &page)?))
}

fn bio(app: &App) -> Result<Reply, HttpError> {
    let page = PageContext {
        page_title: "Bio".to_string(),
        canonical_path: "/bio".to_string(),
        is_bio: true,
        ..PageContext::default()
    };
    Ok(Reply::html(200, app.pages.render("bio.html", &page)?))
}

fn feed(app: &App, req: &RequestInfo<'_>) -> Result<Reply, HttpError> {
    let feed = app.site.feed();
    if feed.is_empty() {
        return Err(anyhow!("feed has not been generated").into());
    }

    let reply = if is_not_modified(&feed, req) {
        Reply::empty(304)
    } else {
        Reply::new(200, mime::types::ATOM, feed.bytes.clone())
    };
    Ok(reply
        .with_header("Cache-Control", CACHE_CONTROL)
        .with_header("ETag", feed.etag.clone())
        .with_header("Last-Modified", feed.last_modified.clone()))
}

/// `If-None-Match` wins over `If-Modified-Since` when both are present.
fn is_not_modified(feed: &FeedArtifact, req: &RequestInfo<'_>) -> bool {
    if let Some(tags) = req.if_none_match {
        return tags.split(',').map(str::trim).any(|tag| {
            tag == "*" || tag.strip_prefix("W/").unwrap_or(tag) == feed.etag
        });
    }

    match (
        req.if_modified_since.and_then(date::parse_http_date),
        date::parse_http_date(&feed.last_modified),
    ) {
        (Some(since), Some(modified)) => modified <= since,
        _ => false,
    }
}

fn robots(app: &App) -> Result<Reply, HttpError> {
    let body = fs::read(&app.robots_path).map_err(|_| HttpError::NotFound)?;
    Ok(Reply::new(200, mime::types::PLAIN, body))
}

fn asset(app: &App, rel: &str) -> Result<Reply, HttpError> {
    let path = resolve_asset(&app.assets_dir, rel).ok_or(HttpError::NotFound)?;
    let body = fs::read(&path)
        .map_err(|e| anyhow!(e).context(format!("failed to read {}", path.display())))?;
    Ok(Reply::new(200, mime::from_path(&path), body).with_header("Cache-Control", CACHE_CONTROL))
}
