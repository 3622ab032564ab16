//! HTTP server.
//!
//! Binds a `tiny_http` server and hands each request to a small thread
//! pool. Every handler reads the shared [`Site`], which rebuilds itself
//! lazily after the watcher signals a change.

mod error;
mod pages;
mod path;
mod response;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Request, Server};

use crate::config::SiteConfig;
use crate::site::Site;
use crate::watch::{Invalidate, PostWatcher};
use crate::{debug, log};
use pages::Pages;
use routes::RequestInfo;

/// Worker threads serving requests.
const WORKERS: usize = 4;

/// Everything a request handler needs.
pub struct App {
    site: Arc<Site>,
    pages: Pages,
    assets_dir: PathBuf,
    robots_path: PathBuf,
}

impl App {
    pub fn from_config(config: &SiteConfig, site: Arc<Site>) -> Result<Self> {
        let pages = Pages::load(&config.templates_dir(), config.site.clone(), config.serve.debug)?;
        Ok(Self {
            site,
            pages,
            assets_dir: config.assets_dir(),
            robots_path: config.robots_path(),
        })
    }
}

/// Run the server until Ctrl+C.
pub fn serve(config: &SiteConfig) -> Result<()> {
    let site = Arc::new(Site::from_config(config)?);
    // The watcher lives as long as this function.
    let _watcher = start_site(&site, config.serve.watch)?;

    let app = Arc::new(App::from_config(config, Arc::clone(&site))?);
    if app.pages.debug() {
        log!("serve"; "debug mode: error pages include internal details");
    }

    let addr = SocketAddr::new(config.serve.interface, config.serve.port);
    let server = Server::http(addr)
        .map_err(|e| anyhow!("failed to bind {addr}: {e}"))?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    run_request_loop(&server, app)
}

/// Start the watcher (if enabled), then load posts.
///
/// Watching first means an edit made during the initial scan still
/// leaves the site dirty.
fn start_site(site: &Arc<Site>, watch: bool) -> Result<Option<PostWatcher>> {
    let watcher = if watch {
        let target: Arc<dyn Invalidate> = site.clone();
        let watcher = PostWatcher::spawn(site.layout().dir.as_path(), target)?;
        debug!("watch"; "watching {}", watcher.dir().display());
        Some(watcher)
    } else {
        None
    };

    let report = site.refresh();
    log!("posts"; "{} posts loaded, {} skipped", report.posts, report.skipped.len());
    Ok(watcher)
}

fn run_request_loop(server: &Server, app: Arc<App>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .thread_name(|i| format!("quire-http-{i}"))
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let app = Arc::clone(&app);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, app: &App) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::send(request, response::unavailable());
    }

    let reply = {
        let header = |name: &'static str| {
            request
                .headers()
                .iter()
                .find(|h| h.field.equiv(name))
                .map(|h| h.value.as_str())
        };
        let info = RequestInfo {
            method: request.method(),
            url: request.url(),
            if_none_match: header("If-None-Match"),
            if_modified_since: header("If-Modified-Since"),
        };
        debug!("serve"; "{} {}", info.method, info.url);
        routes::dispatch(app, &info)
    };

    response::send(request, reply)
}
