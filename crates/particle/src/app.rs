// File: src/app.rs
// Purpose: Application registry and the synchronous request dispatch pipeline

use axum::http::{Method, StatusCode};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info};

use crate::component::{Component, SharedComponent};
use crate::config::Config;
use crate::document::{minify_html, render_document};
use crate::envelope::{error_response, JsonEnvelope};
use crate::middleware::{AuthMiddleware, CorsMiddleware, LoggingMiddleware, Middleware, MiddlewareChain};
use crate::request::{RawRequest, Request};
use crate::response::Response;
use crate::routing::{ApiRoutes, ClientRouter, Reply, ResolvedRoute};
use crate::session::SessionStore;
use crate::static_files::StaticFiles;

/// Methods the pipeline dispatches; anything else is answered with `405`
pub const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Installed page router and its pre-rendered client script
struct InstalledRouter {
    router: ClientRouter,
    script: String,
}

/// A Particle application.
///
/// Registration methods take `&self` so routes and middleware can be added
/// while the app is shared with a running server.
///
/// ```
/// use particle::prelude::*;
/// use serde_json::json;
///
/// let app = App::new(|| h1().text("Hello"));
/// app.add_api_route("/api/ping", Method::GET, |_req| Ok(json!({"pong": true}).into()));
///
/// let res = app.handle(RawRequest::get("/api/ping"));
/// assert_eq!(res.status(), StatusCode::OK);
/// assert_eq!(res.render_body(), br#"{"pong":true}"#.to_vec());
/// ```
pub struct App {
    config: Config,
    root: SharedComponent,
    sessions: SessionStore,
    api_routes: RwLock<ApiRoutes>,
    middlewares: RwLock<MiddlewareChain>,
    router: RwLock<Option<InstalledRouter>>,
    static_files: RwLock<StaticFiles>,
    minify: AtomicBool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("api_routes", &self.read(&self.api_routes).len())
            .field("middlewares", &self.read(&self.middlewares).names())
            .finish()
    }
}

impl App {
    pub fn new(root: impl Component + 'static) -> Self {
        Self::with_config(root, Config::default())
    }

    /// Build an app from config; `[cors]` and `[logging]` install their
    /// middleware when enabled
    pub fn with_config(root: impl Component + 'static, config: Config) -> Self {
        let static_files = StaticFiles::new(&config.static_files.dir, config.static_files.prefix.clone());
        let app = Self {
            minify: AtomicBool::new(config.app.minify_html),
            root: Arc::new(root),
            sessions: SessionStore::new(),
            api_routes: RwLock::new(ApiRoutes::new()),
            middlewares: RwLock::new(MiddlewareChain::new()),
            router: RwLock::new(None),
            static_files: RwLock::new(static_files),
            config,
        };
        if app.config.logging.enabled {
            app.use_logging();
        }
        if app.config.cors.enabled {
            app.use_cors();
        }
        app
    }

    /// Use an existing session store instead of a fresh one
    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn read<'a, T>(&self, lock: &'a RwLock<T>) -> RwLockReadGuard<'a, T> {
        lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write<'a, T>(&self, lock: &'a RwLock<T>) -> RwLockWriteGuard<'a, T> {
        lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ===== Registration =====

    /// Register an API handler for `(path, method)`. `path` may contain
    /// `:param` segments.
    pub fn add_api_route<F>(&self, path: &str, method: Method, handler: F)
    where
        F: Fn(&Request) -> anyhow::Result<Reply> + Send + Sync + 'static,
    {
        if self.write(&self.api_routes).add(path, method.clone(), handler) {
            debug!(%method, path, "API route replaced");
        }
    }

    pub fn add_middleware(&self, middleware: impl Middleware + 'static) {
        self.write(&self.middlewares).push(Arc::new(middleware));
    }

    /// CORS with the `[cors]` settings from config
    pub fn use_cors(&self) {
        self.add_middleware(CorsMiddleware::from_config(&self.config.cors));
    }

    pub fn use_logging(&self) {
        self.add_middleware(LoggingMiddleware::new());
    }

    /// Require a session for every path under one of `protected_prefixes`.
    /// Use [`App::add_middleware`] with [`AuthMiddleware::with_check`] for a
    /// custom check.
    pub fn use_auth<I, S>(&self, protected_prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_middleware(AuthMiddleware::new(protected_prefixes));
    }

    /// Install the page router. Every page is rendered now, once.
    pub fn use_router(&self, router: ClientRouter) {
        let script = router.render_script();
        *self.write(&self.router) = Some(InstalledRouter { router, script });
    }

    pub fn set_static_dir(&self, dir: impl Into<PathBuf>) {
        self.write(&self.static_files).set_dir(dir);
    }

    pub fn enable_minification(&self) {
        self.minify.store(true, Ordering::Relaxed);
    }

    /// Server-side match against the installed page router
    pub fn resolve_page(&self, path: &str) -> Option<String> {
        let router = self.read(&self.router);
        router
            .as_ref()
            .and_then(|installed| installed.router.resolve(path))
            .map(|(pattern, _)| pattern)
    }

    // ===== Rendering =====

    /// Full HTML document for the root component, with the client router
    /// script when a router is installed
    pub fn render_to_html(&self) -> String {
        let body = self.root.render_html();
        let scripts: Vec<String> = self
            .read(&self.router)
            .as_ref()
            .map(|installed| vec![installed.script.clone()])
            .unwrap_or_default();
        let prefix = self.read(&self.static_files).prefix().to_string();

        let html = render_document(&self.config.app.title, &prefix, &body, &scripts);
        if self.minify.load(Ordering::Relaxed) {
            minify_html(&html)
        } else {
            html
        }
    }

    // ===== Dispatch =====

    /// Run one request through the pipeline and return the response to flush.
    ///
    /// Order: method check, request parse, middleware request phase (a
    /// `Break` flushes immediately), OPTIONS, static files, API handler, page
    /// render for GET, 404. Every middleware's response phase then runs.
    pub fn handle(&self, raw: RawRequest) -> Response {
        if !SUPPORTED_METHODS.contains(&raw.method) {
            debug!(method = %raw.method, "unsupported method");
            return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }

        let mut req = Request::with_session_cookie(raw, &self.sessions, &self.config.session.cookie_name);
        let mut res = Response::new();

        // Snapshot so handlers may register middleware without deadlocking
        let chain = self.read(&self.middlewares).clone();
        if chain.run_request(&mut req, &mut res).is_break() {
            return res;
        }

        let mut res = self.dispatch(&mut req, res);
        chain.run_response(&req, &mut res);
        res
    }

    fn dispatch(&self, req: &mut Request, mut res: Response) -> Response {
        if req.method == Method::OPTIONS {
            res.set_status(StatusCode::NO_CONTENT);
            return res;
        }

        if req.method == Method::GET {
            let static_files = self.read(&self.static_files).clone();
            if static_files.matches(&req.url_path) {
                let mut served = static_files.serve(&req.url_path);
                served.absorb(res);
                return served;
            }
        }

        let resolved = self.read(&self.api_routes).resolve(&req.method, &req.url_path);
        if let Some(route) = resolved {
            return self.call_handler(route, req, res);
        }

        if req.method == Method::GET {
            return match guarded(|| self.render_to_html()) {
                Ok(html) => {
                    res.html(html);
                    res
                }
                Err(message) => {
                    error!(path = %req.url_path, error = %message, "page render failed");
                    internal_error(res, &message)
                }
            };
        }

        debug!(method = %req.method, path = %req.url_path, "no route");
        res.set_status(StatusCode::NOT_FOUND)
            .json(JsonEnvelope::error("Not found", 404, None));
        res
    }

    fn call_handler(&self, route: ResolvedRoute, req: &mut Request, mut res: Response) -> Response {
        req.path_params = route.params;
        let handler = route.handler;
        let request: &Request = req;

        let outcome = guarded(|| handler(request)).and_then(|result| result.map_err(|err| format!("{:#}", err)));
        match outcome {
            Ok(Reply::Json(value)) => {
                res.json(value);
                res
            }
            Ok(Reply::Response(mut own)) => {
                own.absorb(res);
                own
            }
            Err(message) => {
                error!(
                    method = %request.method,
                    route = %route.pattern,
                    error = %message,
                    "API handler failed"
                );
                internal_error(res, &message)
            }
        }
    }

    /// Startup summary at `info`
    pub fn log_summary(&self) {
        let chain = self.read(&self.middlewares);
        let names = chain.names();
        info!("Particle app running at http://{}", self.config.bind_addr());
        info!("Static files: {}", self.read(&self.static_files).dir().display());
        info!("API routes: {}", self.read(&self.api_routes).len());
        info!("Middlewares: {}", chain.len());
        info!("CORS: {}", if names.contains(&"cors") { "enabled" } else { "disabled" });
        info!("Logging: {}", if names.contains(&"logging") { "enabled" } else { "disabled" });
    }
}

/// Run `f`, turning a panic into its message
fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_string())
    })
}

fn internal_error(mut res: Response, message: &str) -> Response {
    res.set_status(StatusCode::INTERNAL_SERVER_ERROR)
        .set_header("Content-Type", "application/json")
        .json(JsonEnvelope::error(
            format!("Internal server error: {}", message),
            500,
            None,
        ));
    res
}
