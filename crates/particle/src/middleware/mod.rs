//! Request/response interceptors.
//!
//! Every middleware gets a request phase, run in registration order before
//! the handler, and a response phase, run in registration order after it.
//! Returning [`ControlFlow::Break`] from the request phase stops the chain and
//! the response is flushed as it stands; no response phase runs in that case.

pub mod auth;
pub mod cors;
pub mod logging;

pub use auth::{AuthCheck, AuthMiddleware};
pub use cors::CorsMiddleware;
pub use logging::{LoggingMiddleware, RequestStart};

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::request::Request;
use crate::response::Response;

pub trait Middleware: Send + Sync {
    fn name(&self) -> &str;

    /// Runs before the handler. `Break` short-circuits the request.
    fn process_request(&self, _req: &mut Request, _res: &mut Response) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Runs after the handler or page render
    fn process_response(&self, _req: &Request, _res: &mut Response) {}
}

/// Ordered middleware list
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }

    /// Request phase. Stops at the first middleware that breaks.
    pub fn run_request(&self, req: &mut Request, res: &mut Response) -> ControlFlow<()> {
        for middleware in &self.middlewares {
            if middleware.process_request(req, res).is_break() {
                tracing::debug!(middleware = middleware.name(), path = %req.url_path, "request short-circuited");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Response phase; every middleware runs
    pub fn run_response(&self, req: &Request, res: &mut Response) {
        for middleware in &self.middlewares {
            middleware.process_response(req, res);
        }
    }
}
