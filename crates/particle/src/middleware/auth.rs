// File: src/middleware/auth.rs
// Purpose: Path-prefix protection backed by a pluggable check

use axum::http::StatusCode;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::Middleware;
use crate::envelope::JsonEnvelope;
use crate::request::Request;
use crate::response::Response;

/// Returns `true` when the request is allowed through
pub type AuthCheck = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Rejects requests under a protected prefix with `401` unless the check
/// passes. The default check requires a live session.
#[derive(Clone)]
pub struct AuthMiddleware {
    protected_prefixes: Vec<String>,
    check: AuthCheck,
}

impl std::fmt::Debug for AuthMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthMiddleware")
            .field("protected_prefixes", &self.protected_prefixes)
            .finish()
    }
}

impl AuthMiddleware {
    pub fn new<I, S>(protected_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protected_prefixes: protected_prefixes.into_iter().map(Into::into).collect(),
            check: Arc::new(|req: &Request| req.session.is_some()),
        }
    }

    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.check = Arc::new(check);
        self
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

impl Middleware for AuthMiddleware {
    fn name(&self) -> &str {
        "auth"
    }

    fn process_request(&self, req: &mut Request, res: &mut Response) -> ControlFlow<()> {
        if self.is_protected(&req.url_path) && !(self.check)(req) {
            tracing::debug!(path = %req.url_path, "unauthorized request");
            res.set_status(StatusCode::UNAUTHORIZED)
                .json(JsonEnvelope::error("Unauthorized", 401, None));
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}
