// File: src/middleware/logging.rs
// Purpose: One log line per request with status and elapsed time

use std::ops::ControlFlow;
use std::time::Instant;
use tracing::info;

use super::Middleware;
use crate::request::Request;
use crate::response::Response;

/// Start time stored in the request extensions by [`LoggingMiddleware`]
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }

    /// `"{method} {path} - {status} - {elapsed:.3}s"`
    pub fn format_line(req: &Request, res: &Response, elapsed_secs: f64) -> String {
        format!(
            "{} {} - {} - {:.3}s",
            req.method,
            req.url_path,
            res.status().as_u16(),
            elapsed_secs
        )
    }
}

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    fn process_request(&self, req: &mut Request, _res: &mut Response) -> ControlFlow<()> {
        req.extensions.insert(RequestStart(Instant::now()));
        ControlFlow::Continue(())
    }

    fn process_response(&self, req: &Request, res: &mut Response) {
        let elapsed = req
            .extensions
            .get::<RequestStart>()
            .map(|start| start.0.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        info!("{}", Self::format_line(req, res, elapsed));
    }
}
