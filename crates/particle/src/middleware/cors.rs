// File: src/middleware/cors.rs
// Purpose: CORS headers and preflight short-circuit

use axum::http::{Method, StatusCode};
use std::ops::ControlFlow;

use super::Middleware;
use crate::config::CorsConfig;
use crate::request::Request;
use crate::response::Response;

#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    allowed_origins: String,
    allowed_methods: String,
    allowed_headers: String,
}

impl Default for CorsMiddleware {
    fn default() -> Self {
        Self::from_config(&CorsConfig::default())
    }
}

impl CorsMiddleware {
    pub fn new(
        allowed_origins: impl Into<String>,
        allowed_methods: impl Into<String>,
        allowed_headers: impl Into<String>,
    ) -> Self {
        Self {
            allowed_origins: allowed_origins.into(),
            allowed_methods: allowed_methods.into(),
            allowed_headers: allowed_headers.into(),
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(
            config.allowed_origins.clone(),
            config.allowed_methods.clone(),
            config.allowed_headers.clone(),
        )
    }
}

impl Middleware for CorsMiddleware {
    fn name(&self) -> &str {
        "cors"
    }

    fn process_request(&self, req: &mut Request, res: &mut Response) -> ControlFlow<()> {
        res.set_header("Access-Control-Allow-Origin", self.allowed_origins.as_str())
            .set_header("Access-Control-Allow-Methods", self.allowed_methods.as_str())
            .set_header("Access-Control-Allow-Headers", self.allowed_headers.as_str());

        if req.method == Method::OPTIONS {
            res.set_status(StatusCode::NO_CONTENT);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}
