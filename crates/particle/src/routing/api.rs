// File: src/routing/api.rs
// Purpose: API handler table keyed by method and path pattern

use axum::http::Method;
use particle_router::{Params, RouteTable};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::envelope::JsonEnvelope;
use crate::request::Request;
use crate::response::Response;

/// What an API handler produces
#[derive(Debug, Clone)]
pub enum Reply {
    /// Becomes the body of the pipeline response
    Json(Value),
    /// Replaces the pipeline response; headers and cookies already set by
    /// middleware are kept unless the handler set them too
    Response(Response),
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Json(value)
    }
}

impl From<JsonEnvelope> for Reply {
    fn from(envelope: JsonEnvelope) -> Self {
        Reply::Json(envelope.into_value())
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Response(response)
    }
}

/// Handler function type
pub type HandlerFn = Arc<dyn Fn(&Request) -> anyhow::Result<Reply> + Send + Sync>;

/// A handler resolved for one request
#[derive(Clone)]
pub struct ResolvedRoute {
    pub pattern: String,
    pub handler: HandlerFn,
    pub params: Params,
}

impl std::fmt::Debug for ResolvedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedRoute")
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .finish()
    }
}

/// API routes, one pattern table per method
#[derive(Clone, Default)]
pub struct ApiRoutes {
    routes: HashMap<Method, RouteTable<HandlerFn>>,
}

impl ApiRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Re-registering the same `(path, method)` replaces
    /// the handler and returns `true`.
    pub fn add<F>(&mut self, path: &str, method: Method, handler: F) -> bool
    where
        F: Fn(&Request) -> anyhow::Result<Reply> + Send + Sync + 'static,
    {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Arc::new(handler) as HandlerFn)
            .is_some()
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Option<ResolvedRoute> {
        let route = self.routes.get(method)?.match_path(path)?;
        Some(ResolvedRoute {
            pattern: route.pattern.to_string(),
            handler: route.value.clone(),
            params: route.params,
        })
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes
            .get(method)
            .is_some_and(|table| table.contains(path))
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(RouteTable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(method, pattern)` pairs, grouped by method
    pub fn list(&self) -> Vec<(Method, String)> {
        let mut list: Vec<(Method, String)> = self
            .routes
            .iter()
            .flat_map(|(method, table)| {
                table
                    .iter()
                    .map(move |(pattern, _)| (method.clone(), pattern.to_string()))
            })
            .collect();
        list.sort_by(|a, b| (a.0.as_str(), &a.1).cmp(&(b.0.as_str(), &b.1)));
        list
    }
}
