// File: src/request.rs
// Purpose: Parsed inbound request with query params, cookies, session, JSON body and uploads

use axum::body::Bytes;
use axum::http::{Extensions, HeaderMap, HeaderName, HeaderValue, Method};
use particle_router::Params;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::cookie::{parse_cookies, CookieOptions};
use crate::multipart::{parse_multipart, FormField};
use crate::response::Response;
use crate::session::{SessionData, SessionStore};

/// Cookie carrying the session id unless configured otherwise
pub const DEFAULT_SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body is empty")]
    Empty,
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Request as read off the wire, before any parsing
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    /// Path plus optional query string
    pub target: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawRequest {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(Method::POST, target)
    }

    /// Adds a header; invalid names or values are ignored
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// One query-string value. A key seen once is `Single`; a repeated key keeps
/// every value in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// The value for `Single`, the first value for `Multi`
    pub fn first(&self) -> &str {
        match self {
            QueryValue::Single(value) => value,
            QueryValue::Multi(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            QueryValue::Single(value) => Some(value),
            QueryValue::Multi(_) => None,
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Query parameters from URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams {
    params: HashMap<String, QueryValue>,
}

impl QueryParams {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// Pairs are split on `&`, `+` decodes to a space and both sides are
    /// percent-decoded. Pairs without `=` and pairs with an empty value are
    /// dropped.
    pub fn parse(query: &str) -> Self {
        let mut collected: Vec<(String, Vec<String>)> = Vec::new();

        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let key = decode_component(key);
            let value = decode_component(value);
            match collected.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => collected.push((key, vec![value])),
            }
        }

        let params = collected
            .into_iter()
            .map(|(key, mut values)| {
                let value = if values.len() == 1 {
                    QueryValue::Single(values.remove(0))
                } else {
                    QueryValue::Multi(values)
                };
                (key, value)
            })
            .collect();

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// Get a query parameter as a specific type (first value when repeated)
    pub fn get_as<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.params.get(key)?.first().parse().ok()
    }

    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn keys(&self) -> Vec<&String> {
        self.params.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, QueryValue> {
        &self.params
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

/// Parse a body as JSON, keeping the error
pub fn try_parse_json(body: &[u8]) -> Result<Value, BodyError> {
    if body.is_empty() {
        return Err(BodyError::Empty);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Request passed to middleware and API handlers.
///
/// Construction never fails: malformed JSON becomes an empty object and a
/// multipart body without a boundary yields no files.
pub struct Request {
    pub method: Method,
    /// Raw request target, query string included
    pub path: String,
    /// Path without the query string
    pub url_path: String,
    pub query_params: QueryParams,
    pub headers: HeaderMap,
    pub cookies: HashMap<String, String>,
    pub session_id: Option<String>,
    /// Data of the live session named by the session cookie
    pub session: Option<SessionData>,
    pub body: Bytes,
    pub json_body: Value,
    /// Multipart fields, populated only for `multipart/form-data` bodies
    pub files: HashMap<String, FormField>,
    /// Parameters captured by the matched API route pattern
    pub path_params: Params,
    /// Per-request scratch space for middleware
    pub extensions: Extensions,
    sessions: SessionStore,
    session_cookie: String,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl Request {
    pub fn from_raw(raw: RawRequest, sessions: &SessionStore) -> Self {
        Self::with_session_cookie(raw, sessions, DEFAULT_SESSION_COOKIE)
    }

    /// Parse `raw`, resolving the session from the cookie named `cookie_name`
    pub fn with_session_cookie(raw: RawRequest, sessions: &SessionStore, cookie_name: &str) -> Self {
        let RawRequest {
            method,
            target,
            headers,
            body,
        } = raw;

        let (url_path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), query),
            None => (target.clone(), ""),
        };
        let url_path = match url_path.split_once('#') {
            Some((path, _)) => path.to_string(),
            None => url_path,
        };
        let query = query.split('#').next().unwrap_or("");
        let query_params = QueryParams::parse(query);

        let cookies = headers
            .get("cookie")
            .and_then(|value| value.to_str().ok())
            .map(parse_cookies)
            .unwrap_or_default();

        let session_id = cookies.get(cookie_name).cloned();
        let session = session_id.as_deref().and_then(|id| sessions.get(id));

        let json_body = if body.is_empty() {
            Value::Object(Map::new())
        } else {
            try_parse_json(&body).unwrap_or_else(|_| Value::Object(Map::new()))
        };

        let content_type = headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        let files = if content_type.contains("multipart/form-data") {
            parse_multipart(&body, content_type)
        } else {
            HashMap::new()
        };

        Self {
            method,
            path: target,
            url_path,
            query_params,
            headers,
            cookies,
            session_id,
            session,
            body,
            json_body,
            files,
            path_params: Params::new(),
            extensions: Extensions::new(),
            sessions: sessions.clone(),
            session_cookie: cookie_name.to_string(),
        }
    }

    /// Get a cookie value
    pub fn get_cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    /// Get a header value
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Check if request accepts JSON
    pub fn accepts_json(&self) -> bool {
        self.get_header("accept")
            .map(|accept| accept.contains("json"))
            .unwrap_or(false)
    }

    pub fn query(&self, key: &str) -> Option<&QueryValue> {
        self.query_params.get(key)
    }

    /// A route parameter captured from the path
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Top-level field of the JSON body
    pub fn json_field(&self, key: &str) -> Option<&Value> {
        self.json_body.get(key)
    }

    /// Deserialize the body into `T`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BodyError> {
        let value = try_parse_json(&self.body)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn file(&self, name: &str) -> Option<&FormField> {
        self.files.get(name)
    }

    /// The session store this request was resolved against
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie
    }

    /// Create a session and queue its cookie on `res`. Returns the new id.
    pub fn start_session(&self, data: SessionData, max_age: Duration, res: &mut Response) -> String {
        let id = self.sessions.create(data, max_age);
        let options = CookieOptions::default().max_age(max_age.as_secs() as i64);
        res.set_cookie(&self.session_cookie, &id, &options);
        id
    }

    /// Destroy the current session, if any, and expire its cookie
    pub fn end_session(&self, res: &mut Response) -> bool {
        let destroyed = self
            .session_id
            .as_deref()
            .map(|id| self.sessions.destroy(id))
            .unwrap_or(false);
        res.delete_cookie(&self.session_cookie, "/");
        destroyed
    }
}
