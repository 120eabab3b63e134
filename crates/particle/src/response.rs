// File: src/response.rs
// Purpose: Outbound response accumulated by middleware and handlers, flushed once

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::cookie::{build_set_cookie, delete_cookie_header, CookieOptions};

/// Response body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// JSON-encoded on flush
    Json(Value),
    /// Written verbatim
    Text(String),
    Binary(Vec<u8>),
}

impl Body {
    /// Wire bytes: objects and arrays are JSON-encoded; any other JSON value
    /// is stringified.
    pub fn render(&self) -> Vec<u8> {
        match self {
            Body::Json(value @ (Value::Object(_) | Value::Array(_))) => value.to_string().into_bytes(),
            Body::Json(Value::String(s)) => s.clone().into_bytes(),
            Body::Json(value) => value.to_string().into_bytes(),
            Body::Text(text) => text.clone().into_bytes(),
            Body::Binary(bytes) => bytes.clone(),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Json(Value::Object(Map::new()))
    }
}

/// Response builder.
///
/// Starts as `200` with `Content-Type: application/json` and an empty JSON
/// object body. Flushing consumes it, so it can only be sent once.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Body,
    cookies_to_set: Vec<String>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Body::default(),
            cookies_to_set: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn cookies_to_set(&self) -> &[String] {
        &self.cookies_to_set
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Set a header, replacing any existing value with the same
    /// case-insensitive name in place
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    pub fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) -> &mut Self {
        self.cookies_to_set.push(build_set_cookie(name, value, options));
        self
    }

    pub fn delete_cookie(&mut self, name: &str, path: &str) -> &mut Self {
        self.cookies_to_set.push(delete_cookie_header(name, path));
        self
    }

    /// Replace the body with a JSON value. The content type is left alone.
    pub fn json(&mut self, data: impl Into<Value>) -> &mut Self {
        self.body = Body::Json(data.into());
        self
    }

    /// Serialize `data` as the JSON body
    pub fn json_of<T: Serialize>(&mut self, data: &T) -> Result<&mut Self, serde_json::Error> {
        self.body = Body::Json(serde_json::to_value(data)?);
        Ok(self)
    }

    pub fn html(&mut self, html: impl Into<String>) -> &mut Self {
        self.set_header("Content-Type", "text/html; charset=utf-8");
        self.body = Body::Text(html.into());
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.set_header("Content-Type", "text/plain; charset=utf-8");
        self.body = Body::Text(text.into());
        self
    }

    pub fn bytes(&mut self, content_type: &str, bytes: Vec<u8>) -> &mut Self {
        self.set_header("Content-Type", content_type);
        self.body = Body::Binary(bytes);
        self
    }

    /// Copy headers and cookies from `other` that this response lacks.
    /// Existing headers win; cookies from `other` go first.
    pub(crate) fn absorb(&mut self, other: Response) {
        for (name, value) in other.headers {
            if self.header(&name).is_none() {
                self.headers.push((name, value));
            }
        }
        let mut cookies = other.cookies_to_set;
        cookies.append(&mut self.cookies_to_set);
        self.cookies_to_set = cookies;
    }

    pub fn render_body(&self) -> Vec<u8> {
        self.body.render()
    }

    /// Flush into an HTTP response: status, headers in order, one
    /// `Set-Cookie` per cookie, then the body. `204` and `304` are sent without a body.
    pub fn into_http(self) -> axum::response::Response {
        let body = match self.status {
            StatusCode::NO_CONTENT | StatusCode::NOT_MODIFIED => Vec::new(),
            _ => self.body.render(),
        };
        let mut response = axum::response::Response::new(axum::body::Body::from(body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "dropping invalid response header"),
            }
        }
        for cookie in &self.cookies_to_set {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                headers.append(axum::http::header::SET_COOKIE, value);
            }
        }

        response
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        self.into_http()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let res = Response::new();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.header("content-type"), Some("application/json"));
        assert_eq!(res.render_body(), b"{}".to_vec());
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut res = Response::new();
        res.set_header("X-Trace", "1").set_header("content-type", "text/csv");
        assert_eq!(res.headers().len(), 2);
        assert_eq!(res.header("Content-Type"), Some("text/csv"));
        assert_eq!(res.headers()[0].0, "Content-Type");
    }

    #[test]
    fn test_json_body_rendering() {
        let mut res = Response::new();
        res.json(json!({"ok": true, "items": [1, 2]}));
        assert_eq!(
            String::from_utf8(res.render_body()).unwrap(),
            r#"{"ok":true,"items":[1,2]}"#
        );
        res.json(json!("plain"));
        assert_eq!(res.render_body(), b"plain".to_vec());
        res.json(json!(42));
        assert_eq!(res.render_body(), b"42".to_vec());
    }

    #[test]
    fn test_html_sets_content_type() {
        let mut res = Response::new();
        res.html("<p>hi</p>");
        assert_eq!(res.header("Content-Type"), Some("text/html; charset=utf-8"));
        assert_eq!(res.body(), &Body::Text("<p>hi</p>".into()));
    }

    #[test]
    fn test_into_http_emits_cookies() {
        let mut res = Response::new();
        res.set_status(StatusCode::CREATED)
            .set_cookie("a", "1", &CookieOptions::default())
            .delete_cookie("b", "/");
        let http = res.into_http();
        assert_eq!(http.status(), StatusCode::CREATED);
        let cookies: Vec<&str> = http
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], build_set_cookie("a", "1", &CookieOptions::default()));
        assert_eq!(cookies[1], delete_cookie_header("b", "/"));
        assert_eq!(http.headers()["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_no_content_has_empty_body() {
        let mut res = Response::new();
        res.set_status(StatusCode::NO_CONTENT);
        let body = axum::body::to_bytes(res.into_http().into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_absorb_keeps_own_headers() {
        let mut pipeline = Response::new();
        pipeline
            .set_header("Access-Control-Allow-Origin", "*")
            .set_cookie("mw", "1", &CookieOptions::default());

        let mut handler = Response::new();
        handler.set_header("Content-Type", "text/plain").set_cookie("h", "2", &CookieOptions::default());
        handler.absorb(pipeline);

        assert_eq!(handler.header("Content-Type"), Some("text/plain"));
        assert_eq!(handler.header("access-control-allow-origin"), Some("*"));
        assert_eq!(handler.cookies_to_set().len(), 2);
        assert!(handler.cookies_to_set()[0].starts_with("mw=1"));
    }
}
