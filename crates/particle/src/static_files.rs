// File: src/static_files.rs
// Purpose: Static asset lookup with content-hash stripping and long-lived caching

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use crate::envelope::error_response;
use crate::response::Response;

static CONTENT_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.[a-f0-9]{6,}\.").unwrap());

pub const CACHE_CONTROL: &str = "public, max-age=31536000";

/// Files served from `dir` under the URL `prefix`
#[derive(Debug, Clone)]
pub struct StaticFiles {
    dir: PathBuf,
    prefix: String,
}

impl StaticFiles {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
    }

    pub fn matches(&self, url_path: &str) -> bool {
        url_path.starts_with(&self.prefix)
    }

    /// `app.3f2a9c1b.js` → `app.js`
    pub fn strip_hash(name: &str) -> Cow<'_, str> {
        CONTENT_HASH.replace_all(name, ".")
    }

    /// File path for a URL path under the prefix. Traversal outside the
    /// directory and empty names are rejected.
    pub fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let name = url_path.strip_prefix(&self.prefix)?;
        let decoded = urlencoding::decode(name).ok()?;
        let name = Self::strip_hash(&decoded).into_owned();
        let relative = Path::new(&name);

        let mut parts = relative.components().peekable();
        parts.peek()?;
        if !parts.all(|part| matches!(part, Component::Normal(_))) {
            return None;
        }
        Some(self.dir.join(relative))
    }

    /// Response for a static request: the file, or a 404 envelope
    pub fn serve(&self, url_path: &str) -> Response {
        let Some(path) = self.resolve(url_path).filter(|p| p.is_file()) else {
            tracing::debug!(path = url_path, "static file not found");
            return error_response(StatusCode::NOT_FOUND, "Not found");
        };

        match std::fs::read(&path) {
            Ok(bytes) => {
                let mut response = Response::new();
                response
                    .bytes(mime_type(&path), bytes)
                    .set_header("Cache-Control", CACHE_CONTROL);
                response
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read static file");
                error_response(StatusCode::NOT_FOUND, "Not found")
            }
        }
    }
}

/// Content type by file extension
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Body;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("app.3f2a9c1b.js", "app.js")]
    #[case("style.abcdef.css", "style.css")]
    #[case("app.abc.js", "app.abc.js")]
    #[case("Logo.svg", "Logo.svg")]
    fn test_strip_hash(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(StaticFiles::strip_hash(input), expected);
    }

    #[rstest]
    #[case("/static/../Cargo.toml")]
    #[case("/static/a/../../secret")]
    #[case("/static/%2e%2e/secret")]
    #[case("/static/")]
    #[case("/other/app.js")]
    fn test_resolve_rejects(#[case] url: &str) {
        let files = StaticFiles::new("static", "/static/");
        assert_eq!(files.resolve(url), None);
    }

    #[test]
    fn test_resolve_nested() {
        let files = StaticFiles::new("assets", "/static/");
        assert_eq!(
            files.resolve("/static/js/app.0123456789.js"),
            Some(PathBuf::from("assets/js/app.js"))
        );
    }

    #[test]
    fn test_serve_file_with_cache_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
        let files = StaticFiles::new(dir.path(), "/static/");

        let res = files.serve("/static/app.deadbeef.js");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.header("Content-Type"), Some("text/javascript"));
        assert_eq!(res.header("Cache-Control"), Some(CACHE_CONTROL));
        assert_eq!(res.body(), &Body::Binary(b"console.log(1)".to_vec()));
    }

    #[test]
    fn test_serve_missing_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let files = StaticFiles::new(dir.path(), "/static/");
        assert_eq!(files.serve("/static/nope.css").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type(Path::new("a.SVG")), "image/svg+xml");
        assert_eq!(mime_type(Path::new("a.unknown")), "application/octet-stream");
        assert_eq!(mime_type(Path::new("noext")), "application/octet-stream");
    }
}
