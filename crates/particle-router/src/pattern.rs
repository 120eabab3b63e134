//! Pattern parsing for route segments
//!
//! All functions are **pure**: same input → same output, no side effects.

use crate::Params;

/// One `/`-separated piece of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// `:name`, binds the corresponding path segment
    Param(String),
    /// Literal text that must equal the path segment
    Static(String),
}

/// Classifies a single pattern segment
///
/// # Examples
///
/// ```
/// use particle_router::{classify_segment, Segment};
///
/// assert_eq!(classify_segment("users"), Segment::Static("users".into()));
/// assert_eq!(classify_segment(":id"), Segment::Param("id".into()));
/// ```
pub fn classify_segment(segment: &str) -> Segment {
    match segment.strip_prefix(':') {
        Some(name) => Segment::Param(name.to_string()),
        None => Segment::Static(segment.to_string()),
    }
}

/// Percent-decodes one path segment.
///
/// `+` is left alone (path semantics, not form semantics). Invalid UTF-8 is
/// replaced rather than rejected.
///
/// ```
/// use particle_router::decode_segment;
///
/// assert_eq!(decode_segment("hello%20world"), "hello world");
/// assert_eq!(decode_segment("a+b"), "a+b");
/// ```
pub fn decode_segment(segment: &str) -> String {
    let bytes = urlencoding::decode_binary(segment.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A parsed route pattern such as `/users/:id/edit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        Self {
            raw: pattern.to_string(),
            segments: pattern.split('/').map(classify_segment).collect(),
        }
    }

    /// The pattern exactly as registered
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any segment is a `:param` capture
    pub fn is_dynamic(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Param(_)))
    }

    /// Names of the parameters in declaration order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// Matches a path against this pattern.
    ///
    /// Literal patterns only match the identical string. Dynamic patterns
    /// require the same segment count; trailing slashes are significant.
    pub fn matches(&self, path: &str) -> Option<Params> {
        if !self.is_dynamic() {
            return (self.raw == path).then(Params::new);
        }

        let path_segments: Vec<&str> = path.split('/').collect();
        if path_segments.len() != self.segments.len() {
            return None;
        }

        self.segments
            .iter()
            .zip(path_segments)
            .try_fold(Params::new(), |mut params, (segment, actual)| match segment {
                Segment::Param(name) => {
                    params.insert(name.clone(), decode_segment(actual));
                    Some(params)
                }
                Segment::Static(expected) => (expected == actual).then_some(params),
            })
    }
}
