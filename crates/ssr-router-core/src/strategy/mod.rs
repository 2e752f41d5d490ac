//! Routing Strategies
//!
//! This module contains the three ways a page can claim a URL:
//!
//! - `FilesystemRoute`: pattern derived from the page's file location
//! - `RouteString`: explicit pattern exported by a route file
//! - `RouteFunction`: user code exported by a route file
//!
//! # Strategy Selection
//!
//! ```text
//! PageRoute
//!     │
//!     ▼
//! Has route file? ──No──► FilesystemRoute
//!     │
//!    Yes
//!     │
//!     ▼
//! Exports string? ──Yes──► RouteString
//!     │
//!     No
//!     ▼
//! RouteFunction
//! ```
//!
//! The two pattern strategies share the segment model below; route
//! functions decide on their own.

mod filesystem;
mod route_function;
mod route_string;

pub use filesystem::{
    is_parameterized_filesystem_route, parameterized_segment_count, resolve_filesystem_route,
    FilesystemRoute,
};
pub use route_function::{
    async_route_fn, resolve_route_function, route_fn, AsyncFnRouteFunction, FnRouteFunction,
    RouteFunction, RouteFunctionMatch, RouteFunctionReturn,
};
pub use route_string::{is_static_route_string, resolve_route_string, RouteString};

use ssr_core::RouteParams;

/// Trait for path pattern strategies
pub trait PathPattern: Send + Sync {
    /// Match a URL pathname, returning the captured parameters
    fn resolve(&self, url_pathname: &str) -> Option<RouteParams>;

    /// How specific this pattern is, for precedence
    fn specificity(&self) -> Specificity;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// One `/`-separated piece of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the URL segment
    Literal(String),
    /// Captures one non-empty URL segment; an optional one may be skipped
    Param { name: String, optional: bool },
    /// Captures the remaining segments joined with `/`; always last
    Wildcard { name: String },
}

/// Counts of dynamic parts in a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Specificity {
    /// Required named parameters
    pub params: usize,
    /// Optional parameters
    pub optionals: usize,
    /// Wildcard segments
    pub wildcards: usize,
    /// Literal segments before the first dynamic one
    pub literal_prefix: usize,
}

impl Specificity {
    pub(crate) fn of(segments: &[Segment]) -> Self {
        let mut specificity = Specificity {
            literal_prefix: segments
                .iter()
                .take_while(|s| matches!(s, Segment::Literal(_)))
                .count(),
            ..Default::default()
        };
        for segment in segments {
            match segment {
                Segment::Literal(_) => {}
                Segment::Param { optional: false, .. } => specificity.params += 1,
                Segment::Param { optional: true, .. } => specificity.optionals += 1,
                Segment::Wildcard { .. } => specificity.wildcards += 1,
            }
        }
        specificity
    }

    /// No dynamic segment at all
    pub fn is_static(&self) -> bool {
        self.dynamic_segments() == 0
    }

    /// Number of segments that capture something
    pub fn dynamic_segments(&self) -> usize {
        self.params + self.optionals + self.wildcards
    }
}

/// Split a pathname into segments, ignoring the leading and one trailing slash.
///
/// `/` and the empty string have no segments.
pub(crate) fn split_pathname(pathname: &str) -> Vec<&str> {
    let trimmed = pathname.strip_prefix('/').unwrap_or(pathname);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        vec![]
    } else {
        trimmed.split('/').collect()
    }
}

/// Match `url` against `pattern`, backtracking over optional parameters.
pub(crate) fn match_segments(pattern: &[Segment], url: &[&str]) -> Option<RouteParams> {
    let mut params = RouteParams::new();
    if match_from(pattern, url, &mut params) {
        Some(params)
    } else {
        None
    }
}

fn match_from(pattern: &[Segment], url: &[&str], params: &mut RouteParams) -> bool {
    let Some((segment, pattern_rest)) = pattern.split_first() else {
        return url.is_empty();
    };

    match segment {
        Segment::Literal(literal) => match url.split_first() {
            Some((value, url_rest)) if value == literal => match_from(pattern_rest, url_rest, params),
            _ => false,
        },
        Segment::Param { name, optional } => {
            if let Some((value, url_rest)) = url.split_first() {
                if !value.is_empty() {
                    let previous = params.insert(name.clone(), value.to_string());
                    if match_from(pattern_rest, url_rest, params) {
                        return true;
                    }
                    match previous {
                        Some(previous) => params.insert(name.clone(), previous),
                        None => params.remove(name),
                    };
                }
            }
            *optional && match_from(pattern_rest, url, params)
        }
        Segment::Wildcard { name } if pattern_rest.is_empty() => {
            params.insert(name.clone(), url.join("/"));
            true
        }
        Segment::Wildcard { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    fn param(name: &str, optional: bool) -> Segment {
        Segment::Param { name: name.to_string(), optional }
    }

    #[test]
    fn test_split_pathname() {
        assert!(split_pathname("/").is_empty());
        assert!(split_pathname("").is_empty());
        assert_eq!(split_pathname("/a/b"), vec!["a", "b"]);
        assert_eq!(split_pathname("/a/b/"), vec!["a", "b"]);
        assert_eq!(split_pathname("/a//b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_optional_backtracking() {
        let pattern = vec![param("lang", true), literal("about")];

        let params = match_segments(&pattern, &["about"]).unwrap();
        assert!(params.is_empty());

        let params = match_segments(&pattern, &["en", "about"]).unwrap();
        assert_eq!(params.get("lang").map(String::as_str), Some("en"));

        assert!(match_segments(&pattern, &["en", "contact"]).is_none());
    }

    #[test]
    fn test_empty_segment_never_captured() {
        let pattern = vec![literal("a"), param("id", false), literal("b")];
        assert!(match_segments(&pattern, &["a", "", "b"]).is_none());
    }

    #[test]
    fn test_specificity() {
        let segments = vec![
            literal("docs"),
            param("version", true),
            param("page", false),
            Segment::Wildcard { name: "*".to_string() },
        ];
        let specificity = Specificity::of(&segments);
        assert_eq!(specificity.literal_prefix, 1);
        assert_eq!(specificity.optionals, 1);
        assert_eq!(specificity.params, 1);
        assert_eq!(specificity.wildcards, 1);
        assert!(!specificity.is_static());
        assert!(Specificity::of(&[literal("about")]).is_static());
    }
}
