//! Filesystem Route Strategy
//!
//! Matches URLs against the route derived from where a page lives,
//! e.g. `pages/users/@id.page.rs` → `/users/@id`.
//!
//! Segment syntax:
//! - `@name` or `[name]`: captures one URL segment
//! - `[...name]` or `*`: captures the rest of the URL, last segment only
//! - anything else: literal
//!
//! A `[...name]` that isn't the last segment captures a single segment.

use tracing::trace;

use ssr_core::RouteParams;

use super::{match_segments, split_pathname, PathPattern, Segment, Specificity};

/// Parsed filesystem route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemRoute {
    route: String,
    segments: Vec<Segment>,
}

impl FilesystemRoute {
    /// Parse a filesystem route; every input is a valid filesystem route
    pub fn parse(route: &str) -> Self {
        let parts = split_pathname(route);
        let last = parts.len().saturating_sub(1);
        let segments = parts
            .iter()
            .enumerate()
            .map(|(idx, part)| parse_segment(part, idx == last))
            .collect();

        Self {
            route: route.to_string(),
            segments,
        }
    }

    /// The route as written
    pub fn as_str(&self) -> &str {
        &self.route
    }

    /// Whether any segment captures a parameter
    pub fn is_parameterized(&self) -> bool {
        !self.specificity().is_static()
    }
}

fn parse_segment(part: &str, is_last: bool) -> Segment {
    if let Some(name) = part.strip_prefix("[...").and_then(|p| p.strip_suffix(']')) {
        if !name.is_empty() {
            return if is_last {
                Segment::Wildcard { name: name.to_string() }
            } else {
                Segment::Param { name: name.to_string(), optional: false }
            };
        }
    }
    if part == "*" && is_last {
        return Segment::Wildcard { name: "*".to_string() };
    }

    let name = part
        .strip_prefix('@')
        .or_else(|| part.strip_prefix('[').and_then(|p| p.strip_suffix(']')));
    match name {
        Some(name) if !name.is_empty() => Segment::Param { name: name.to_string(), optional: false },
        _ => Segment::Literal(part.to_string()),
    }
}

impl PathPattern for FilesystemRoute {
    fn resolve(&self, url_pathname: &str) -> Option<RouteParams> {
        let params = match_segments(&self.segments, &split_pathname(url_pathname));
        trace!(route = %self.route, url = %url_pathname, matched = params.is_some(), "Filesystem route lookup");
        params
    }

    fn specificity(&self) -> Specificity {
        Specificity::of(&self.segments)
    }

    fn name(&self) -> &'static str {
        "Filesystem"
    }
}

/// Match `url_pathname` against a filesystem route
pub fn resolve_filesystem_route(filesystem_route: &str, url_pathname: &str) -> Option<RouteParams> {
    FilesystemRoute::parse(filesystem_route).resolve(url_pathname)
}

/// Whether a filesystem route has any parameterized segment
pub fn is_parameterized_filesystem_route(filesystem_route: &str) -> bool {
    FilesystemRoute::parse(filesystem_route).is_parameterized()
}

/// Number of parameterized segments of a filesystem route
pub fn parameterized_segment_count(filesystem_route: &str) -> usize {
    FilesystemRoute::parse(filesystem_route).specificity().dynamic_segments()
}
