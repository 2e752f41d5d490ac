//! Route String Strategy
//!
//! Matches URLs against route strings exported by `.page.route` files.
//!
//! ```text
//!  Syntax      Meaning
//!  /about      literal segment
//!  :name       named parameter (`@name` works too), one segment
//!  :name?      optional parameter, may be absent
//!  *           wildcard, captured as `*`, last segment only
//!  :name*      named wildcard, last segment only
//! ```
//!
//! Wildcards capture zero or more segments joined with `/`.

use tracing::trace;

use ssr_core::RouteParams;

use super::{match_segments, split_pathname, PathPattern, Segment, Specificity};
use crate::error::RouterError;

/// Parsed route string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteString {
    route: String,
    segments: Vec<Segment>,
}

impl RouteString {
    /// Parse a route string
    pub fn parse(route: &str) -> Result<Self, RouterError> {
        let malformed = |reason: &str| RouterError::MalformedRouteString {
            route: route.to_string(),
            reason: reason.to_string(),
        };

        if !route.starts_with('/') {
            return Err(malformed("it should start with `/`"));
        }

        let parts = split_pathname(route);
        let mut segments = Vec::with_capacity(parts.len());
        for (idx, part) in parts.iter().enumerate() {
            let segment = parse_segment(part).map_err(|reason| malformed(&reason))?;
            if matches!(segment, Segment::Wildcard { .. }) && idx + 1 != parts.len() {
                return Err(malformed("a wildcard is only allowed as the last segment"));
            }
            segments.push(segment);
        }

        Ok(Self {
            route: route.to_string(),
            segments,
        })
    }

    /// The route as written
    pub fn as_str(&self) -> &str {
        &self.route
    }

    /// Whether the route has no parameter at all
    pub fn is_static(&self) -> bool {
        self.specificity().is_static()
    }
}

fn parse_segment(part: &str) -> Result<Segment, String> {
    if part == "*" {
        return Ok(Segment::Wildcard { name: "*".to_string() });
    }

    let Some(param) = part.strip_prefix(':').or_else(|| part.strip_prefix('@')) else {
        return Ok(Segment::Literal(part.to_string()));
    };

    let (name, modifier) = match param.chars().last() {
        Some(m @ ('?' | '*')) => (&param[..param.len() - 1], Some(m)),
        _ => (param, None),
    };
    if name.is_empty() {
        return Err(format!("parameter `{}` has no name", part));
    }

    let name = name.to_string();
    Ok(match modifier {
        Some('?') => Segment::Param { name, optional: true },
        Some(_) => Segment::Wildcard { name },
        None => Segment::Param { name, optional: false },
    })
}

impl PathPattern for RouteString {
    fn resolve(&self, url_pathname: &str) -> Option<RouteParams> {
        let params = match_segments(&self.segments, &split_pathname(url_pathname));
        trace!(route = %self.route, url = %url_pathname, matched = params.is_some(), "Route string lookup");
        params
    }

    fn specificity(&self) -> Specificity {
        Specificity::of(&self.segments)
    }

    fn name(&self) -> &'static str {
        "RouteString"
    }
}

/// Match `url_pathname` against a route string
pub fn resolve_route_string(route_string: &str, url_pathname: &str) -> Result<Option<RouteParams>, RouterError> {
    Ok(RouteString::parse(route_string)?.resolve(url_pathname))
}

/// Whether a route string is free of parameters.
///
/// Malformed route strings are reported as not static; matching reports
/// the actual error.
pub fn is_static_route_string(route_string: &str) -> bool {
    RouteString::parse(route_string)
        .map(|route| route.is_static())
        .unwrap_or(false)
}
