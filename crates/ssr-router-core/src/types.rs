//! Common types for page routing
//!
//! Centralizes the match types shared by the strategies, the precedence
//! resolver and the route matcher.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

use ssr_core::{PageId, RouteParams};

/// Marker serialized in place of the match list when the
/// onBeforeRoute() hook decided routing on its own
pub const CUSTOM_ROUTE: &str = "CUSTOM_ROUTE";

/// How a route match was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    /// Route derived from the page's file location
    Filesystem,
    /// Explicit route string exported by a route file
    String,
    /// Route function exported by a route file
    Function,
}

impl std::fmt::Display for RouteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteType::Filesystem => write!(f, "FILESYSTEM"),
            RouteType::String => write!(f, "STRING"),
            RouteType::Function => write!(f, "FUNCTION"),
        }
    }
}

/// Numeric precedence returned by a route function.
///
/// Any finite JSON number is accepted. Ordering uses `f64::total_cmp`, so
/// the type is totally ordered and usable as a sort key.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(transparent)]
pub struct Precedence(pub f64);

impl PartialEq for Precedence {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for Precedence {}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Precedence {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Precedence {
    fn from(value: f64) -> Self {
        Precedence(value)
    }
}

impl From<i32> for Precedence {
    fn from(value: i32) -> Self {
        Precedence(f64::from(value))
    }
}

impl std::fmt::Display for Precedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page route that matched the current URL
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMatch {
    /// Matched page
    pub page_id: PageId,

    /// Route string that matched (STRING only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_string: Option<String>,

    /// Filesystem route that matched (FILESYSTEM only); used for ranking
    #[serde(skip)]
    pub filesystem_route: Option<String>,

    /// Precedence returned by a route function
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precedence: Option<Precedence>,

    /// Strategy that produced this match
    pub route_type: RouteType,

    /// Captured parameters
    pub route_params: RouteParams,
}

impl RouteMatch {
    /// Match produced by a filesystem route
    pub fn filesystem(page_id: impl Into<PageId>, filesystem_route: impl Into<String>, route_params: RouteParams) -> Self {
        Self {
            page_id: page_id.into(),
            route_string: None,
            filesystem_route: Some(filesystem_route.into()),
            precedence: None,
            route_type: RouteType::Filesystem,
            route_params,
        }
    }

    /// Match produced by a route string
    pub fn string(page_id: impl Into<PageId>, route_string: impl Into<String>, route_params: RouteParams) -> Self {
        Self {
            page_id: page_id.into(),
            route_string: Some(route_string.into()),
            filesystem_route: None,
            precedence: None,
            route_type: RouteType::String,
            route_params,
        }
    }

    /// Match produced by a route function
    pub fn function(page_id: impl Into<PageId>, precedence: Option<Precedence>, route_params: RouteParams) -> Self {
        Self {
            page_id: page_id.into(),
            route_string: None,
            filesystem_route: None,
            precedence,
            route_type: RouteType::Function,
            route_params,
        }
    }
}

/// All matches of a resolution, winner first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatches {
    /// The onBeforeRoute() hook fully overrode routing
    CustomRoute,
    /// Matches in precedence order
    Matches(Vec<RouteMatch>),
}

impl RouteMatches {
    /// Whether the hook overrode routing
    pub fn is_custom_route(&self) -> bool {
        matches!(self, RouteMatches::CustomRoute)
    }

    /// Matches in precedence order; empty for a custom route
    pub fn as_slice(&self) -> &[RouteMatch] {
        match self {
            RouteMatches::CustomRoute => &[],
            RouteMatches::Matches(matches) => matches,
        }
    }
}

impl Serialize for RouteMatches {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RouteMatches::CustomRoute => serializer.serialize_str(CUSTOM_ROUTE),
            RouteMatches::Matches(matches) => {
                let mut seq = serializer.serialize_seq(Some(matches.len()))?;
                for route_match in matches {
                    seq.serialize_element(route_match)?;
                }
                seq.end()
            }
        }
    }
}

/// Read a string→string mapping out of a loosely-typed value
pub(crate) fn route_params_from_value(value: &Value) -> Option<RouteParams> {
    let object = value.as_object()?;
    object
        .iter()
        .map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
        .collect()
}

/// Short human description of a loosely-typed value for error messages
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "`null`".to_string(),
        Value::Bool(b) => format!("a boolean (`{}`)", b),
        Value::Number(n) => format!("a number (`{}`)", n),
        Value::String(s) => format!("a string (`{}`)", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_matches_serialization() {
        assert_eq!(serde_json::to_value(RouteMatches::CustomRoute).unwrap(), json!("CUSTOM_ROUTE"));

        let mut params = RouteParams::new();
        params.insert("id".to_string(), "42".to_string());
        let matches = RouteMatches::Matches(vec![RouteMatch::filesystem("/pages/users/@id", "/users/@id", params)]);
        assert_eq!(
            serde_json::to_value(&matches).unwrap(),
            json!([{
                "pageId": "/pages/users/@id",
                "routeType": "FILESYSTEM",
                "routeParams": { "id": "42" }
            }])
        );
    }

    #[test]
    fn test_only_string_matches_carry_route_string() {
        let string = serde_json::to_value(RouteMatch::string("/pages/a", "/a", RouteParams::new())).unwrap();
        assert_eq!(string["routeString"], "/a");

        let fs = RouteMatch::filesystem("/pages/a", "/a", RouteParams::new());
        assert_eq!(fs.filesystem_route.as_deref(), Some("/a"));
        assert!(serde_json::to_value(&fs).unwrap().get("routeString").is_none());
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence(1.5) > Precedence(1.0));
        assert!(Precedence(-2.0) < Precedence::from(0));
        assert_eq!(Precedence::from(3), Precedence(3.0));
        assert_eq!(
            serde_json::to_value(RouteMatch::function("/pages/f", Some(Precedence(1.5)), RouteParams::new())).unwrap()["precedence"],
            json!(1.5)
        );
    }

    #[test]
    fn test_route_params_from_value() {
        let params = route_params_from_value(&json!({ "slug": "intro" })).unwrap();
        assert_eq!(params.get("slug").map(String::as_str), Some("intro"));

        assert!(route_params_from_value(&json!({ "id": 42 })).is_none());
        assert!(route_params_from_value(&json!(["a"])).is_none());
    }

    #[test]
    fn test_custom_route_has_no_matches() {
        assert!(RouteMatches::CustomRoute.is_custom_route());
        assert!(RouteMatches::CustomRoute.as_slice().is_empty());
    }
}
