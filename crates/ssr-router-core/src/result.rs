//! Resolution result
//!
//! What routing adds to the page context. Serialized with the field names
//! the rendering side reads (`_pageId`, `routeParams`, ...).

use serde::Serialize;

use ssr_core::{PageId, RouteParams};

use crate::error::RouterError;
use crate::types::{RouteMatch, RouteMatches};

/// Outcome of routing one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Winning page, `None` if nothing matched
    #[serde(rename = "_pageId")]
    pub page_id: Option<PageId>,

    #[serde(rename = "routeParams")]
    pub route_params: RouteParams,

    #[serde(rename = "_routingProvidedByOnBeforeRouteHook")]
    pub routing_provided_by_on_before_route_hook: bool,

    /// Every match, winner first, or `CUSTOM_ROUTE`
    #[serde(rename = "_routeMatches")]
    pub route_matches: RouteMatches,
}

impl ResolutionResult {
    /// The winning match, if routing wasn't done by the hook
    pub fn winner(&self) -> Option<&RouteMatch> {
        self.route_matches.as_slice().first()
    }

    /// Whether a page was found
    pub fn is_match(&self) -> bool {
        self.page_id.is_some()
    }
}

/// Assembles a [`ResolutionResult`] exactly once
#[derive(Debug, Default)]
pub struct ResolutionBuilder {
    page_id: Option<PageId>,
    route_params: RouteParams,
    by_hook: bool,
    route_matches: Option<RouteMatches>,
}

impl ResolutionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hook decided routing
    pub fn hook_override(mut self, page_id: Option<PageId>, route_params: Option<RouteParams>) -> Self {
        self.page_id = page_id;
        self.route_params = route_params.unwrap_or_default();
        self.by_hook = true;
        self.route_matches = Some(RouteMatches::CustomRoute);
        self
    }

    /// Matches in precedence order; the first one wins
    pub fn route_matches(mut self, route_matches: Vec<RouteMatch>) -> Self {
        match route_matches.first() {
            Some(winner) => {
                self.page_id = Some(winner.page_id.clone());
                self.route_params = winner.route_params.clone();
            }
            None => {
                self.page_id = None;
                self.route_params = RouteParams::new();
            }
        }
        self.by_hook = false;
        self.route_matches = Some(RouteMatches::Matches(route_matches));
        self
    }

    pub fn build(self) -> Result<ResolutionResult, RouterError> {
        let route_matches = self
            .route_matches
            .ok_or_else(|| RouterError::Internal("resolution finished without route matches".to_string()))?;
        Ok(ResolutionResult {
            page_id: self.page_id,
            route_params: self.route_params,
            routing_provided_by_on_before_route_hook: self.by_hook,
            route_matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_winner_sets_page_and_params() {
        let mut params = RouteParams::new();
        params.insert("id".to_string(), "42".to_string());
        let result = ResolutionBuilder::new()
            .route_matches(vec![
                RouteMatch::filesystem("/pages/users/@id", "/users/@id", params.clone()),
                RouteMatch::function("/pages/fallback", None, RouteParams::new()),
            ])
            .build()
            .unwrap();

        assert_eq!(result.page_id.as_deref(), Some("/pages/users/@id"));
        assert_eq!(result.route_params, params);
        assert!(!result.routing_provided_by_on_before_route_hook);
        assert_eq!(result.winner().map(|m| m.page_id.as_str()), Some("/pages/users/@id"));
    }

    #[test]
    fn test_no_match() {
        let result = ResolutionBuilder::new().route_matches(vec![]).build().unwrap();
        assert!(!result.is_match());
        assert!(result.route_params.is_empty());
        assert!(result.winner().is_none());
    }

    #[test]
    fn test_hook_override_serialization() {
        let result = ResolutionBuilder::new().hook_override(None, None).build().unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "_pageId": null,
                "routeParams": {},
                "_routingProvidedByOnBeforeRouteHook": true,
                "_routeMatches": "CUSTOM_ROUTE"
            })
        );
    }

    #[test]
    fn test_incomplete_builder_is_internal_error() {
        let err = ResolutionBuilder::new().build().unwrap_err();
        assert!(matches!(err, RouterError::Internal(_)));
        assert!(!err.is_usage_error());
    }
}
