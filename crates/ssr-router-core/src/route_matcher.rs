//! Route Matcher
//!
//! Resolves which page renders a request.
//!
//! # Routing Decision Tree
//!
//! ```text
//! Request arrives
//!        │
//!        ▼
//! onBeforeRoute() hook? ──Override──► page decided by the hook (CUSTOM_ROUTE)
//!        │
//!   Rewrite / NoOp
//!        │
//!        ▼
//! Every page route, concurrently:
//!   route file exports a string   ──► RouteString
//!   route file exports a function ──► RouteFunction
//!   no route file                 ──► FilesystemRoute
//!        │
//!        ▼
//! Matches in declaration order ──► precedence ──► winner (or no page)
//! ```
//!
//! # Design Rationale
//!
//! - The hook runs first, so a rewritten pathname is what the strategies see
//! - Matching has no shared state; each page route fills its own slot
//! - The first error in declaration order is reported, the others dropped

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, trace};

use ssr_core::{PageContext, RouterConfig};

use crate::error::RouterError;
use crate::hook::{call_on_before_route_hook, HookOutcome, OnBeforeRouteHook};
use crate::observer::{RouteObserver, TracingObserver};
use crate::precedence::resolve_precedence;
use crate::result::{ResolutionBuilder, ResolutionResult};
use crate::route_file::{PageRoute, RouteDefinition};
use crate::strategy::{resolve_filesystem_route, resolve_route_function, resolve_route_string};
use crate::types::RouteMatch;

/// Resolves requests against a fixed set of page routes
pub struct RouteMatcher {
    page_routes: Vec<PageRoute>,
    on_before_route: Option<Arc<dyn OnBeforeRouteHook>>,
    config: RouterConfig,
    observer: Arc<dyn RouteObserver>,
}

impl RouteMatcher {
    /// Create a matcher without hook, with default config
    pub fn new(page_routes: Vec<PageRoute>) -> Self {
        Self {
            page_routes,
            on_before_route: None,
            config: RouterConfig::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Register the onBeforeRoute() hook
    pub fn with_hook(mut self, hook: Arc<dyn OnBeforeRouteHook>) -> Self {
        self.on_before_route = Some(hook);
        self
    }

    /// Set the router configuration.
    ///
    /// `route` reads only `unranked_function_policy`. The base URL is
    /// stripped when the context is built (`PageContext::from_url`), so
    /// `url_pathname` reaches the matcher without it.
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default tracing observer
    pub fn with_observer(mut self, observer: Arc<dyn RouteObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn page_routes(&self) -> &[PageRoute] {
        &self.page_routes
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route a request.
    ///
    /// The hook may rewrite `page_context.url_pathname` and add fields to
    /// it; those changes stay on the context for the rest of the request.
    pub async fn route(&self, page_context: &mut PageContext) -> Result<ResolutionResult, RouterError> {
        self.observer.on_page_routes(&self.page_routes);

        if let Some(hook) = &self.on_before_route {
            match call_on_before_route_hook(hook.as_ref(), page_context).await? {
                HookOutcome::Override { page_id, route_params } => {
                    debug!(page_id = ?page_id, "Routing provided by onBeforeRoute() hook");
                    return ResolutionBuilder::new().hook_override(page_id, route_params).build();
                }
                HookOutcome::Rewrite { url_pathname, fields } => {
                    if let Some(url_pathname) = url_pathname {
                        debug!(from = %page_context.url_pathname, to = %url_pathname, "URL rewritten by onBeforeRoute() hook");
                        page_context.url_pathname = url_pathname;
                    }
                    page_context.fields.extend(fields);
                }
                HookOutcome::NoOp => {}
            }
        }

        if page_context.all_page_ids.is_empty() {
            return Err(RouterError::NoPages);
        }
        if !page_context.url_pathname.starts_with('/') {
            return Err(RouterError::InvalidUrlPathname(page_context.url_pathname.clone()));
        }

        let context = &*page_context;
        let slots = join_all(
            self.page_routes
                .iter()
                .map(|page_route| match_page_route(page_route, context)),
        )
        .await;

        let mut route_matches = Vec::new();
        for slot in slots {
            if let Some(route_match) = slot? {
                route_matches.push(route_match);
            }
        }

        resolve_precedence(&mut route_matches, self.config.unranked_function_policy);
        self.observer.on_route_matches(&context.url_pathname, &route_matches);

        let result = ResolutionBuilder::new().route_matches(route_matches).build()?;
        debug!(
            url = %context.url_pathname,
            page_id = ?result.page_id,
            matches = result.route_matches.as_slice().len(),
            "Route resolved"
        );
        Ok(result)
    }
}

/// Try a single page route against the request
async fn match_page_route(
    page_route: &PageRoute,
    page_context: &PageContext,
) -> Result<Option<RouteMatch>, RouterError> {
    let url_pathname = page_context.url_pathname.as_str();
    let page_id = &page_route.page_id;

    let Some(route_file) = &page_route.page_route_file else {
        let route_match = resolve_filesystem_route(&page_route.filesystem_route, url_pathname)
            .map(|params| RouteMatch::filesystem(page_id.clone(), page_route.filesystem_route.clone(), params));
        return Ok(route_match);
    };

    let route_match = match &route_file.definition {
        RouteDefinition::String(route_string) => {
            if !route_string.starts_with('/') {
                return Err(RouterError::RouteStringMissingSlash {
                    file_path: route_file.file_path.clone(),
                    route_string: route_string.clone(),
                });
            }
            resolve_route_string(route_string, url_pathname)?
                .map(|params| RouteMatch::string(page_id.clone(), route_string.clone(), params))
        }
        RouteDefinition::Function(route_function) => {
            resolve_route_function(route_function.as_ref(), page_context, &route_file.file_path)
                .await?
                .map(|m| RouteMatch::function(page_id.clone(), m.precedence, m.route_params))
        }
    };

    trace!(page_id = %page_id, file = %route_file.file_path, matched = route_match.is_some(), "Page route evaluated");
    Ok(route_match)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::hook_fn;
    use crate::route_file::RouteFile;
    use crate::strategy::route_fn;

    fn all_ids(page_routes: &[PageRoute]) -> Vec<String> {
        page_routes.iter().map(|r| r.page_id.clone()).collect()
    }

    #[tokio::test]
    async fn test_filesystem_routing() {
        let routes = vec![
            PageRoute::filesystem("/pages/index", "/"),
            PageRoute::filesystem("/pages/users/@id", "/users/@id"),
        ];
        let mut ctx = PageContext::new("/users/42", all_ids(&routes));
        let result = RouteMatcher::new(routes).route(&mut ctx).await.unwrap();

        assert_eq!(result.page_id.as_deref(), Some("/pages/users/@id"));
        assert_eq!(result.route_params.get("id").map(String::as_str), Some("42"));
    }

    #[tokio::test]
    async fn test_route_string_missing_slash() {
        let routes = vec![PageRoute::filesystem("/pages/about", "/about")
            .with_route_file(RouteFile::string("/pages/about.page.route.rs", "about"))];
        let mut ctx = PageContext::new("/about", all_ids(&routes));
        let err = RouteMatcher::new(routes).route(&mut ctx).await.unwrap_err();

        assert!(matches!(err, RouterError::RouteStringMissingSlash { ref file_path, .. } if file_path == "/pages/about.page.route.rs"));
        assert!(err.to_string().contains("Use `/about` instead"));
    }

    #[tokio::test]
    async fn test_first_error_in_declaration_order() {
        let routes = vec![
            PageRoute::filesystem("/pages/a", "/a").with_route_file(RouteFile::function(
                "/pages/a.page.route.rs",
                route_fn(|_| Err(anyhow::anyhow!("first"))),
            )),
            PageRoute::filesystem("/pages/b", "/b")
                .with_route_file(RouteFile::string("/pages/b.page.route.rs", "b")),
        ];
        let mut ctx = PageContext::new("/", all_ids(&routes));
        let err = RouteMatcher::new(routes).route(&mut ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "first");
    }

    #[tokio::test]
    async fn test_hook_checked_before_page_count() {
        let hook = hook_fn(|_| Ok(HookOutcome::page("/pages/maintenance")));
        let mut ctx = PageContext::new("/", vec![]);
        let result = RouteMatcher::new(vec![]).with_hook(hook).route(&mut ctx).await.unwrap();
        assert_eq!(result.page_id.as_deref(), Some("/pages/maintenance"));
    }

    #[test]
    fn test_route_outside_runtime() {
        let routes = vec![PageRoute::filesystem("/pages/about", "/about")];
        let mut ctx = PageContext::new("/about", all_ids(&routes));
        let matcher = RouteMatcher::new(routes);

        let result = tokio_test::block_on(matcher.route(&mut ctx));
        let result = tokio_test::assert_ok!(result);
        assert_eq!(result.page_id.as_deref(), Some("/pages/about"));
    }

    #[tokio::test]
    async fn test_base_url_stripped_by_context() {
        let config = RouterConfig::default().with_base_url("/shop");
        let routes = vec![PageRoute::filesystem("/pages/cart", "/cart")];
        let matcher = RouteMatcher::new(routes.clone()).with_config(config.clone());

        let mut ctx = PageContext::from_url("/shop/cart", config.base_url.as_deref(), all_ids(&routes)).unwrap();
        let result = matcher.route(&mut ctx).await.unwrap();
        assert_eq!(result.page_id.as_deref(), Some("/pages/cart"));

        // The matcher doesn't strip the base itself
        let mut ctx = PageContext::new("/shop/cart", all_ids(&routes));
        assert!(matcher.route(&mut ctx).await.unwrap().page_id.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_pathname() {
        let routes = vec![PageRoute::filesystem("/pages/index", "/")];
        let mut ctx = PageContext::new("index", all_ids(&routes));
        let err = RouteMatcher::new(routes).route(&mut ctx).await.unwrap_err();
        assert!(matches!(err, RouterError::InvalidUrlPathname(_)));
    }
}
