//! SSR Router Core - Page Route Resolution
//!
//! Decides which page renders a request URL.
//!
//! # Architecture
//!
//! ```text
//! PageContext (URL + page ids)
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │  onBeforeRoute() hook   │  Optional: override or rewrite
//! └───────────┬─────────────┘
//!             │
//!             ▼
//! ┌─────────────────────────┐
//! │      RouteMatcher       │  Tries every page route concurrently
//! └───────────┬─────────────┘
//!             │
//!             ▼
//! ┌─────────────────────────┐
//! │       Precedence        │  Orders matches, first one wins
//! └─────────────────────────┘
//! ```
//!
//! # Routing Strategies
//!
//! - **FilesystemRoute**: pattern derived from the page location (`/users/@id`)
//! - **RouteString**: pattern exported by a route file (`/blog/:slug`)
//! - **RouteFunction**: user code exported by a route file
//!
//! # Example
//!
//! ```rust,ignore
//! use ssr_router_core::{PageRoute, RouteMatcher};
//! use ssr_core::PageContext;
//!
//! let routes = vec![PageRoute::filesystem("/pages/users/@id", "/users/@id")];
//! let matcher = RouteMatcher::new(routes);
//!
//! let mut ctx = PageContext::new("/users/42", vec!["/pages/users/@id".to_string()]);
//! let result = matcher.route(&mut ctx).await?;
//! assert_eq!(result.route_params["id"], "42");
//! ```

// Core modules
mod error;
mod types;
mod result;

// Strategy module (contains all route strategies)
mod strategy;

// Routing
mod hook;
mod observer;
mod page_routes;
mod precedence;
mod route_file;
mod route_matcher;


// Re-exports: Error types
pub use error::RouterError;

// Re-exports: Core types
pub use types::{Precedence, RouteMatch, RouteMatches, RouteType, CUSTOM_ROUTE};
pub use result::{ResolutionBuilder, ResolutionResult};

// Re-exports: Strategies
pub use strategy::{
    async_route_fn, is_parameterized_filesystem_route, is_static_route_string,
    parameterized_segment_count, resolve_filesystem_route, resolve_route_function,
    resolve_route_string, route_fn, AsyncFnRouteFunction, FilesystemRoute, FnRouteFunction,
    PathPattern, RouteFunction, RouteFunctionMatch, RouteFunctionReturn, RouteString, Segment,
    Specificity,
};

// Re-exports: Hook
pub use hook::{
    async_hook_fn, call_on_before_route_hook, hook_fn, AsyncFnHook, FnHook, HookOutcome,
    OnBeforeRouteHook,
};

// Re-exports: Page routes
pub use page_routes::{
    filesystem_route_from_page_id, get_error_page_id, is_default_page_id, is_error_page_id,
    load_page_routes, FilesystemRoot,
};
pub use route_file::{PageRoute, PageRouteSummary, RouteDefinition, RouteExport, RouteFile, RouteFileSummary};

// Re-exports: Matching
pub use observer::{RecordingObserver, RouteEvent, RouteObserver, TracingObserver};
pub use precedence::resolve_precedence;
pub use route_matcher::RouteMatcher;
