//! Error types for page routing

use thiserror::Error;

/// Router error types
///
/// Everything except [`RouterError::Internal`] and [`RouterError::UserCode`]
/// is a usage error: the app's configuration is wrong and the message says
/// which file or value to fix.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The framework instance knows no page at all
    #[error("No page found. Create at least one page, e.g. `pages/index.page.rs`.")]
    NoPages,

    /// A route file exports neither a route string nor a route function
    #[error("`{file_path}` should export a route string or a route function, but it exports {found}")]
    InvalidRouteExport { file_path: String, found: String },

    /// A route string without leading slash
    #[error("A route string should start with a leading `/` but `{file_path}` has `{route_string}`. Use `/{route_string}` instead.")]
    RouteStringMissingSlash { file_path: String, route_string: String },

    /// A route string that can't be parsed
    #[error("Invalid route string `{route}`: {reason}")]
    MalformedRouteString { route: String, reason: String },

    /// A route function returned an unsupported value
    #[error("The route function of `{file_path}` {reason}")]
    InvalidRouteFunctionResult { file_path: String, reason: String },

    /// The onBeforeRoute() hook returned an unsupported value
    #[error("The onBeforeRoute() hook {0}")]
    InvalidHookResult(String),

    /// A URL pathname that doesn't start with `/`
    #[error("URL pathname should start with `/` but got `{0}`")]
    InvalidUrlPathname(String),

    /// A route file for a page id nobody knows
    #[error("Route file `{file_path}` belongs to unknown page `{page_id}`")]
    UnknownRoutePage { file_path: String, page_id: String },

    /// Error pages are rendered on failure and are never routed to
    #[error("Error page `{page_id}` shouldn't define a route, remove `{file_path}`")]
    ErrorPageRoute { file_path: String, page_id: String },

    /// Invariant violation inside the router or its caller
    #[error("Internal router error: {0}. This is a bug.")]
    Internal(String),

    /// Error raised by a route function or the onBeforeRoute() hook
    #[error(transparent)]
    UserCode(anyhow::Error),
}

impl RouterError {
    /// Whether this error points at the app's configuration
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, RouterError::Internal(_) | RouterError::UserCode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_classification() {
        assert!(RouterError::NoPages.is_usage_error());
        assert!(!RouterError::Internal("unreachable".to_string()).is_usage_error());
        assert!(!RouterError::UserCode(anyhow::anyhow!("db down")).is_usage_error());
    }

    #[test]
    fn test_user_code_error_is_transparent() {
        let err = RouterError::UserCode(anyhow::anyhow!("db down"));
        assert_eq!(err.to_string(), "db down");
    }

    #[test]
    fn test_route_string_message_names_file() {
        let err = RouterError::RouteStringMissingSlash {
            file_path: "/pages/about.page.route.rs".to_string(),
            route_string: "about".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/pages/about.page.route.rs"));
        assert!(msg.contains("`/about`"));
    }
}
