//! Route Function Strategy
//!
//! A route file may export a function instead of a route string. The
//! function sees the whole page context and decides on its own whether
//! its page matches, which parameters it captured, and optionally a
//! numeric precedence.
//!
//! Route functions are user code: an error they return is handed back to
//! the caller untouched, and a function that never completes stalls the
//! resolution (bound it with a timeout around `RouteMatcher::route` if
//! needed).

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use ssr_core::{PageContext, RouteParams};

use crate::error::RouterError;
use crate::types::{describe_value, route_params_from_value, Precedence};

/// Trait for user route functions
#[async_trait]
pub trait RouteFunction: Send + Sync {
    /// Decide whether the page matches the request
    async fn call(&self, page_context: &PageContext) -> anyhow::Result<RouteFunctionReturn>;
}

/// What a route function hands back
#[derive(Debug, Clone, PartialEq)]
pub enum RouteFunctionReturn {
    /// `true` matches without parameters, `false` doesn't match
    Bool(bool),
    /// Match with parameters and an optional precedence
    Match(RouteFunctionMatch),
    /// Loosely-typed result, validated before use
    Value(Value),
}

impl RouteFunctionReturn {
    /// No match
    pub fn no_match() -> Self {
        Self::Bool(false)
    }

    /// Match with the given parameters
    pub fn with_params(route_params: RouteParams) -> Self {
        Self::Match(RouteFunctionMatch {
            route_params,
            precedence: None,
        })
    }
}

impl From<bool> for RouteFunctionReturn {
    fn from(matched: bool) -> Self {
        Self::Bool(matched)
    }
}

impl From<RouteFunctionMatch> for RouteFunctionReturn {
    fn from(route_match: RouteFunctionMatch) -> Self {
        Self::Match(route_match)
    }
}

impl From<Value> for RouteFunctionReturn {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A successful route function match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteFunctionMatch {
    /// Captured parameters
    pub route_params: RouteParams,
    /// Precedence over other matches; `None` leaves ranking to the policy
    pub precedence: Option<Precedence>,
}

impl RouteFunctionMatch {
    pub fn new(route_params: RouteParams) -> Self {
        Self {
            route_params,
            precedence: None,
        }
    }

    /// Set the precedence
    pub fn with_precedence(mut self, precedence: impl Into<Precedence>) -> Self {
        self.precedence = Some(precedence.into());
        self
    }
}

/// Route function backed by a synchronous closure
pub struct FnRouteFunction<F>(F);

#[async_trait]
impl<F> RouteFunction for FnRouteFunction<F>
where
    F: Fn(&PageContext) -> anyhow::Result<RouteFunctionReturn> + Send + Sync,
{
    async fn call(&self, page_context: &PageContext) -> anyhow::Result<RouteFunctionReturn> {
        (self.0)(page_context)
    }
}

/// Route function backed by an async closure.
///
/// The closure receives its own copy of the page context.
pub struct AsyncFnRouteFunction<F>(F);

#[async_trait]
impl<F, Fut> RouteFunction for AsyncFnRouteFunction<F>
where
    F: Fn(PageContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<RouteFunctionReturn>> + Send,
{
    async fn call(&self, page_context: &PageContext) -> anyhow::Result<RouteFunctionReturn> {
        (self.0)(page_context.clone()).await
    }
}

/// Wrap a synchronous closure as a route function
pub fn route_fn<F>(f: F) -> Arc<dyn RouteFunction>
where
    F: Fn(&PageContext) -> anyhow::Result<RouteFunctionReturn> + Send + Sync + 'static,
{
    Arc::new(FnRouteFunction(f))
}

/// Wrap an async closure as a route function
pub fn async_route_fn<F, Fut>(f: F) -> Arc<dyn RouteFunction>
where
    F: Fn(PageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<RouteFunctionReturn>> + Send + 'static,
{
    Arc::new(AsyncFnRouteFunction(f))
}

/// Call a route function and normalize what it returned.
///
/// `file_path` names the route file in error messages.
pub async fn resolve_route_function(
    route_function: &dyn RouteFunction,
    page_context: &PageContext,
    file_path: &str,
) -> Result<Option<RouteFunctionMatch>, RouterError> {
    let returned = route_function
        .call(page_context)
        .await
        .map_err(RouterError::UserCode)?;

    let resolved = match returned {
        RouteFunctionReturn::Bool(false) => None,
        RouteFunctionReturn::Bool(true) => Some(RouteFunctionMatch::default()),
        RouteFunctionReturn::Match(route_match) => Some(route_match),
        RouteFunctionReturn::Value(value) => match_from_value(&value, file_path)?,
    };

    trace!(file = %file_path, matched = resolved.is_some(), "Route function evaluated");
    Ok(resolved)
}

fn match_from_value(value: &Value, file_path: &str) -> Result<Option<RouteFunctionMatch>, RouterError> {
    let invalid = |reason: String| RouterError::InvalidRouteFunctionResult {
        file_path: file_path.to_string(),
        reason,
    };

    let object = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::Bool(true) => return Ok(Some(RouteFunctionMatch::default())),
        Value::Object(object) => object,
        other => {
            return Err(invalid(format!(
                "should return a boolean or an object, but it returns {}",
                describe_value(other)
            )))
        }
    };

    match object.get("match") {
        None | Some(Value::Bool(true)) => {}
        Some(Value::Bool(false)) => return Ok(None),
        Some(other) => {
            return Err(invalid(format!(
                "returns `match` as {} but it should be a boolean",
                describe_value(other)
            )))
        }
    }

    let precedence = match object.get("precedence") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(Precedence(n.as_f64().ok_or_else(|| {
            invalid(format!("returns `precedence` as `{}` which isn't a finite number", n))
        })?)),
        Some(other) => {
            return Err(invalid(format!(
                "returns `precedence` as {} but it should be a number",
                describe_value(other)
            )))
        }
    };

    let route_params = match object.get("routeParams") {
        None | Some(Value::Null) => RouteParams::new(),
        Some(params) => route_params_from_value(params).ok_or_else(|| {
            invalid("returns `routeParams` that isn't an object of strings".to_string())
        })?,
    };

    Ok(Some(RouteFunctionMatch {
        route_params,
        precedence,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FILE: &str = "/pages/admin.page.route.rs";

    fn ctx(url: &str) -> PageContext {
        PageContext::new(url, vec!["/pages/admin".to_string()])
    }

    async fn resolve_value(value: Value) -> Result<Option<RouteFunctionMatch>, RouterError> {
        let f = route_fn(move |_| Ok(RouteFunctionReturn::Value(value.clone())));
        resolve_route_function(f.as_ref(), &ctx("/"), FILE).await
    }

    #[tokio::test]
    async fn test_bool_results() {
        let yes = route_fn(|ctx| Ok(ctx.url_pathname.starts_with("/admin").into()));
        let matched = resolve_route_function(yes.as_ref(), &ctx("/admin"), FILE).await.unwrap();
        assert_eq!(matched, Some(RouteFunctionMatch::default()));

        let none = resolve_route_function(yes.as_ref(), &ctx("/shop"), FILE).await.unwrap();
        assert_eq!(none, None);
    }

    #[tokio::test]
    async fn test_async_function_with_params() {
        let f = async_route_fn(|ctx: PageContext| async move {
            tokio::task::yield_now().await;
            let id = ctx.url_pathname.trim_start_matches("/u/").to_string();
            let mut params = RouteParams::new();
            params.insert("id".to_string(), id);
            Ok(RouteFunctionMatch::new(params).with_precedence(3).into())
        });

        let matched = resolve_route_function(f.as_ref(), &ctx("/u/ada"), FILE)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.route_params.get("id").map(String::as_str), Some("ada"));
        assert_eq!(matched.precedence, Some(Precedence::from(3)));
    }

    #[tokio::test]
    async fn test_loose_values() {
        assert_eq!(resolve_value(json!(null)).await.unwrap(), None);
        assert_eq!(resolve_value(json!({ "match": false })).await.unwrap(), None);

        let matched = resolve_value(json!({ "routeParams": { "slug": "a" }, "precedence": -1 }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.precedence, Some(Precedence::from(-1)));
        assert_eq!(matched.route_params.get("slug").map(String::as_str), Some("a"));
    }

    #[tokio::test]
    async fn test_fractional_and_large_precedence() {
        let matched = resolve_value(json!({ "precedence": 1.5 })).await.unwrap().unwrap();
        assert_eq!(matched.precedence, Some(Precedence(1.5)));

        let matched = resolve_value(json!({ "precedence": u64::MAX })).await.unwrap().unwrap();
        assert_eq!(matched.precedence, Some(Precedence(u64::MAX as f64)));
    }

    #[tokio::test]
    async fn test_invalid_values_name_the_file() {
        for value in [
            json!(42),
            json!("yes"),
            json!({ "precedence": "high" }),
            json!({ "routeParams": { "id": 1 } }),
            json!({ "match": "yes" }),
        ] {
            match resolve_value(value).await {
                Err(err @ RouterError::InvalidRouteFunctionResult { .. }) => {
                    assert!(err.to_string().contains(FILE));
                }
                other => panic!("expected invalid result error, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_user_error_propagates() {
        let f = route_fn(|_| Err(anyhow::anyhow!("session store unavailable")));
        let err = resolve_route_function(f.as_ref(), &ctx("/"), FILE).await.unwrap_err();
        assert!(matches!(err, RouterError::UserCode(_)));
        assert_eq!(err.to_string(), "session store unavailable");
    }
}
