//! onBeforeRoute() hook
//!
//! An app may register one hook that runs before any route strategy. The
//! hook either takes over routing entirely (`Override`), adjusts the
//! request before matching (`Rewrite`), or lets routing proceed (`NoOp`).

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use ssr_core::{PageContext, PageId, RouteParams};

use crate::error::RouterError;
use crate::types::{describe_value, route_params_from_value};

/// Trait for the onBeforeRoute() hook
#[async_trait]
pub trait OnBeforeRouteHook: Send + Sync {
    async fn call(&self, page_context: &PageContext) -> anyhow::Result<HookOutcome>;
}

/// What the hook decided
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// The hook decides routing; `page_id: None` means no page
    Override {
        page_id: Option<PageId>,
        route_params: Option<RouteParams>,
    },
    /// Adjust the request, then route as usual
    Rewrite {
        url_pathname: Option<String>,
        fields: Map<String, Value>,
    },
    /// Route as usual
    NoOp,
}

impl HookOutcome {
    /// Route to `page_id` without parameters
    pub fn page(page_id: impl Into<PageId>) -> Self {
        HookOutcome::Override {
            page_id: Some(page_id.into()),
            route_params: None,
        }
    }

    /// Route to no page at all
    pub fn no_page() -> Self {
        HookOutcome::Override {
            page_id: None,
            route_params: None,
        }
    }

    /// Match against another pathname
    pub fn rewrite(url_pathname: impl Into<String>) -> Self {
        HookOutcome::Rewrite {
            url_pathname: Some(url_pathname.into()),
            fields: Map::new(),
        }
    }

    /// Convert the loosely-typed return value of a hook.
    ///
    /// `_pageId` (string or null) overrides routing, optionally with
    /// `routeParams`. Otherwise `urlPathname` and any other key rewrite the
    /// request. `null` and `{}` do nothing.
    pub fn from_value(value: Value) -> Result<Self, RouterError> {
        let mut object = match value {
            Value::Null => return Ok(HookOutcome::NoOp),
            Value::Object(object) => object,
            other => {
                return Err(RouterError::InvalidHookResult(format!(
                    "should return `null` or an object, but it returns {}",
                    describe_value(&other)
                )))
            }
        };

        if let Some(page_id) = object.remove("_pageId") {
            let page_id = match page_id {
                Value::Null => None,
                Value::String(page_id) => Some(page_id),
                other => {
                    return Err(RouterError::InvalidHookResult(format!(
                        "returns `_pageId` as {} but it should be a string or `null`",
                        describe_value(&other)
                    )))
                }
            };
            let route_params = match object.get("routeParams") {
                None | Some(Value::Null) => None,
                Some(params) => Some(route_params_from_value(params).ok_or_else(|| {
                    RouterError::InvalidHookResult(
                        "returns `routeParams` that isn't an object of strings".to_string(),
                    )
                })?),
            };
            return Ok(HookOutcome::Override { page_id, route_params });
        }

        let url_pathname = match object.remove("urlPathname") {
            None | Some(Value::Null) => None,
            Some(Value::String(pathname)) => Some(pathname),
            Some(other) => {
                return Err(RouterError::InvalidHookResult(format!(
                    "returns `urlPathname` as {} but it should be a string",
                    describe_value(&other)
                )))
            }
        };

        if url_pathname.is_none() && object.is_empty() {
            return Ok(HookOutcome::NoOp);
        }
        Ok(HookOutcome::Rewrite {
            url_pathname,
            fields: object,
        })
    }
}

/// Hook backed by a synchronous closure
pub struct FnHook<F>(F);

#[async_trait]
impl<F> OnBeforeRouteHook for FnHook<F>
where
    F: Fn(&PageContext) -> anyhow::Result<HookOutcome> + Send + Sync,
{
    async fn call(&self, page_context: &PageContext) -> anyhow::Result<HookOutcome> {
        (self.0)(page_context)
    }
}

/// Hook backed by an async closure
pub struct AsyncFnHook<F>(F);

#[async_trait]
impl<F, Fut> OnBeforeRouteHook for AsyncFnHook<F>
where
    F: Fn(PageContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<HookOutcome>> + Send,
{
    async fn call(&self, page_context: &PageContext) -> anyhow::Result<HookOutcome> {
        (self.0)(page_context.clone()).await
    }
}

pub fn hook_fn<F>(f: F) -> Arc<dyn OnBeforeRouteHook>
where
    F: Fn(&PageContext) -> anyhow::Result<HookOutcome> + Send + Sync + 'static,
{
    Arc::new(FnHook(f))
}

pub fn async_hook_fn<F, Fut>(f: F) -> Arc<dyn OnBeforeRouteHook>
where
    F: Fn(PageContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<HookOutcome>> + Send + 'static,
{
    Arc::new(AsyncFnHook(f))
}

/// Run the hook and check its outcome
pub async fn call_on_before_route_hook(
    hook: &dyn OnBeforeRouteHook,
    page_context: &PageContext,
) -> Result<HookOutcome, RouterError> {
    let outcome = hook.call(page_context).await.map_err(RouterError::UserCode)?;

    if let HookOutcome::Rewrite {
        url_pathname: Some(pathname),
        ..
    } = &outcome
    {
        if !pathname.starts_with('/') {
            return Err(RouterError::InvalidUrlPathname(pathname.clone()));
        }
    }

    debug!(url = %page_context.url_pathname, outcome = ?outcome, "onBeforeRoute() hook returned");
    Ok(outcome)
}
