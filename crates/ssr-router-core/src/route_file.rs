//! Route files and page routes
//!
//! A page may have a route file next to it (`.page.route`) whose default
//! export is either a route string or a route function. The shape of the
//! export is checked once, when the [`RouteFile`] is built.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use ssr_core::PageId;

use crate::error::RouterError;
use crate::strategy::RouteFunction;
use crate::types::describe_value;

/// Raw default export of a route file
#[derive(Clone)]
pub enum RouteExport {
    Value(Value),
    Function(Arc<dyn RouteFunction>),
}

impl fmt::Debug for RouteExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteExport::Value(value) => f.debug_tuple("Value").field(value).finish(),
            RouteExport::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Validated route definition
#[derive(Clone)]
pub enum RouteDefinition {
    String(String),
    Function(Arc<dyn RouteFunction>),
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteDefinition::String(route) => f.debug_tuple("String").field(route).finish(),
            RouteDefinition::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// A page's route file
#[derive(Debug, Clone)]
pub struct RouteFile {
    pub file_path: String,
    pub definition: RouteDefinition,
}

impl RouteFile {
    /// Validate the default export of `file_path`
    pub fn from_export(file_path: impl Into<String>, export: RouteExport) -> Result<Self, RouterError> {
        let file_path = file_path.into();
        let definition = match export {
            RouteExport::Function(route_function) => RouteDefinition::Function(route_function),
            RouteExport::Value(Value::String(route)) => RouteDefinition::String(route),
            RouteExport::Value(other) => {
                return Err(RouterError::InvalidRouteExport {
                    file_path,
                    found: describe_value(&other),
                })
            }
        };
        Ok(Self { file_path, definition })
    }

    /// Route file exporting a route string
    pub fn string(file_path: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            definition: RouteDefinition::String(route.into()),
        }
    }

    /// Route file exporting a route function
    pub fn function(file_path: impl Into<String>, route_function: Arc<dyn RouteFunction>) -> Self {
        Self {
            file_path: file_path.into(),
            definition: RouteDefinition::Function(route_function),
        }
    }
}

/// Routing information about one page
#[derive(Debug, Clone)]
pub struct PageRoute {
    pub page_id: PageId,
    /// Route derived from the page's location, always present
    pub filesystem_route: String,
    /// Explicit route file, takes over from `filesystem_route`
    pub page_route_file: Option<RouteFile>,
}

impl PageRoute {
    /// Page routed by its location
    pub fn filesystem(page_id: impl Into<PageId>, filesystem_route: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
            filesystem_route: filesystem_route.into(),
            page_route_file: None,
        }
    }

    /// Attach a route file
    pub fn with_route_file(mut self, route_file: RouteFile) -> Self {
        self.page_route_file = Some(route_file);
        self
    }

    /// Serializable description, e.g. for debug output
    pub fn summary(&self) -> PageRouteSummary {
        PageRouteSummary {
            page_id: self.page_id.clone(),
            filesystem_route: self.filesystem_route.clone(),
            route_file: self.page_route_file.as_ref().map(|file| RouteFileSummary {
                file_path: file.file_path.clone(),
                route_value: match &file.definition {
                    RouteDefinition::String(route) => route.clone(),
                    RouteDefinition::Function(_) => "<function>".to_string(),
                },
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRouteSummary {
    pub page_id: PageId,
    pub filesystem_route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_file: Option<RouteFileSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteFileSummary {
    pub file_path: String,
    pub route_value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::route_fn;
    use serde_json::json;

    #[test]
    fn test_from_export_string() {
        let file = RouteFile::from_export("/pages/about.page.route.rs", RouteExport::Value(json!("/about"))).unwrap();
        assert!(matches!(file.definition, RouteDefinition::String(ref r) if r == "/about"));
    }

    #[test]
    fn test_from_export_function() {
        let export = RouteExport::Function(route_fn(|_| Ok(true.into())));
        let file = RouteFile::from_export("/pages/admin.page.route.rs", export).unwrap();
        assert!(matches!(file.definition, RouteDefinition::Function(_)));
    }

    #[test]
    fn test_from_export_rejects_other_values() {
        let err = RouteFile::from_export("/pages/x.page.route.rs", RouteExport::Value(json!(42))).unwrap_err();
        assert!(matches!(err, RouterError::InvalidRouteExport { .. }));
        let message = err.to_string();
        assert!(message.contains("/pages/x.page.route.rs"));
        assert!(message.contains("42"));

        assert!(RouteFile::from_export("/pages/y.page.route.rs", RouteExport::Value(json!({}))).is_err());
    }

    #[test]
    fn test_summary() {
        let route = PageRoute::filesystem("/pages/admin", "/admin")
            .with_route_file(RouteFile::function("/pages/admin.page.route.rs", route_fn(|_| Ok(false.into()))));
        assert_eq!(
            serde_json::to_value(route.summary()).unwrap(),
            json!({
                "pageId": "/pages/admin",
                "filesystemRoute": "/admin",
                "routeFile": { "filePath": "/pages/admin.page.route.rs", "routeValue": "<function>" }
            })
        );

        let plain = PageRoute::filesystem("/pages/index", "/").summary();
        assert!(plain.route_file.is_none());
    }
}
