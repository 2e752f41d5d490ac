//! SSR Core - Shared types for page routing
//!
//! This crate provides what both the route matcher and its callers
//! need to agree on:
//! - `PageContext` - the request as seen by routing
//! - `UrlParts` - pathname/search/hash computed from the original URL
//! - `RouterConfig` - routing configuration (env or manifest driven)

pub mod config;
pub mod context;
pub mod url;

pub use config::{ConfigError, RouterConfig, UnrankedFunctionPolicy};
pub use context::{PageContext, PageFile, PageId, RouteParams};
pub use url::{parse_url, UrlError, UrlParts};
