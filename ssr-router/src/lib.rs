//! SSR Router - Manifest-driven URL resolution
//!
//! Loads a JSON page manifest and resolves URLs against it:
//! - `pages`: every page id, optionally with the route string its route
//!   file exports
//! - `filesystem_roots`: directory → URL prefix mappings
//! - `rewrites`: pathname rewrites applied by an onBeforeRoute() hook
//! - `config`: router configuration
//!
//! ```json
//! {
//!   "pages": [
//!     { "page_id": "/pages/index" },
//!     { "page_id": "/pages/product/@id", "route": "/p/:id" }
//!   ],
//!   "rewrites": { "/home": "/" },
//!   "config": { "base_url": "/shop" }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use ssr_core::{ConfigError, PageContext, PageId, RouterConfig, UrlError};
use ssr_router_core::{
    hook_fn, load_page_routes, FilesystemRoot, HookOutcome, PageRoute, ResolutionResult, RouteExport, RouteFile,
    RouteMatcher, RouterError,
};

/// Manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    Url(#[from] UrlError),

    #[error(transparent)]
    Router(#[from] RouterError),
}

/// A page as listed in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestPage {
    pub page_id: PageId,

    /// Default export of the page's route file, if it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Value>,

    /// Path of the route file, derived from the page id when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_file: Option<String>,
}

impl ManifestPage {
    fn route_file_path(&self) -> String {
        self.route_file
            .clone()
            .unwrap_or_else(|| format!("{}.page.route.json", self.page_id))
    }
}

/// Page manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub pages: Vec<ManifestPage>,

    #[serde(default)]
    pub filesystem_roots: Vec<FilesystemRoot>,

    /// Exact pathname rewrites, applied before matching
    #[serde(default)]
    pub rewrites: BTreeMap<String, String>,

    #[serde(default)]
    pub config: RouterConfig,
}

impl Manifest {
    /// Parse a manifest from JSON
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        manifest.config.validate()?;
        Ok(manifest)
    }

    /// Every page id, in declaration order
    pub fn page_ids(&self) -> Vec<PageId> {
        self.pages.iter().map(|page| page.page_id.clone()).collect()
    }

    /// Build the page routes
    pub fn page_routes(&self) -> Result<Vec<PageRoute>, ManifestError> {
        let mut route_files = HashMap::new();
        for page in &self.pages {
            if let Some(route) = &page.route {
                let route_file = RouteFile::from_export(page.route_file_path(), RouteExport::Value(route.clone()))?;
                route_files.insert(page.page_id.clone(), route_file);
            }
        }
        Ok(load_page_routes(&self.page_ids(), route_files, &self.filesystem_roots)?)
    }

    /// Build a route matcher for this manifest
    pub fn route_matcher(&self) -> Result<RouteMatcher, ManifestError> {
        let mut matcher = RouteMatcher::new(self.page_routes()?).with_config(self.config.clone());

        if !self.rewrites.is_empty() {
            let rewrites = self.rewrites.clone();
            matcher = matcher.with_hook(hook_fn(move |ctx| {
                Ok(match rewrites.get(&ctx.url_pathname) {
                    Some(target) => HookOutcome::rewrite(target.clone()),
                    None => HookOutcome::NoOp,
                })
            }));
        }

        Ok(matcher)
    }
}

/// Load a manifest file
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = Manifest::from_json(&json)?;
    info!(path = %path.display(), pages = manifest.pages.len(), "Loaded page manifest");
    Ok(manifest)
}

/// A resolved URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlResolution {
    pub url: String,
    pub result: ResolutionResult,
}

/// Resolve every URL against the manifest, in order
pub async fn resolve_urls(manifest: &Manifest, urls: &[String]) -> Result<Vec<UrlResolution>, ManifestError> {
    let matcher = Arc::new(manifest.route_matcher()?);
    let page_ids = manifest.page_ids();
    let base_url = manifest.config.base_url.as_deref();

    let mut resolutions = Vec::with_capacity(urls.len());
    for url in urls {
        let mut ctx = PageContext::from_url(url.as_str(), base_url, page_ids.clone())?;
        let result = matcher.route(&mut ctx).await?;
        info!(url = %url, page_id = ?result.page_id, "Resolved");
        resolutions.push(UrlResolution {
            url: url.clone(),
            result,
        });
    }
    Ok(resolutions)
}
