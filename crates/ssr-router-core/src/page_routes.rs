//! Page route loading
//!
//! Builds the [`PageRoute`] list from what page discovery found: every page
//! id, the route files keyed by page id, and the filesystem routing roots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ssr_core::PageId;

use crate::error::RouterError;
use crate::route_file::{PageRoute, RouteFile};

/// Maps a directory to the URL prefix its pages are served under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesystemRoot {
    pub filesystem_root: String,
    pub url_root: String,
}

impl FilesystemRoot {
    pub fn new(filesystem_root: impl Into<String>, url_root: impl Into<String>) -> Self {
        Self {
            filesystem_root: filesystem_root.into(),
            url_root: url_root.into(),
        }
    }
}

const IGNORED_DIRECTORIES: [&str; 3] = ["pages", "src", "index"];

/// Whether the page is rendered on errors
pub fn is_error_page_id(page_id: &str) -> bool {
    page_id.rsplit('/').next() == Some("_error")
}

/// Whether the page holds `_default` files shared by all pages
pub fn is_default_page_id(page_id: &str) -> bool {
    page_id.split('/').any(|segment| segment == "_default")
}

/// The error page, if the app has one
pub fn get_error_page_id(all_page_ids: &[PageId]) -> Option<&PageId> {
    all_page_ids.iter().find(|page_id| is_error_page_id(page_id))
}

/// Derive the URL route of a page from its location.
///
/// The longest `filesystem_root` that contains the page is replaced by its
/// `url_root`. `pages`, `src` and `index` directories are dropped.
pub fn filesystem_route_from_page_id(page_id: &str, roots: &[FilesystemRoot]) -> String {
    let mut path = page_id.to_string();

    let root = roots
        .iter()
        .filter(|root| is_within(page_id, &root.filesystem_root))
        .max_by_key(|root| root.filesystem_root.len());
    if let Some(root) = root {
        let rest = &page_id[root.filesystem_root.trim_end_matches('/').len()..];
        path = format!("{}{}", root.url_root.trim_end_matches('/'), rest);
    }

    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !IGNORED_DIRECTORIES.contains(segment))
        .collect();
    format!("/{}", segments.join("/"))
}

fn is_within(page_id: &str, directory: &str) -> bool {
    let directory = directory.trim_end_matches('/');
    match page_id.strip_prefix(directory) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Build the page routes in declaration order.
///
/// Error and `_default` pages are not routable. A route file for a page
/// nobody knows, or for an error page, is rejected.
pub fn load_page_routes(
    all_page_ids: &[PageId],
    mut route_files: HashMap<PageId, RouteFile>,
    roots: &[FilesystemRoot],
) -> Result<Vec<PageRoute>, RouterError> {
    let mut page_routes = Vec::with_capacity(all_page_ids.len());

    for page_id in all_page_ids {
        let route_file = route_files.remove(page_id);

        if is_error_page_id(page_id) {
            if let Some(route_file) = route_file {
                return Err(RouterError::ErrorPageRoute {
                    file_path: route_file.file_path,
                    page_id: page_id.clone(),
                });
            }
            continue;
        }
        if is_default_page_id(page_id) {
            continue;
        }

        page_routes.push(PageRoute {
            page_id: page_id.clone(),
            filesystem_route: filesystem_route_from_page_id(page_id, roots),
            page_route_file: route_file,
        });
    }

    let mut unknown: Vec<(PageId, RouteFile)> = route_files.into_iter().collect();
    unknown.sort_by(|a, b| a.0.cmp(&b.0));
    if let Some((page_id, route_file)) = unknown.into_iter().next() {
        return Err(RouterError::UnknownRoutePage {
            file_path: route_file.file_path,
            page_id,
        });
    }

    debug!(pages = all_page_ids.len(), routes = page_routes.len(), "Loaded page routes");
    Ok(page_routes)
}
