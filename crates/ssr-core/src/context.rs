//! Request context seen by routing

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::url::{parse_url, UrlError, UrlParts};

/// Page identifier (e.g. `/pages/product/@id`)
pub type PageId = String;

/// Named values captured from dynamic URL segments
pub type RouteParams = BTreeMap<String, String>;

/// A page file known to the framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFile {
    /// Path of the file relative to the project root
    pub file_path: String,

    /// Page the file belongs to; `None` for `_default` files shared by all pages
    pub page_id: Option<PageId>,
}

impl PageFile {
    pub fn new(file_path: impl Into<String>, page_id: Option<PageId>) -> Self {
        Self {
            file_path: file_path.into(),
            page_id,
        }
    }

    /// Whether this file applies to every page
    pub fn is_default_page_file(&self) -> bool {
        self.page_id.is_none()
    }
}

/// The request as seen by routing.
///
/// Owned by the caller. Routing reads it, except that an
/// `onBeforeRoute` hook may rewrite `url_pathname` and add fields
/// before the route strategies run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// URL as received
    pub url_original: String,

    /// Pathname routing matches against; always starts with `/`
    pub url_pathname: String,

    /// Parts computed from `url_original`
    pub url_parsed: UrlParts,

    /// Every known page id
    #[serde(rename = "_allPageIds")]
    pub all_page_ids: Vec<PageId>,

    /// Every known page file
    #[serde(rename = "_pageFilesAll")]
    pub page_files_all: Vec<PageFile>,

    /// Additional fields provided by the caller or by the `onBeforeRoute` hook
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PageContext {
    /// Create a context for an already computed pathname
    pub fn new(url_pathname: impl Into<String>, all_page_ids: Vec<PageId>) -> Self {
        let url_pathname = url_pathname.into();
        Self {
            url_original: url_pathname.clone(),
            url_parsed: UrlParts {
                pathname: url_pathname.clone(),
                pathname_original: url_pathname.clone(),
                ..Default::default()
            },
            url_pathname,
            all_page_ids,
            page_files_all: vec![],
            fields: Map::new(),
        }
    }

    /// Create a context from the original URL, computing its pathname
    pub fn from_url(
        url_original: impl Into<String>,
        base_url: Option<&str>,
        all_page_ids: Vec<PageId>,
    ) -> Result<Self, UrlError> {
        let url_original = url_original.into();
        let url_parsed = parse_url(&url_original, base_url)?;
        Ok(Self {
            url_pathname: url_parsed.pathname.clone(),
            url_original,
            url_parsed,
            all_page_ids,
            page_files_all: vec![],
            fields: Map::new(),
        })
    }

    /// Attach the known page files
    pub fn with_page_files(mut self, page_files: Vec<PageFile>) -> Self {
        self.page_files_all = page_files;
        self
    }

    /// Attach an additional field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Get an additional field by name
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a query parameter by name
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.url_parsed.search.get(name).map(String::as_str)
    }
}
