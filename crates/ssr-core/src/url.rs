//! URL computation for routing
//!
//! Routing only ever looks at the pathname. This module splits the
//! original URL (absolute, or a path with query and hash) into the parts
//! the rest of the framework uses, and strips the configured base URL.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Origin used to resolve path-only URLs; never exposed.
const PLACEHOLDER_ORIGIN: &str = "http://localhost";

/// URL errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL should be absolute or start with `/` but got `{0}`")]
    NotRootRelative(String),

    #[error("Failed to parse URL `{url}`: {reason}")]
    Parse { url: String, reason: String },
}

/// Parts of a URL computed once per request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UrlParts {
    /// Scheme, host and port; `None` for path-only URLs
    pub origin: Option<String>,

    /// Decoded pathname with the base URL stripped; always starts with `/`
    pub pathname: String,

    /// Pathname as it appeared in the URL, still percent-encoded
    pub pathname_original: String,

    /// Decoded query parameters (last value wins)
    pub search: BTreeMap<String, String>,

    /// Raw query string without `?`
    pub search_original: Option<String>,

    /// Fragment without `#`; empty when absent
    pub hash: String,

    /// The pathname didn't start with the configured base URL
    pub is_base_missing: bool,
}

/// Split `url_original` into its parts, stripping `base_url` from the pathname.
pub fn parse_url(url_original: &str, base_url: Option<&str>) -> Result<UrlParts, UrlError> {
    let parse_err = |err: url::ParseError| UrlError::Parse {
        url: url_original.to_string(),
        reason: err.to_string(),
    };

    let (parsed, origin) = match Url::parse(url_original) {
        Ok(parsed) if parsed.has_host() => {
            let origin = parsed.origin().ascii_serialization();
            (parsed, Some(origin))
        }
        _ => {
            if !url_original.starts_with('/') {
                return Err(UrlError::NotRootRelative(url_original.to_string()));
            }
            let placeholder = Url::parse(PLACEHOLDER_ORIGIN).map_err(parse_err)?;
            (placeholder.join(url_original).map_err(parse_err)?, None)
        }
    };

    let pathname_original = parsed.path().to_string();
    let (pathname, is_base_missing) = strip_base_url(&decode_pathname(&pathname_original), base_url);

    let search = parsed
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    Ok(UrlParts {
        origin,
        pathname,
        pathname_original,
        search,
        search_original: parsed.query().map(str::to_string),
        hash: parsed.fragment().unwrap_or_default().to_string(),
        is_base_missing,
    })
}

/// Percent-decode each segment of `pathname`.
///
/// A segment that decodes to something containing `/` stays encoded so the
/// segment boundaries don't move.
fn decode_pathname(pathname: &str) -> String {
    pathname
        .split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            if decoded.contains('/') {
                segment.to_string()
            } else {
                decoded.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Remove `base_url` from the front of `pathname`.
///
/// Returns the stripped pathname and whether the base was missing.
fn strip_base_url(pathname: &str, base_url: Option<&str>) -> (String, bool) {
    let base = match base_url.map(|b| b.trim_end_matches('/')) {
        None | Some("") => return (pathname.to_string(), false),
        Some(base) => base,
    };

    match pathname.strip_prefix(base) {
        Some("") => ("/".to_string(), false),
        Some(rest) if rest.starts_with('/') => (rest.to_string(), false),
        _ => (pathname.to_string(), true),
    }
}
