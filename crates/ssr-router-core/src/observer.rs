//! Routing observers
//!
//! The route matcher reports the page routes it works with and the
//! ordered matches it computed. [`TracingObserver`] logs them and is the
//! default; [`RecordingObserver`] keeps them for inspection.

use parking_lot::Mutex;
use tracing::debug;

use crate::route_file::{PageRoute, PageRouteSummary};
use crate::types::RouteMatch;

/// Receives routing events; every method defaults to doing nothing
pub trait RouteObserver: Send + Sync {
    /// The page routes of the current resolution are known
    fn on_page_routes(&self, _page_routes: &[PageRoute]) {}

    /// Matches for `url_pathname` were ordered, winner first
    fn on_route_matches(&self, _url_pathname: &str, _route_matches: &[RouteMatch]) {}
}

/// Logs routing events at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RouteObserver for TracingObserver {
    fn on_page_routes(&self, page_routes: &[PageRoute]) {
        debug!(count = page_routes.len(), "Page routes");
        for page_route in page_routes {
            debug!(
                page_id = %page_route.page_id,
                filesystem_route = %page_route.filesystem_route,
                route_file = ?page_route.page_route_file.as_ref().map(|f| f.file_path.as_str()),
                "Page route"
            );
        }
    }

    fn on_route_matches(&self, url_pathname: &str, route_matches: &[RouteMatch]) {
        debug!(
            url = %url_pathname,
            matches = route_matches.len(),
            winner = ?route_matches.first().map(|m| m.page_id.as_str()),
            "Route matches"
        );
    }
}

/// A recorded routing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEvent {
    PageRoutes(Vec<PageRouteSummary>),
    RouteMatches {
        url_pathname: String,
        route_matches: Vec<RouteMatch>,
    },
}

/// Keeps every routing event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RouteEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first
    pub fn events(&self) -> Vec<RouteEvent> {
        self.events.lock().clone()
    }

    /// The most recent ordered match list
    pub fn last_route_matches(&self) -> Option<Vec<RouteMatch>> {
        self.events.lock().iter().rev().find_map(|event| match event {
            RouteEvent::RouteMatches { route_matches, .. } => Some(route_matches.clone()),
            RouteEvent::PageRoutes(_) => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl RouteObserver for RecordingObserver {
    fn on_page_routes(&self, page_routes: &[PageRoute]) {
        let summaries = page_routes.iter().map(PageRoute::summary).collect();
        self.events.lock().push(RouteEvent::PageRoutes(summaries));
    }

    fn on_route_matches(&self, url_pathname: &str, route_matches: &[RouteMatch]) {
        self.events.lock().push(RouteEvent::RouteMatches {
            url_pathname: url_pathname.to_string(),
            route_matches: route_matches.to_vec(),
        });
    }
}
