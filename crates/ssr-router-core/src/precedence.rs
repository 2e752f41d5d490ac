//! Precedence Resolution
//!
//! Several pages may match the same URL. The matches are ordered so that
//! the first one wins:
//!
//! ```text
//!  Tier  Matches                          Within the tier
//!  0     FUNCTION with a precedence       higher precedence first
//!  1     FUNCTION without (above policy)  declaration order
//!  2     STRING                           static, fewer wildcards, fewer
//!                                         optionals, longer literal prefix
//!  3     FILESYSTEM                       fewer parameterized segments
//!  4     FUNCTION without (below policy)  declaration order
//! ```
//!
//! The sort is stable, so any remaining tie keeps declaration order.

use std::cmp::Reverse;

use ssr_core::UnrankedFunctionPolicy;

use crate::strategy::{parameterized_segment_count, PathPattern, RouteString};
use crate::types::{Precedence, RouteMatch, RouteType};

/// Sort key; smaller sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    tier: u8,
    precedence: Reverse<Precedence>,
    dynamic: bool,
    wildcards: usize,
    optionals: usize,
    literal_prefix: Reverse<usize>,
    parameterized: usize,
}

impl RankKey {
    fn tier(tier: u8) -> Self {
        Self {
            tier,
            precedence: Reverse(Precedence(0.0)),
            dynamic: false,
            wildcards: 0,
            optionals: 0,
            literal_prefix: Reverse(0),
            parameterized: 0,
        }
    }
}

fn rank_key(route_match: &RouteMatch, policy: UnrankedFunctionPolicy) -> RankKey {
    match route_match.route_type {
        RouteType::Function => match route_match.precedence {
            Some(precedence) => RankKey {
                precedence: Reverse(precedence),
                ..RankKey::tier(0)
            },
            None => match policy {
                UnrankedFunctionPolicy::AboveDeclarative => RankKey::tier(1),
                UnrankedFunctionPolicy::BelowDeclarative => RankKey::tier(4),
            },
        },
        RouteType::String => {
            // Already validated while matching
            let specificity = route_match
                .route_string
                .as_deref()
                .and_then(|route| RouteString::parse(route).ok())
                .map(|route| route.specificity())
                .unwrap_or_default();
            RankKey {
                dynamic: !specificity.is_static(),
                wildcards: specificity.wildcards,
                optionals: specificity.optionals,
                literal_prefix: Reverse(specificity.literal_prefix),
                ..RankKey::tier(2)
            }
        }
        RouteType::Filesystem => RankKey {
            parameterized: route_match
                .filesystem_route
                .as_deref()
                .map(parameterized_segment_count)
                .unwrap_or(0),
            ..RankKey::tier(3)
        },
    }
}

/// Order `route_matches` so that the winner comes first
pub fn resolve_precedence(route_matches: &mut [RouteMatch], policy: UnrankedFunctionPolicy) {
    route_matches.sort_by_cached_key(|route_match| rank_key(route_match, policy));
}
