//! Route queries.
//!
//! # Pluggability
//!
//! Callers go through the [`RouteService`] trait, so the sampler and the
//! entry point work the same against a long-lived [`TraciSession`], a
//! session-per-query [`PerQueryRouter`], or an in-memory fake in tests.
//!
//! # "No route" vs. failure
//!
//! `Ok(None)` means SUMO could not connect the two edges (empty stage, or
//! the query itself was rejected, e.g. for an edge the vehicle type may not
//! use).  `Err` means the session is unusable: the process died, the socket
//! broke, or the reply was malformed.

use rf_core::EdgeId;

use crate::session::{ServerConfig, TraciSession};
use crate::{SumoError, SumoResult};

/// Routing mode passed to `FIND_ROUTE`: plain travel-time routing.
const ROUTING_MODE_DEFAULT: i32 = 0;

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered, traversable edge sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Edges to traverse in order.  Never empty.
    pub edges: Vec<EdgeId>,
    /// Expected travel time in seconds.
    pub travel_time: f64,
    /// Length in metres.
    pub length: f64,
}

impl Route {
    /// Wrap an edge list; `None` when it is empty.
    pub fn from_edges(edges: Vec<EdgeId>) -> Option<Self> {
        if edges.is_empty() {
            return None;
        }
        Some(Route { edges, travel_time: 0.0, length: 0.0 })
    }

    /// Edge IDs joined by single spaces, as SUMO expects in `<route edges>`.
    pub fn edges_attr(&self) -> String {
        join_edges(&self.edges, " ")
    }

    /// Edge IDs joined by `" -> "` for console output.
    pub fn arrow_list(&self) -> String {
        join_edges(&self.edges, " -> ")
    }
}

fn join_edges(edges: &[EdgeId], sep: &str) -> String {
    edges.iter().map(EdgeId::as_str).collect::<Vec<_>>().join(sep)
}

// ── RouteService ──────────────────────────────────────────────────────────────

/// Something that can compute a route between two edges.
pub trait RouteService {
    fn find_route(&mut self, from: &EdgeId, to: &EdgeId, vtype: &str) -> SumoResult<Option<Route>>;
}

impl<S: RouteService + ?Sized> RouteService for &mut S {
    fn find_route(&mut self, from: &EdgeId, to: &EdgeId, vtype: &str) -> SumoResult<Option<Route>> {
        (**self).find_route(from, to, vtype)
    }
}

impl<S: RouteService + ?Sized> RouteService for Box<S> {
    fn find_route(&mut self, from: &EdgeId, to: &EdgeId, vtype: &str) -> SumoResult<Option<Route>> {
        (**self).find_route(from, to, vtype)
    }
}

impl RouteService for TraciSession {
    fn find_route(&mut self, from: &EdgeId, to: &EdgeId, vtype: &str) -> SumoResult<Option<Route>> {
        let stage = match TraciSession::find_route(
            self,
            from.as_str(),
            to.as_str(),
            vtype,
            0.0,
            ROUTING_MODE_DEFAULT,
        ) {
            Ok(stage) => stage,
            Err(SumoError::Command { message, .. }) => {
                log::debug!("route {from} → {to} rejected: {message}");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let edges = stage.edges.into_iter().map(EdgeId::from).collect();
        Ok(Route::from_edges(edges).map(|r| Route {
            travel_time: stage.travel_time,
            length: stage.length,
            ..r
        }))
    }
}

// ── PerQueryRouter ────────────────────────────────────────────────────────────

/// Opens a fresh session for every query and closes it before returning,
/// on success and on error alike.
///
/// Every query pays for starting SUMO and loading the network; prefer a
/// single [`TraciSession`] when issuing many queries.
pub struct PerQueryRouter {
    config: ServerConfig,
}

impl PerQueryRouter {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

impl RouteService for PerQueryRouter {
    fn find_route(&mut self, from: &EdgeId, to: &EdgeId, vtype: &str) -> SumoResult<Option<Route>> {
        let mut session = TraciSession::launch(&self.config)?;
        // `?` drops `session`, which closes it.
        let route = RouteService::find_route(&mut session, from, to, vtype)?;
        session.close()?;
        Ok(route)
    }
}
