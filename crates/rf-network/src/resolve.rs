//! Edge selection helpers: the valid-edge filter and the nearest-edge
//! resolver used to turn user input into routable edges.

use rf_core::{EdgeId, Point2, SearchRadius, VehicleClass};

use crate::network::{Edge, RoadNetwork};

/// IDs of every edge with at least one lane admitting `class`, in network
/// order.
pub fn valid_edges(network: &RoadNetwork, class: &VehicleClass) -> Vec<EdgeId> {
    network
        .edges()
        .iter()
        .filter(|e| e.allows(class))
        .map(|e| e.id.clone())
        .collect()
}

/// Closest edge to `point`, searched with an expanding radius.
///
/// The radius starts at `radius.initial` and doubles after every empty
/// query.  The last query is made at exactly `radius.max`, so any edge
/// within `radius.max` of `point` is found.  Returns `None` only when
/// nothing lies within that ceiling.
pub fn nearest_edge<'a>(
    network: &'a RoadNetwork,
    point: Point2,
    radius: SearchRadius,
) -> Option<&'a Edge> {
    let mut r = radius.initial.min(radius.max);
    loop {
        if let Some(&(edge, dist)) = network.neighboring_edges(point, r).first() {
            log::debug!("nearest edge to {point}: {} at {dist:.2} (radius {r})", edge.id);
            return Some(edge);
        }
        if r >= radius.max {
            log::debug!("no edge within {} of {point}", radius.max);
            return None;
        }
        r = (r * 2.0).min(radius.max);
    }
}
