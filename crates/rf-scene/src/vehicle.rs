//! Vehicle entries and the scene they make up.

use rf_core::EdgeId;
use rf_sumo::Route;

use crate::vtype::VehicleType;

/// ID of the vehicle driving the requested route.
pub const HIGHLIGHT_ID: &str = "route_highlight";

/// ID prefix of background vehicles: `random_vehicle_0`, `random_vehicle_1`, ...
pub const BACKGROUND_PREFIX: &str = "random_vehicle_";

/// One `<vehicle>` of the route file.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleEntry {
    pub id:     String,
    pub vtype:  &'static str,
    /// Departure time in seconds, non-negative.
    pub depart: f64,
    pub edges:  Vec<EdgeId>,
}

impl VehicleEntry {
    pub fn highlight(route: &Route, depart: f64) -> Self {
        VehicleEntry {
            id: HIGHLIGHT_ID.to_owned(),
            vtype: VehicleType::HIGHLIGHTED_CAR.id,
            depart,
            edges: route.edges.clone(),
        }
    }

    /// The `n`-th background vehicle.
    pub fn background(n: usize, route: Route, depart: f64) -> Self {
        VehicleEntry {
            id: format!("{BACKGROUND_PREFIX}{n}"),
            vtype: VehicleType::CAR.id,
            depart,
            edges: route.edges,
        }
    }

    /// `depart` attribute: one decimal, with a whole second written bare
    /// (`2`, `17.3`).
    pub fn depart_attr(&self) -> String {
        let s = format!("{:.1}", self.depart);
        match s.strip_suffix(".0") {
            Some(whole) => whole.to_owned(),
            None => s,
        }
    }

    /// `edges` attribute of the nested `<route>`.
    pub fn edges_attr(&self) -> String {
        self.edges.iter().map(EdgeId::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// The highlighted vehicle plus whatever background traffic was sampled.
#[derive(Clone, Debug)]
pub struct Scene {
    highlight:  VehicleEntry,
    background: Vec<VehicleEntry>,
}

impl Scene {
    pub fn new(highlight: &Route, depart: f64) -> Self {
        Scene { highlight: VehicleEntry::highlight(highlight, depart), background: Vec::new() }
    }

    pub fn with_background(mut self, vehicles: Vec<VehicleEntry>) -> Self {
        self.background.extend(vehicles);
        self
    }

    pub fn highlight(&self) -> &VehicleEntry {
        &self.highlight
    }

    pub fn background(&self) -> &[VehicleEntry] {
        &self.background
    }

    /// Edges of the highlighted route, each once, in route order.
    pub fn highlight_edges(&self) -> Vec<&EdgeId> {
        let mut seen = std::collections::HashSet::new();
        self.highlight.edges.iter().filter(|e| seen.insert(*e)).collect()
    }

    /// All vehicles ascending by departure.  Ties keep insertion order, with
    /// the highlighted vehicle first.
    pub fn sorted_vehicles(&self) -> Vec<&VehicleEntry> {
        let mut all: Vec<&VehicleEntry> =
            std::iter::once(&self.highlight).chain(&self.background).collect();
        all.sort_by(|a, b| a.depart.total_cmp(&b.depart));
        all
    }

    /// Highlight included.
    pub fn vehicle_count(&self) -> usize {
        1 + self.background.len()
    }
}
