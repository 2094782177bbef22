//! Road network representation and builder.
//!
//! # Data layout
//!
//! Edges are stored in a `Vec` in the order they were added (file order for
//! networks read from `.net.xml`), with a `HashMap<EdgeId, usize>` for lookup
//! by SUMO ID.  File order is the tie-breaker wherever two edges compare
//! equal, which keeps every query deterministic.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) holds one entry per straight segment of every
//! edge's geometry.  Radius queries use the segment envelope to prune and
//! the exact point-to-segment distance to filter, then fold the segments of
//! the same edge into a single hit carrying the minimum distance.

use std::collections::{BTreeMap, HashMap};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rf_core::{EdgeId, JunctionId, LaneId, Permissions, Point2, VehicleClass};

use crate::{NetworkError, NetworkResult};

// ── R-tree segment entry ──────────────────────────────────────────────────────

/// Entry stored in the R-tree: one straight piece of an edge's geometry.
#[derive(Clone)]
struct SegmentEntry {
    a:    [f64; 2],
    b:    [f64; 2],
    edge: usize,
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a, self.b)
    }
}

impl PointDistance for SegmentEntry {
    /// Squared distance from the query point to the segment.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Point2::new(point[0], point[1]).distance_2_to_segment(
            Point2::new(self.a[0], self.a[1]),
            Point2::new(self.b[0], self.b[1]),
        )
    }
}

// ── Edge / Lane ───────────────────────────────────────────────────────────────

/// A lane of an edge.
#[derive(Clone, Debug)]
pub struct Lane {
    pub id: LaneId,
    /// 0 is the rightmost lane.
    pub index: u32,
    /// Speed limit in m/s.
    pub speed: f64,
    pub length: f64,
    pub permissions: Permissions,
    pub shape: Vec<Point2>,
}

impl Lane {
    #[inline]
    pub fn allows(&self, class: &VehicleClass) -> bool {
        self.permissions.allows(class)
    }
}

/// A directed road segment.  Immutable once the network is built.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: EdgeId,
    pub from: JunctionId,
    pub to: JunctionId,
    /// Position of the `from` junction.
    pub from_pos: Point2,
    /// Position of the `to` junction.
    pub to_pos: Point2,
    pub lanes: Vec<Lane>,
    /// Geometry used for spatial queries: `from_pos`, the lane centreline,
    /// `to_pos`.  At least two points.
    pub shape: Vec<Point2>,
}

impl Edge {
    /// `true` if at least one lane admits `class`.
    pub fn allows(&self, class: &VehicleClass) -> bool {
        self.lanes.iter().any(|l| l.allows(class))
    }

    /// Minimum distance from `point` to this edge's geometry.
    pub fn distance_to(&self, point: Point2) -> f64 {
        self.shape
            .windows(2)
            .map(|w| point.distance_2_to_segment(w[0], w[1]))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Queryable road network.  Do not construct directly; use
/// [`RoadNetworkBuilder`] or [`crate::load_net_xml`].
pub struct RoadNetwork {
    edges:        Vec<Edge>,
    edge_index:   HashMap<EdgeId, usize>,
    junction_pos: HashMap<JunctionId, Point2>,
    spatial_idx:  RTree<SegmentEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no junctions or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn junction_count(&self) -> usize {
        self.junction_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    pub fn junction_pos(&self, id: &str) -> Option<Point2> {
        self.junction_pos.get(id).copied()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Edges whose geometry lies within `radius` of `point`, with their
    /// distance, sorted by ascending distance (ties in insertion order).
    pub fn neighboring_edges(&self, point: Point2, radius: f64) -> Vec<(&Edge, f64)> {
        let mut best: BTreeMap<usize, f64> = BTreeMap::new();
        for seg in self
            .spatial_idx
            .locate_within_distance(point.as_array(), radius * radius)
        {
            let d2 = seg.distance_2(&point.as_array());
            best.entry(seg.edge)
                .and_modify(|cur| *cur = cur.min(d2))
                .or_insert(d2);
        }

        let mut hits: Vec<(&Edge, f64)> = best
            .into_iter()
            .map(|(i, d2)| (&self.edges[i], d2.sqrt()))
            .collect();
        // Stable sort keeps insertion order among equal distances.
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Junctions must be added before the edges that reference them.
///
/// # Example
///
/// ```
/// use rf_core::{Permissions, Point2};
/// use rf_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// b.add_junction("J0", Point2::new(0.0, 0.0));
/// b.add_junction("J1", Point2::new(100.0, 0.0));
/// b.add_simple_edge("E0", "J0", "J1", Permissions::All).unwrap();
/// let net = b.build();
/// assert_eq!(net.edge_count(), 1);
/// ```
pub struct RoadNetworkBuilder {
    edges:        Vec<Edge>,
    edge_index:   HashMap<EdgeId, usize>,
    junction_pos: HashMap<JunctionId, Point2>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            edges:        Vec::new(),
            edge_index:   HashMap::new(),
            junction_pos: HashMap::new(),
        }
    }

    /// Pre-allocate for the expected number of junctions and edges.
    pub fn with_capacity(junctions: usize, edges: usize) -> Self {
        Self {
            edges:        Vec::with_capacity(edges),
            edge_index:   HashMap::with_capacity(edges),
            junction_pos: HashMap::with_capacity(junctions),
        }
    }

    /// Add (or move) a junction.
    pub fn add_junction(&mut self, id: impl Into<JunctionId>, pos: Point2) {
        self.junction_pos.insert(id.into(), pos);
    }

    /// Add an edge.
    ///
    /// The geometry is derived from the lanes, capped by the two junction
    /// positions; lanes without a shape give the straight junction line.
    pub fn add_edge(
        &mut self,
        id: impl Into<EdgeId>,
        from: impl Into<JunctionId>,
        to: impl Into<JunctionId>,
        mut lanes: Vec<Lane>,
    ) -> NetworkResult<()> {
        let id = id.into();
        let from = from.into();
        let to = to.into();

        if self.edge_index.contains_key(&id) {
            return Err(NetworkError::DuplicateEdge(id));
        }
        let from_pos = self.lookup_junction(&id, &from)?;
        let to_pos = self.lookup_junction(&id, &to)?;

        lanes.sort_by_key(|l| l.index);
        let shape = edge_geometry(&lanes, from_pos, to_pos);

        self.edge_index.insert(id.clone(), self.edges.len());
        self.edges.push(Edge { id, from, to, from_pos, to_pos, lanes, shape });
        Ok(())
    }

    /// Convenience: a single-lane edge along the straight junction-to-junction
    /// line with the given permissions.
    pub fn add_simple_edge(
        &mut self,
        id: impl Into<EdgeId>,
        from: impl Into<JunctionId>,
        to: impl Into<JunctionId>,
        permissions: Permissions,
    ) -> NetworkResult<()> {
        let id = id.into();
        let lane = Lane {
            id: LaneId::new(format!("{id}_0")),
            index: 0,
            speed: 13.89,
            length: 0.0,
            permissions,
            shape: Vec::new(),
        };
        self.add_edge(id, from, to, vec![lane])
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn junction_count(&self) -> usize {
        self.junction_pos.len()
    }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// The R-tree is bulk-loaded in one pass (faster than per-segment inserts).
    pub fn build(self) -> RoadNetwork {
        let mut segments = Vec::new();
        for (i, edge) in self.edges.iter().enumerate() {
            for w in edge.shape.windows(2) {
                segments.push(SegmentEntry {
                    a:    w[0].as_array(),
                    b:    w[1].as_array(),
                    edge: i,
                });
            }
        }
        let spatial_idx = RTree::bulk_load(segments);

        RoadNetwork {
            edges:        self.edges,
            edge_index:   self.edge_index,
            junction_pos: self.junction_pos,
            spatial_idx,
        }
    }

    fn lookup_junction(&self, edge: &EdgeId, junction: &JunctionId) -> NetworkResult<Point2> {
        self.junction_pos
            .get(junction)
            .copied()
            .ok_or_else(|| NetworkError::UnknownJunction {
                edge:     edge.clone(),
                junction: junction.clone(),
            })
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Edge geometry as SUMO's own tools draw it: the from-junction, the lane
/// centreline, then the to-junction.
///
/// With an odd lane count the centreline is the middle lane's shape.  With
/// an even count it is the point-wise mean of every lane, over as many points
/// as the shortest lane has.  `lanes` must be sorted by index.
fn edge_geometry(lanes: &[Lane], from_pos: Point2, to_pos: Point2) -> Vec<Point2> {
    let mut shape = Vec::with_capacity(lanes.first().map_or(0, |l| l.shape.len()) + 2);
    shape.push(from_pos);
    shape.extend(lane_centreline(lanes));
    shape.push(to_pos);
    shape
}

fn lane_centreline(lanes: &[Lane]) -> Vec<Point2> {
    let n = lanes.len();
    if n % 2 == 1 {
        return lanes[n / 2].shape.clone();
    }
    let points = lanes.iter().map(|l| l.shape.len()).min().unwrap_or(0);
    (0..points)
        .map(|i| {
            let (x, y) = lanes
                .iter()
                .fold((0.0, 0.0), |(x, y), l| (x + l.shape[i].x, y + l.shape[i].y));
            Point2::new(x / n as f64, y / n as f64)
        })
        .collect()
}
