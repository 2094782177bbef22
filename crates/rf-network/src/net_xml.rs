//! SUMO `.net.xml` loader.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use rf_network::load_net_xml;
//!
//! let network = load_net_xml(Path::new("data/test.net.xml"))?;
//! ```
//!
//! # What is loaded
//!
//! Only `<junction>` positions and `<edge>`/`<lane>` attributes are read;
//! traffic lights, connections, roundabouts and parameters are skipped.
//! Edges whose `function` is `internal`, `crossing` or `walkingarea` live
//! inside junctions and are not offered for routing, so they are dropped
//! as well (together with the `internal` junctions they hang off).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use rf_core::{LaneId, Permissions, Point2};

use crate::network::{Lane, RoadNetwork, RoadNetworkBuilder};
use crate::{NetworkError, NetworkResult};

// ── Raw XML records ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawNet {
    #[serde(rename = "edge", default)]
    edges:     Vec<RawEdge>,
    #[serde(rename = "junction", default)]
    junctions: Vec<RawJunction>,
}

#[derive(Deserialize)]
struct RawEdge {
    #[serde(rename = "@id")]
    id:       String,
    #[serde(rename = "@from")]
    from:     Option<String>,
    #[serde(rename = "@to")]
    to:       Option<String>,
    #[serde(rename = "@function")]
    function: Option<String>,
    #[serde(rename = "lane", default)]
    lanes:    Vec<RawLane>,
}

#[derive(Deserialize)]
struct RawLane {
    #[serde(rename = "@id")]
    id:       String,
    #[serde(rename = "@index")]
    index:    u32,
    #[serde(rename = "@speed")]
    speed:    f64,
    #[serde(rename = "@length")]
    length:   f64,
    #[serde(rename = "@allow")]
    allow:    Option<String>,
    #[serde(rename = "@disallow")]
    disallow: Option<String>,
    #[serde(rename = "@shape")]
    shape:    Option<String>,
}

#[derive(Deserialize)]
struct RawJunction {
    #[serde(rename = "@id")]
    id:            String,
    #[serde(rename = "@type")]
    junction_type: Option<String>,
    #[serde(rename = "@x")]
    x:             f64,
    #[serde(rename = "@y")]
    y:             f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a road network from a `.net.xml` file.
///
/// # Errors
///
/// [`NetworkError::Io`] if the file cannot be opened, [`NetworkError::Xml`]
/// on malformed XML, and the structural variants if edges reference missing
/// junctions or carry unparsable shapes.
pub fn load_net_xml(path: &Path) -> NetworkResult<RoadNetwork> {
    let file = File::open(path)?;
    let network = load_net_xml_reader(BufReader::new(file))?;
    log::info!(
        "loaded {}: {} edges, {} junctions",
        path.display(),
        network.edge_count(),
        network.junction_count()
    );
    Ok(network)
}

/// Like [`load_net_xml`] but accepts any `BufRead` source.
///
/// Useful for testing (pass a `&[u8]`).
pub fn load_net_xml_reader<R: BufRead>(reader: R) -> NetworkResult<RoadNetwork> {
    let raw: RawNet = quick_xml::de::from_reader(reader)?;

    let mut builder = RoadNetworkBuilder::with_capacity(raw.junctions.len(), raw.edges.len());
    for j in raw.junctions {
        if j.junction_type.as_deref() == Some("internal") {
            continue;
        }
        builder.add_junction(j.id, Point2::new(j.x, j.y));
    }

    for edge in raw.edges {
        if is_inner_function(edge.function.as_deref()) {
            continue;
        }
        let (Some(from), Some(to)) = (edge.from, edge.to) else {
            return Err(NetworkError::MissingEndpoint(edge.id.into()));
        };

        let lanes = edge
            .lanes
            .into_iter()
            .map(convert_lane)
            .collect::<NetworkResult<Vec<_>>>()?;

        builder.add_edge(edge.id, from, to, lanes)?;
    }

    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn is_inner_function(function: Option<&str>) -> bool {
    matches!(function, Some("internal" | "crossing" | "walkingarea"))
}

fn convert_lane(raw: RawLane) -> NetworkResult<Lane> {
    let shape = match &raw.shape {
        Some(s) => parse_shape(&raw.id, s)?,
        None => Vec::new(),
    };
    Ok(Lane {
        permissions: Permissions::from_attrs(raw.allow.as_deref(), raw.disallow.as_deref()),
        id: LaneId::new(raw.id),
        index: raw.index,
        speed: raw.speed,
        length: raw.length,
        shape,
    })
}

/// Parse a SUMO shape attribute: space-separated `x,y` (or `x,y,z`) pairs.
/// The z component is ignored.
pub(crate) fn parse_shape(owner: &str, value: &str) -> NetworkResult<Vec<Point2>> {
    let bad = || NetworkError::BadShape {
        owner: owner.to_owned(),
        value: value.to_owned(),
    };

    value
        .split_whitespace()
        .map(|pair| {
            let mut parts = pair.split(',');
            let x = parts.next().and_then(|v| v.parse::<f64>().ok()).ok_or_else(bad)?;
            let y = parts.next().and_then(|v| v.parse::<f64>().ok()).ok_or_else(bad)?;
            Ok(Point2::new(x, y))
        })
        .collect()
}
