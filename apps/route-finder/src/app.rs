//! The interactive run: pick two edges, route between them, populate the
//! scene, write the files.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use rf_core::{EdgeId, RunConfig, SimRng, VehicleClass};
use rf_network::{nearest_edge, valid_edges, RoadNetwork};
use rf_scene::{write_scene, BackgroundSampler, SampleReport, Scene};
use rf_sumo::{PerQueryRouter, RouteService, ServerConfig, SumoResult, TraciSession};

use crate::prompt::{Console, LocationInput};

// ── Route sessions ────────────────────────────────────────────────────────────

/// Opens route services.  Whatever `open` returns is released when dropped.
pub trait SessionFactory {
    fn open(&mut self) -> SumoResult<Box<dyn RouteService>>;
}

/// Headless SUMO behind TraCI.
pub struct SumoSessions {
    server:    ServerConfig,
    per_query: bool,
}

impl SumoSessions {
    /// With `per_query`, every route request starts and stops its own SUMO
    /// process; otherwise one process serves everything asked of a single
    /// `open`.
    pub fn new(server: ServerConfig, per_query: bool) -> Self {
        Self { server, per_query }
    }
}

impl SessionFactory for SumoSessions {
    fn open(&mut self) -> SumoResult<Box<dyn RouteService>> {
        if self.per_query {
            Ok(Box::new(PerQueryRouter::new(self.server.clone())))
        } else {
            Ok(Box::new(TraciSession::launch(&self.server)?))
        }
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// Locations given on the command line instead of at the prompt.
#[derive(Clone, Debug, Default)]
pub struct Presets {
    pub start: Option<String>,
    pub end:   Option<String>,
}

/// How a run ended.  Only `Written` touches the filesystem.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Written { vehicles: usize },
    InvalidStart,
    InvalidDestination,
    NoRoute,
}

pub fn run<F, R, W>(
    config:   &RunConfig,
    network:  &RoadNetwork,
    presets:  &Presets,
    sessions: &mut F,
    console:  &mut Console<R, W>,
    rng:      &mut SimRng,
) -> Result<Outcome>
where
    F: SessionFactory + ?Sized,
    R: BufRead,
    W: Write,
{
    let valid = valid_edges(network, &VehicleClass::Passenger);
    print_edge_table(console, network, &valid)?;
    console.say(format!("\nFound {} valid edges for routing", valid.len()))?;

    // 1. Endpoints.
    console.say("\nPlease enter coordinates (or edge IDs):")?;
    let input = console.location("start", presets.start.as_deref())?;
    let Some(start) = resolve_location(&input, network, &valid, config) else {
        console.say("Error: Invalid start location")?;
        return Ok(Outcome::InvalidStart);
    };
    console.say(format!("Selected start edge: {start}"))?;

    let input = console.location("destination", presets.end.as_deref())?;
    let Some(end) = resolve_location(&input, network, &valid, config) else {
        console.say("Error: Invalid destination location")?;
        return Ok(Outcome::InvalidDestination);
    };
    console.say(format!("Selected destination edge: {end}"))?;

    // 2. Primary route, on a session of its own.
    let route = {
        let mut service = sessions.open().context("opening routing session")?;
        service.find_route(&start, &end, &config.routing_vtype)?
    };
    let Some(route) = route else {
        console.say("\nNo route found between selected locations")?;
        return Ok(Outcome::NoRoute);
    };
    console.say(format!("\nRoute found! Edges: {}", route.arrow_list()))?;

    // 3. Background traffic.
    console.say(format!("Creating routes with {} valid edges", valid.len()))?;
    let sampler = BackgroundSampler {
        target:       config.background_vehicles,
        max_attempts: config.max_attempts,
        window_secs:  config.departure_window_secs,
        vtype:        config.routing_vtype.clone(),
    };
    // No session unless there is something to ask for.
    let report = if sampler.target == 0 || sampler.max_attempts == 0 || valid.is_empty() {
        SampleReport::default()
    } else {
        let mut service = sessions.open().context("opening routing session")?;
        let mut added = 0usize;
        sampler.sample(&mut service, &valid, rng, |v| {
            let line = format!("Added random vehicle {added}: {}", v.edges_attr());
            if let Err(e) = console.say(line) {
                log::warn!("console write failed: {e}");
            }
            added += 1;
        })?
    };
    console.say(format!(
        "Successfully added {} random vehicles after {} attempts",
        report.added(),
        report.attempts
    ))?;

    // 4. Files.
    let scene = Scene::new(&route, config.highlight_depart_secs).with_background(report.vehicles);
    write_scene(&config.routes_out, &config.settings_out, &scene).with_context(|| {
        format!(
            "writing {} and {}",
            config.routes_out.display(),
            config.settings_out.display()
        )
    })?;

    Ok(Outcome::Written { vehicles: scene.vehicle_count() })
}

/// Turn user input into a routable edge.
///
/// Coordinates snap to the nearest edge within the search ceiling; an edge
/// ID is accepted only if it is in `valid`.
pub fn resolve_location(
    input:   &LocationInput,
    network: &RoadNetwork,
    valid:   &[EdgeId],
    config:  &RunConfig,
) -> Option<EdgeId> {
    match input {
        LocationInput::Coordinate(p) => {
            nearest_edge(network, *p, config.search_radius).map(|e| e.id.clone())
        }
        LocationInput::EdgeId(id) => valid.contains(id).then(|| id.clone()),
    }
}

fn print_edge_table<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    network: &RoadNetwork,
    valid:   &[EdgeId],
) -> Result<()> {
    console.say("\nAvailable edges and their coordinates:")?;
    console.say("ID\t\tStart(x,y)\t\tEnd(x,y)")?;
    console.say("-".repeat(50))?;
    for id in valid {
        let Some(edge) = network.edge(id.as_str()) else { continue };
        let (a, b) = (edge.from_pos, edge.to_pos);
        console.say(format!(
            "{:<15} ({:.1},{:.1})\t\t({:.1},{:.1})",
            edge.id.as_str(),
            a.x,
            a.y,
            b.x,
            b.y
        ))?;
    }
    Ok(())
}
