//! Export the passenger-routable edges of a network for visualization.
//!
//! Writes `[{edge_id, from: [x, y], to: [x, y], lanes}, …]` as JSON.
//!
//! Run with: `cargo run -p route-finder --bin export_edges -- --net data/test.net.xml`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use rf_core::{RunConfig, VehicleClass};
use rf_network::{load_net_xml, valid_edges};

/// Write the valid-edge table of a SUMO network as JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Road network (.net.xml); defaults to the route finder's network
    #[arg(long)]
    net: Option<PathBuf>,

    /// Output file
    #[arg(long, default_value = "output/valid_edges.json")]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let net_file = args.net.unwrap_or_else(|| RunConfig::default().net_file);

    let net = load_net_xml(&net_file).with_context(|| format!("loading {}", net_file.display()))?;
    let valid = valid_edges(&net, &VehicleClass::Passenger);

    let rows: Vec<serde_json::Value> = valid
        .iter()
        .filter_map(|id| net.edge(id.as_str()))
        .map(|e| {
            json!({
                "edge_id": e.id,
                "from":    e.from_pos.as_array(),
                "to":      e.to_pos.as_array(),
                "lanes":   e.lanes.len(),
            })
        })
        .collect();

    if let Some(dir) = args.out.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(&args.out, serde_json::to_string_pretty(&rows)?)?;
    println!("Wrote {} ({} of {} edges)", args.out.display(), rows.len(), net.edge_count());

    Ok(())
}
