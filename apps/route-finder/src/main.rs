//! route_finder — route between two points of a SUMO network and watch it.
//!
//! Asks for a start and a destination (coordinates or edge IDs), has SUMO
//! route between them, adds random background traffic, writes a route file
//! plus a view-settings file highlighting the route, and opens `sumo-gui`.
//!
//! Requires `SUMO_HOME`.  Set `RUST_LOG=debug` to trace TraCI traffic.

mod app;
mod prompt;

#[cfg(test)]
mod tests;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use rf_core::{RunConfig, SimRng};
use rf_network::load_net_xml;
use rf_sumo::{GuiLauncher, ServerConfig, SumoHome};

use app::{Outcome, Presets, SumoSessions};
use prompt::Console;

/// Find a route in a SUMO network and show it in sumo-gui with background traffic
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON run configuration; the flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Road network (.net.xml)
    #[arg(long)]
    net: Option<PathBuf>,

    /// Route file to write
    #[arg(long)]
    routes_out: Option<PathBuf>,

    /// View-settings file to write
    #[arg(long)]
    settings_out: Option<PathBuf>,

    /// Background vehicles to add
    #[arg(long)]
    vehicles: Option<usize>,

    /// Route requests allowed while adding background vehicles
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Seed for background traffic
    #[arg(long)]
    seed: Option<u64>,

    /// Start a fresh SUMO process for every background route request
    #[arg(long)]
    session_per_query: bool,

    /// Write the files but do not open sumo-gui
    #[arg(long)]
    no_gui: bool,

    /// Start location, "x,y" or an edge ID (skips the prompt)
    #[arg(long, allow_hyphen_values = true)]
    start: Option<String>,

    /// Destination, "x,y" or an edge ID (skips the prompt)
    #[arg(long, allow_hyphen_values = true)]
    end: Option<String>,
}

impl Args {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(p) = &self.net {
            config.net_file = p.clone();
        }
        if let Some(p) = &self.routes_out {
            config.routes_out = p.clone();
        }
        if let Some(p) = &self.settings_out {
            config.settings_out = p.clone();
        }
        if let Some(n) = self.vehicles {
            config.background_vehicles = n;
        }
        if let Some(n) = self.max_attempts {
            config.max_attempts = n;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.session_per_query |= self.session_per_query;
        config.launch_gui &= !self.no_gui;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();
    let sumo = SumoHome::from_env()?;
    let config = args.run_config()?;

    let network = load_net_xml(&config.net_file)
        .with_context(|| format!("loading {}", config.net_file.display()))?;

    let mut sessions = SumoSessions::new(
        ServerConfig::new(&sumo, &config.net_file),
        config.session_per_query,
    );
    let mut rng = SimRng::from_seed_option(config.seed);
    let mut console = Console::new(io::stdin().lock(), io::stdout());
    let presets = Presets { start: args.start, end: args.end };

    let outcome = app::run(&config, &network, &presets, &mut sessions, &mut console, &mut rng)?;
    let Outcome::Written { vehicles } = outcome else {
        return Ok(ExitCode::FAILURE);
    };
    log::info!(
        "wrote {} ({vehicles} vehicles) and {}",
        config.routes_out.display(),
        config.settings_out.display()
    );

    if config.launch_gui {
        println!("\nStarting simulation...");
        let status = GuiLauncher::new(&sumo).run(
            &config.net_file,
            &config.routes_out,
            &config.settings_out,
        )?;
        if !status.success() {
            log::warn!("sumo-gui exited with {status}");
        }
    }
    Ok(ExitCode::SUCCESS)
}
