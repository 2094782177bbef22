//! Run configuration.
//!
//! Every tunable of a run lives in [`RunConfig`].  Defaults reproduce the
//! tool's fixed behaviour; a JSON file (see [`RunConfig::from_json_file`])
//! may override any subset of fields, and the binary applies CLI flags on
//! top of that.
//!
//! ```json
//! { "net_file": "data/city.net.xml", "background_vehicles": 20, "seed": 7 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

// ── SearchRadius ──────────────────────────────────────────────────────────────

/// Parameters of the expanding-radius nearest-edge search.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchRadius {
    /// First radius tried, in network units.
    pub initial: f64,
    /// Last radius tried.  The radius doubles until it would exceed this
    /// value, and one final query is made at exactly `max`.
    pub max: f64,
}

impl Default for SearchRadius {
    fn default() -> Self {
        Self { initial: 0.1, max: 1_000.0 }
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Road network (`.net.xml`).
    pub net_file: PathBuf,
    /// Generated vehicle-route file, overwritten on each run.
    pub routes_out: PathBuf,
    /// Generated viewer-settings file, overwritten on each run.
    pub settings_out: PathBuf,

    /// Number of random background vehicles requested.
    pub background_vehicles: usize,
    /// Ceiling on route requests made while sampling background vehicles.
    pub max_attempts: usize,
    /// Background departures are drawn from `[0, departure_window_secs)`.
    pub departure_window_secs: f64,
    /// Departure time of the highlighted vehicle.
    pub highlight_depart_secs: f64,

    /// vType passed to the routing query.
    pub routing_vtype: String,

    pub search_radius: SearchRadius,

    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Open a fresh TraCI session for every background route query instead
    /// of reusing one session for the whole sampling loop.
    pub session_per_query: bool,

    /// Launch `sumo-gui` once the files are written.
    pub launch_gui: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            net_file:              PathBuf::from("../data/test.net.xml"),
            routes_out:            PathBuf::from("../data/route.rou.xml"),
            settings_out:          PathBuf::from("../data/settings.xml"),
            background_vehicles:   50,
            max_attempts:          1_000,
            departure_window_secs: 200.0,
            highlight_depart_secs: 2.0,
            routing_vtype:         "DEFAULT_VEHTYPE".to_owned(),
            search_radius:         SearchRadius::default(),
            seed:                  None,
            session_per_query:     false,
            launch_gui:            true,
        }
    }
}

impl RunConfig {
    /// Load a config from a JSON file.  Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: RunConfig =
            serde_json::from_str(&text).map_err(|source| CoreError::ConfigFile {
                path: path.display().to_string(),
                source,
            })?;
        log::debug!("loaded run config from {}", path.display());
        Ok(config)
    }

    /// Reject values that would make the run meaningless.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.departure_window_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "departure_window_secs must be positive, got {}",
                self.departure_window_secs
            )));
        }
        if !(self.highlight_depart_secs >= 0.0) {
            return Err(CoreError::Config(format!(
                "highlight_depart_secs must be non-negative, got {}",
                self.highlight_depart_secs
            )));
        }
        let r = self.search_radius;
        if !(r.initial > 0.0) || !(r.max >= r.initial) {
            return Err(CoreError::Config(format!(
                "search radius needs 0 < initial <= max, got initial={} max={}",
                r.initial, r.max
            )));
        }
        if self.routing_vtype.is_empty() {
            return Err(CoreError::Config("routing_vtype must not be empty".into()));
        }
        Ok(())
    }
}
