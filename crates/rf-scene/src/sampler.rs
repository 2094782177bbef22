//! Random background traffic.
//!
//! Each attempt draws two edges uniformly (with replacement) from the valid
//! set and asks the route service for a route between them.  A found route
//! becomes a background vehicle with a departure uniform in `[0, window)`,
//! truncated to 0.1 s.  "No route" just costs the attempt.  Sampling stops
//! at the target count or the attempt ceiling, whichever comes first; a short
//! result is reported, not an error.

use rf_core::{EdgeId, SimRng};
use rf_sumo::RouteService;

use crate::vehicle::VehicleEntry;
use crate::SceneResult;

/// Outcome of a sampling run.
#[derive(Clone, Debug, Default)]
pub struct SampleReport {
    pub vehicles: Vec<VehicleEntry>,
    /// Route requests made, successful or not.
    pub attempts: usize,
}

impl SampleReport {
    pub fn added(&self) -> usize {
        self.vehicles.len()
    }
}

/// Sampling parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundSampler {
    /// Vehicles wanted.
    pub target:       usize,
    /// Route requests allowed.
    pub max_attempts: usize,
    /// Departures fall in `[0, window_secs)`.
    pub window_secs:  f64,
    /// vType passed to the route query.
    pub vtype:        String,
}

impl Default for BackgroundSampler {
    fn default() -> Self {
        Self {
            target:       50,
            max_attempts: 1_000,
            window_secs:  200.0,
            vtype:        "DEFAULT_VEHTYPE".to_owned(),
        }
    }
}

impl BackgroundSampler {
    /// Run the sampling loop.
    ///
    /// `on_added` sees each vehicle as it is accepted, before the next
    /// attempt.
    ///
    /// # Errors
    ///
    /// Any service error other than "no route"; the vehicles sampled so far
    /// are dropped with it.
    pub fn sample<S, F>(
        &self,
        service: &mut S,
        valid: &[EdgeId],
        rng: &mut SimRng,
        mut on_added: F,
    ) -> SceneResult<SampleReport>
    where
        S: RouteService + ?Sized,
        F: FnMut(&VehicleEntry),
    {
        let mut report = SampleReport::default();
        if valid.is_empty() {
            log::warn!("no valid edges to sample background traffic from");
            return Ok(report);
        }

        while report.vehicles.len() < self.target && report.attempts < self.max_attempts {
            let (Some(from), Some(to)) = (rng.choose(valid), rng.choose(valid)) else {
                break;
            };
            report.attempts += 1;

            let Some(route) = service.find_route(from, to, &self.vtype)? else {
                log::debug!("attempt {}: no route {from} → {to}", report.attempts);
                continue;
            };
            let depart = self.draw_departure(rng);
            let vehicle = VehicleEntry::background(report.vehicles.len(), route, depart);
            on_added(&vehicle);
            report.vehicles.push(vehicle);
        }

        log::info!(
            "sampled {} of {} background vehicles in {} attempts",
            report.added(),
            self.target,
            report.attempts
        );
        Ok(report)
    }

    /// Uniform in `[0, window)`, truncated to 0.1 s so the written value is
    /// the value sorted on.
    fn draw_departure(&self, rng: &mut SimRng) -> f64 {
        let raw: f64 = rng.gen_range(0.0..self.window_secs);
        (raw * 10.0).floor() / 10.0
    }
}
