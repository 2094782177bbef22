//! `rf-core` — foundational types for the route-finder tool.
//!
//! This crate is a dependency of every other `rf-*` crate.  It has no
//! `rf-*` dependencies of its own.
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `EdgeId`, `LaneId`, `JunctionId`                       |
//! | [`geo`]      | `Point2`, point-to-segment distance                    |
//! | [`vclass`]   | `VehicleClass`, `Permissions` (lane allow/disallow)    |
//! | [`rng`]      | `SimRng`                                               |
//! | [`config`]   | `RunConfig`, `SearchRadius`                            |
//! | [`error`]    | `CoreError`, `CoreResult`                              |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod vclass;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{RunConfig, SearchRadius};
pub use error::{CoreError, CoreResult};
pub use geo::Point2;
pub use ids::{EdgeId, JunctionId, LaneId};
pub use rng::SimRng;
pub use vclass::{Permissions, VehicleClass};
