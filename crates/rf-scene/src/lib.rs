//! `rf-scene` — what the viewer is shown.
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`vtype`]   | The two fixed `VehicleType` profiles                       |
//! | [`vehicle`] | `VehicleEntry`, `Scene` (highlight + background traffic)   |
//! | [`sampler`] | `BackgroundSampler`, `SampleReport`                        |
//! | [`xml`]     | Route file and view-settings writers                       |
//!
//! # Usage
//!
//! ```rust,ignore
//! let report = BackgroundSampler::default().sample(&mut session, &valid, &mut rng, |_| {})?;
//! let scene = Scene::new(&route, 2.0).with_background(report.vehicles);
//! xml::write_scene(Path::new("route.rou.xml"), Path::new("settings.xml"), &scene)?;
//! ```

pub mod error;
pub mod sampler;
pub mod vehicle;
pub mod vtype;
pub mod xml;

#[cfg(test)]
mod tests;

pub use error::{SceneError, SceneResult};
pub use sampler::{BackgroundSampler, SampleReport};
pub use vehicle::{Scene, VehicleEntry, HIGHLIGHT_ID};
pub use vtype::VehicleType;
pub use xml::write_scene;
