//! `rf-sumo` — everything that talks to the SUMO toolchain.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`env`]      | `SumoHome` (`SUMO_HOME` lookup, binary resolution)         |
//! | [`codec`]    | TraCI framing and typed values                             |
//! | [`session`]  | `TraciSession`, `ServerConfig`                             |
//! | [`router`]   | `RouteService` trait, `Route`, `PerQueryRouter`            |
//! | [`launcher`] | `GuiLauncher` for `sumo-gui`                               |
//! | [`error`]    | `SumoError`, `SumoResult<T>`                               |
//!
//! Routing itself happens inside SUMO; this crate only opens a TraCI
//! session against a headless `sumo` process, asks it for routes, and shuts
//! it down again.

pub mod codec;
pub mod env;
pub mod error;
pub mod launcher;
pub mod router;
pub mod session;


pub use env::SumoHome;
pub use error::{SumoError, SumoResult};
pub use launcher::{GuiLauncher, GuiOptions};
pub use router::{PerQueryRouter, Route, RouteService};
pub use session::{ServerConfig, Stage, TraciSession};
