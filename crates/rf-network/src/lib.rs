//! `rf-network` — road network, spatial indexing, and edge resolution.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (edges + R-tree), `RoadNetworkBuilder`        |
//! | [`resolve`] | `valid_edges`, `nearest_edge` (expanding-radius search)     |
//! | [`net_xml`] | `load_net_xml`, `load_net_xml_reader`                       |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |

pub mod error;
pub mod net_xml;
pub mod network;
pub mod resolve;


pub use error::{NetworkError, NetworkResult};
pub use net_xml::{load_net_xml, load_net_xml_reader};
pub use network::{Edge, Lane, RoadNetwork, RoadNetworkBuilder};
pub use resolve::{nearest_edge, valid_edges};
