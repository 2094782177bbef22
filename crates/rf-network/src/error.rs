//! Network-subsystem error type.

use thiserror::Error;

use rf_core::{EdgeId, JunctionId};

/// Errors produced by `rf-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("edge {0} defined twice")]
    DuplicateEdge(EdgeId),

    #[error("edge {edge} references unknown junction {junction}")]
    UnknownJunction { edge: EdgeId, junction: JunctionId },

    #[error("edge {0} has no from/to junction")]
    MissingEndpoint(EdgeId),

    #[error("malformed shape on {owner}: {value:?}")]
    BadShape { owner: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network XML error: {0}")]
    Xml(#[from] quick_xml::DeError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
