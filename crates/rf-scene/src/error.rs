//! Error types for rf-scene.

use rf_sumo::SumoError;
use thiserror::Error;

/// Errors that can occur while assembling or writing a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The route service failed for a reason other than "no route".
    #[error("routing failed: {0}")]
    Routing(#[from] SumoError),
}

/// Alias for `Result<T, SceneError>`.
pub type SceneResult<T> = Result<T, SceneError>;
