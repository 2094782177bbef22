//! SUMO-subsystem error type.

use std::process::ExitStatus;

use thiserror::Error;

use crate::env::SUMO_HOME_VAR;

/// Errors produced by `rf-sumo`.
#[derive(Debug, Error)]
pub enum SumoError {
    #[error("please declare environment variable '{}'", SUMO_HOME_VAR)]
    MissingSumoHome,

    #[error("failed to start {binary}: {source}")]
    Launch {
        binary: String,
        source: std::io::Error,
    },

    #[error("no TraCI server on port {port} after {attempts} attempts")]
    Connect { port: u16, attempts: u32 },

    #[error("sumo exited before accepting a TraCI connection ({0})")]
    ServerExited(ExitStatus),

    /// SUMO answered a command with a non-OK status.
    #[error("TraCI command 0x{cmd:02x} failed: {message}")]
    Command { cmd: u8, message: String },

    #[error("TraCI protocol error: {0}")]
    Protocol(String),

    #[error("TraCI session already closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SumoResult<T> = Result<T, SumoError>;
