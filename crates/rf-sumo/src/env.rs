//! Locating the SUMO installation.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::{SumoError, SumoResult};

/// Environment variable naming the SUMO install root.
pub const SUMO_HOME_VAR: &str = "SUMO_HOME";

/// A SUMO installation root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SumoHome {
    root: PathBuf,
}

impl SumoHome {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read [`SUMO_HOME_VAR`] from the process environment.
    ///
    /// # Errors
    ///
    /// [`SumoError::MissingSumoHome`] if the variable is unset or empty.
    pub fn from_env() -> SumoResult<Self> {
        Self::from_var(std::env::var_os(SUMO_HOME_VAR))
    }

    /// Like [`from_env`](Self::from_env) with the variable value supplied.
    pub fn from_var(value: Option<OsString>) -> SumoResult<Self> {
        match value {
            Some(v) if !v.is_empty() => Ok(Self::new(v)),
            _ => Err(SumoError::MissingSumoHome),
        }
    }

    /// Path of a SUMO executable (`"sumo"`, `"sumo-gui"`, ...).
    ///
    /// `$SUMO_HOME/bin/<name>` when that file exists, otherwise the bare
    /// name so the OS resolves it through `PATH`.
    pub fn binary(&self, name: &str) -> PathBuf {
        let file = format!("{name}{}", std::env::consts::EXE_SUFFIX);
        let candidate = self.root.join("bin").join(&file);
        if candidate.is_file() {
            candidate
        } else {
            PathBuf::from(file)
        }
    }
}
