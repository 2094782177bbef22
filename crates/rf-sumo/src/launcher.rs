//! `sumo-gui` launcher.
//!
//! The viewer is run as a blocking child process; the tool's lifetime ends
//! when it exits.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::env::SumoHome;
use crate::{SumoError, SumoResult};

/// Display and timing flags for the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct GuiOptions {
    /// Start playback immediately.
    pub autostart: bool,
    /// Delay between simulation steps, in milliseconds.
    pub delay_ms: u32,
    /// Simulation step length, in seconds.
    pub step_length: f64,
    pub begin_secs: u32,
    pub end_secs: u32,
    pub window_size: (u32, u32),
    pub window_pos: (i32, i32),
}

impl Default for GuiOptions {
    fn default() -> Self {
        Self {
            autostart:   true,
            delay_ms:    50,
            step_length: 0.1,
            begin_secs:  0,
            end_secs:    3_600,
            window_size: (800, 600),
            window_pos:  (50, 50),
        }
    }
}

/// Builds and runs the `sumo-gui` command line.
#[derive(Clone, Debug)]
pub struct GuiLauncher {
    binary:  PathBuf,
    options: GuiOptions,
}

impl GuiLauncher {
    pub fn new(sumo: &SumoHome) -> Self {
        Self::with_binary(sumo.binary("sumo-gui"))
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into(), options: GuiOptions::default() }
    }

    /// Full argument list for the given network, route and settings files.
    pub fn args(&self, net: &Path, routes: &Path, settings: &Path) -> Vec<OsString> {
        let o = &self.options;
        let mut args: Vec<OsString> = vec![
            "-n".into(),
            net.into(),
            "-r".into(),
            routes.into(),
            "--gui-settings-file".into(),
            settings.into(),
        ];
        if o.autostart {
            args.push("--start".into());
        }
        let flags = [
            ("--delay", o.delay_ms.to_string()),
            ("--step-length", o.step_length.to_string()),
            ("--begin", o.begin_secs.to_string()),
            ("--end", o.end_secs.to_string()),
            ("--window-size", format!("{},{}", o.window_size.0, o.window_size.1)),
            ("--window-pos", format!("{},{}", o.window_pos.0, o.window_pos.1)),
        ];
        for (flag, value) in flags {
            args.push(flag.into());
            args.push(value.into());
        }
        args.push("--no-warnings".into());
        args
    }

    /// Run the viewer and block until it exits.
    pub fn run(&self, net: &Path, routes: &Path, settings: &Path) -> SumoResult<ExitStatus> {
        log::info!("launching {}", self.binary.display());
        Command::new(&self.binary)
            .args(self.args(net, routes, settings))
            .status()
            .map_err(|source| SumoError::Launch {
                binary: self.binary.display().to_string(),
                source,
            })
    }
}
